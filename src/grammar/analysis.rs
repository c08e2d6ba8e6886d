use std::sync::OnceLock;

use super::{
    epsilon::{self, NullableSet},
    first::{self, FirstSets},
    follow::{self, FollowSets},
    parse_table::{self, ParseTable},
};
use crate::Grammar;

/// One analysis session: an immutable grammar plus its lazily derived
/// sets. Each set is computed at most once, strictly in the order
/// epsilon -> first -> follow -> table, and then served from cache;
/// the `OnceLock`s make concurrent first requests block on a single
/// computation instead of racing.
#[derive(Debug)]
pub struct Analysis {
    grammar: Grammar,
    nullable: OnceLock<NullableSet>,
    first: OnceLock<FirstSets>,
    follow: OnceLock<FollowSets>,
    table: OnceLock<ParseTable>,
}

impl Analysis {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            nullable: OnceLock::new(),
            first: OnceLock::new(),
            follow: OnceLock::new(),
            table: OnceLock::new(),
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn nullable(&self) -> &NullableSet {
        self.nullable.get_or_init(|| epsilon::compute(&self.grammar))
    }

    pub fn first(&self) -> &FirstSets {
        self.first
            .get_or_init(|| first::compute(&self.grammar, self.nullable()))
    }

    pub fn follow(&self) -> &FollowSets {
        self.follow
            .get_or_init(|| follow::compute(&self.grammar, self.nullable(), self.first()))
    }

    pub fn table(&self) -> &ParseTable {
        self.table.get_or_init(|| {
            parse_table::compute(&self.grammar, self.nullable(), self.first(), self.follow())
        })
    }
}

impl From<Grammar> for Analysis {
    fn from(grammar: Grammar) -> Self {
        Self::new(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_sets_are_computed_once() {
        let analysis = Analysis::new(Grammar::parse("S -> A a | b\nA -> a").unwrap());

        let table = analysis.table();
        assert!(std::ptr::eq(table, analysis.table()));
        assert!(std::ptr::eq(analysis.first(), analysis.first()));
        assert_eq!(analysis.table(), &analysis.table().clone());
    }

    #[test]
    fn follow_can_be_asked_before_first() {
        // Accessors pull in their prerequisites themselves.
        let analysis = Analysis::new(Grammar::parse("S -> a").unwrap());
        let g = analysis.grammar();
        assert!(analysis
            .follow()
            .follow(g.start_symbol())
            .contains(&g.end_mark()));
    }
}
