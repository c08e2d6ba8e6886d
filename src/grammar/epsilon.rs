use std::collections::HashSet;

use crate::Grammar;

/// The non-terminals that can derive the empty string. Terminals are
/// never members, so sequence queries work on any right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableSet {
    nullable: HashSet<usize>,
}

impl NullableSet {
    pub fn contains(&self, symbol: usize) -> bool {
        self.nullable.contains(&symbol)
    }

    /// A sequence is nullable when every symbol in it is; the empty
    /// sequence is vacuously nullable.
    pub fn sequence(&self, symbols: &[usize]) -> bool {
        symbols.iter().all(|s| self.nullable.contains(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.nullable.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.nullable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nullable.is_empty()
    }
}

/// Fixpoint over all productions: mark a non-terminal nullable once it
/// owns a production whose right-hand symbols are all marked nullable.
/// The set only grows and is bounded by the non-terminal count, so the
/// loop terminates when a full pass adds nothing.
pub(crate) fn compute(grammar: &Grammar) -> NullableSet {
    let mut nullable: HashSet<usize> = HashSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            if nullable.contains(&production.lhs) {
                continue;
            }
            if production.rhs.iter().all(|s| nullable.contains(s)) {
                nullable.insert(production.lhs);
                changed = true;
            }
        }
    }
    NullableSet { nullable }
}
