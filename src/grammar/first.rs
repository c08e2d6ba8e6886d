use std::collections::HashSet;

use super::epsilon::NullableSet;
use crate::Grammar;

/// FIRST sets for every symbol, indexed like the grammar's symbol
/// vector. FIRST of a terminal is the singleton containing itself.
/// FIRST never holds an epsilon marker; nullability is always the
/// separate [`NullableSet`] query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: Vec<HashSet<usize>>,
}

impl FirstSets {
    pub fn first(&self, symbol: usize) -> &HashSet<usize> {
        &self.sets[symbol]
    }

    /// FIRST of a sentential sequence: scan left to right, stop after
    /// the first non-nullable symbol. Whether the whole sequence is
    /// nullable is `nullable.sequence(symbols)`, asked separately.
    pub fn of_sequence(&self, symbols: &[usize], nullable: &NullableSet) -> HashSet<usize> {
        let mut first = HashSet::new();
        for &symbol in symbols {
            first.extend(self.sets[symbol].iter().copied());
            if !nullable.contains(symbol) {
                break;
            }
        }
        first
    }
}

/// Fixpoint: each pass rebuilds FIRST of every non-terminal as the
/// union of FIRST over its productions' viable prefixes; the sets only
/// grow, so a length comparison detects progress.
pub(crate) fn compute(grammar: &Grammar, nullable: &NullableSet) -> FirstSets {
    let mut sets = FirstSets {
        sets: (0..grammar.symbol_count())
            .map(|i| {
                if grammar.is_terminal(i) {
                    HashSet::from([i])
                } else {
                    HashSet::new()
                }
            })
            .collect(),
    };

    let mut changed = true;
    while changed {
        changed = false;
        for nt in grammar.non_terminal_iter() {
            let first: HashSet<usize> = grammar
                .productions_of(nt.index)
                .fold(HashSet::new(), |mut first, production| {
                    first.extend(sets.of_sequence(&production.rhs, nullable));
                    first
                });
            if first.len() != sets.sets[nt.index].len() {
                sets.sets[nt.index] = first;
                changed = true;
            }
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::epsilon;

    fn first_names(g: &Grammar, sets: &FirstSets, name: &str) -> Vec<String> {
        let mut names: Vec<String> = sets
            .first(g.get_symbol_index(name).unwrap())
            .iter()
            .map(|&i| g.get_symbol_name(i).to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let g = Grammar::parse("S -> a b").unwrap();
        let sets = compute(&g, &epsilon::compute(&g));
        for (idx, name) in g.terminal_iter() {
            assert_eq!(
                sets.first(idx).iter().copied().collect::<Vec<_>>(),
                vec![idx],
                "FIRST({}) should be itself",
                name
            );
        }
    }

    #[test]
    fn first_unions_over_alternatives() {
        let g = Grammar::parse("S -> A a | b\nA -> a").unwrap();
        let sets = compute(&g, &epsilon::compute(&g));
        assert_eq!(first_names(&g, &sets, "S"), vec!["a", "b"]);
        assert_eq!(first_names(&g, &sets, "A"), vec!["a"]);
    }

    #[test]
    fn nullable_prefix_exposes_later_symbols() {
        let g = Grammar::parse("S -> A B c\nA -> a | ε\nB -> b | ε").unwrap();
        let sets = compute(&g, &epsilon::compute(&g));
        assert_eq!(first_names(&g, &sets, "S"), vec!["a", "b", "c"]);
    }

    #[test]
    fn sequence_first_stops_at_non_nullable() {
        let g = Grammar::parse("S -> A b\nA -> a | ε").unwrap();
        let nullable = epsilon::compute(&g);
        let sets = compute(&g, &nullable);

        let a = g.get_symbol_index("A").unwrap();
        let b = g.get_symbol_index("b").unwrap();

        let seq = sets.of_sequence(&[a, b], &nullable);
        assert!(seq.contains(&g.get_symbol_index("a").unwrap()));
        assert!(seq.contains(&b));
        assert!(!nullable.sequence(&[a, b]));

        assert!(sets.of_sequence(&[], &nullable).is_empty());
        assert!(nullable.sequence(&[]));
    }
}
