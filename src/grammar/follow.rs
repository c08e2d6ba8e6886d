use std::collections::HashSet;

use super::{epsilon::NullableSet, first::FirstSets};
use crate::Grammar;

/// FOLLOW sets for every non-terminal, indexed like the grammar's
/// symbol vector (terminal slots stay empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: Vec<HashSet<usize>>,
}

impl FollowSets {
    pub fn follow(&self, non_terminal: usize) -> &HashSet<usize> {
        &self.sets[non_terminal]
    }
}

/// Fixpoint over every non-terminal occurrence B in `A -> .. B β`:
/// FOLLOW(B) takes FIRST(β), and FOLLOW(A) as well when β is nullable
/// (the empty suffix vacuously is). Requires fully converged EPSILON
/// and FIRST; the caller sequences the solvers.
///
/// The seed FOLLOW(Start') = {$} is redundant with the augmented
/// production Start' -> Start $, which already feeds $ into
/// FOLLOW(Start), but it keeps the contract "FOLLOW of the augmented
/// start contains end-of-input" independent of the production walk.
pub(crate) fn compute(grammar: &Grammar, nullable: &NullableSet, first: &FirstSets) -> FollowSets {
    let mut sets = FollowSets {
        sets: vec![HashSet::new(); grammar.symbol_count()],
    };
    sets.sets[grammar.augmented_start()].insert(grammar.end_mark());

    let mut changed = true;
    while changed {
        changed = false;
        for production in grammar.productions() {
            for (i, &symbol) in production.rhs.iter().enumerate() {
                if grammar.is_terminal(symbol) {
                    continue;
                }
                let beta = &production.rhs[i + 1..];
                let mut additions = first.of_sequence(beta, nullable);
                if nullable.sequence(beta) {
                    additions.extend(sets.sets[production.lhs].iter().copied());
                }

                let target = &mut sets.sets[symbol];
                let before = target.len();
                target.extend(additions);
                if target.len() != before {
                    changed = true;
                }
            }
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{epsilon, first};

    fn follow_names(g: &Grammar, sets: &FollowSets, name: &str) -> Vec<String> {
        let mut names: Vec<String> = sets
            .follow(g.get_symbol_index(name).unwrap())
            .iter()
            .map(|&i| g.get_symbol_name(i).to_string())
            .collect();
        names.sort();
        names
    }

    fn analyze(text: &str) -> (Grammar, FollowSets) {
        let g = Grammar::parse(text).unwrap();
        let nullable = epsilon::compute(&g);
        let first = first::compute(&g, &nullable);
        let follow = compute(&g, &nullable, &first);
        (g, follow)
    }

    #[test]
    fn start_symbol_is_followed_by_end_mark() {
        let (g, follow) = analyze("S -> A a | b\nA -> a");
        assert!(follow
            .follow(g.augmented_start())
            .contains(&g.end_mark()));
        assert_eq!(follow_names(&g, &follow, "S"), vec!["$"]);
        assert_eq!(follow_names(&g, &follow, "A"), vec!["a"]);
    }

    #[test]
    fn classic_expression_grammar() {
        let (g, follow) = analyze(
            "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> a | b",
        );
        assert_eq!(follow_names(&g, &follow, "E"), vec!["$"]);
        assert_eq!(follow_names(&g, &follow, "E'"), vec!["$"]);
        assert_eq!(follow_names(&g, &follow, "T"), vec!["$", "+"]);
        assert_eq!(follow_names(&g, &follow, "T'"), vec!["$", "+"]);
        assert_eq!(follow_names(&g, &follow, "F"), vec!["$", "*", "+"]);
    }

    #[test]
    fn nullable_suffix_passes_the_parents_follow() {
        let (g, follow) = analyze("S -> a B C d\nB -> b\nC -> c | ε");
        // C is nullable, so FOLLOW(B) sees both FIRST(C) and d.
        assert_eq!(follow_names(&g, &follow, "B"), vec!["c", "d"]);
        assert_eq!(follow_names(&g, &follow, "C"), vec!["d"]);
    }
}
