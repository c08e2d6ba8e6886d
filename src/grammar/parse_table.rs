use std::collections::HashMap;

use super::{epsilon::NullableSet, first::FirstSets, follow::FollowSets};
use crate::Grammar;

/// Two or more productions competing for one table cell: the grammar
/// is not LL(1) at (`non_terminal`, `terminal`). `productions` lists
/// every claimant in registration order; the first one keeps the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: usize,
    pub terminal: usize,
    pub productions: Vec<usize>,
}

/// The LL(1) parse table: (non-terminal, lookahead terminal) cells to
/// production ids, plus the conflicts found while filling it. Absent
/// cells mean a syntax error when driving a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    moves: HashMap<(usize, usize), usize>,
    conflicts: Vec<Conflict>,
}

impl ParseTable {
    pub fn production_for(&self, non_terminal: usize, terminal: usize) -> Option<usize> {
        self.moves.get(&(non_terminal, terminal)).copied()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    fn claim(&mut self, non_terminal: usize, terminal: usize, production: usize) {
        let cell = (non_terminal, terminal);
        match self.moves.get(&cell) {
            None => {
                self.moves.insert(cell, production);
            }
            Some(&winner) if winner == production => {}
            Some(&winner) => {
                // First registered wins; later claimants only extend
                // the conflict record.
                match self
                    .conflicts
                    .iter_mut()
                    .find(|c| c.non_terminal == non_terminal && c.terminal == terminal)
                {
                    Some(conflict) => {
                        if !conflict.productions.contains(&production) {
                            conflict.productions.push(production);
                        }
                    }
                    None => self.conflicts.push(Conflict {
                        non_terminal,
                        terminal,
                        productions: vec![winner, production],
                    }),
                }
            }
        }
    }
}

/// Fill the table from fully resolved sets: a production `A -> α`
/// claims every cell (A, t) for t in FIRST(α), and every (A, t) for t
/// in FOLLOW(A) when α is nullable. Terminal indices are sorted before
/// claiming so the conflict list comes out in a reproducible order.
pub(crate) fn compute(
    grammar: &Grammar,
    nullable: &NullableSet,
    first: &FirstSets,
    follow: &FollowSets,
) -> ParseTable {
    let mut table = ParseTable {
        moves: HashMap::new(),
        conflicts: Vec::new(),
    };

    for nt in grammar.non_terminal_iter() {
        for production in grammar.productions_of(nt.index) {
            let mut firsts: Vec<usize> = first
                .of_sequence(&production.rhs, nullable)
                .into_iter()
                .collect();
            firsts.sort_unstable();
            for terminal in firsts {
                table.claim(nt.index, terminal, production.id);
            }

            if nullable.sequence(&production.rhs) {
                let mut follows: Vec<usize> = follow.follow(nt.index).iter().copied().collect();
                follows.sort_unstable();
                for terminal in follows {
                    table.claim(nt.index, terminal, production.id);
                }
            }
        }
    }
    table
}
