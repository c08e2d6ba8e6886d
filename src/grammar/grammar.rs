use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{END_MARK, EPSILON};

/// A non-terminal symbol and the ids of the productions it owns.
#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub productions: Vec<usize>,
}

#[derive(Debug, Clone)]
pub enum Symbol {
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// A rewrite rule `lhs -> rhs`. An empty `rhs` is an epsilon production.
/// `id` is the registration order and is the deterministic tie-break
/// when two productions compete for the same parse-table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub id: usize,
    pub lhs: usize,
    pub rhs: Vec<usize>,
}

/// One rule of a grammar description: a left-hand non-terminal and its
/// ordered alternatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDescription {
    pub lhs: String,
    pub rhs: Vec<Vec<String>>,
}

/// The loader-facing grammar shape: symbol inventories, start symbol,
/// and ordered rules. Produced by the text parser or deserialized from
/// JSON; `Grammar::from_description` turns it into the analyzed model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarDescription {
    #[serde(default)]
    pub terminals: Vec<String>,
    #[serde(default)]
    pub nonterminals: Vec<String>,
    pub start: String,
    pub rules: Vec<RuleDescription>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("symbol \"{0}\" is declared more than once")]
    DuplicateSymbol(String),
    #[error("\"{0}\" is reserved and cannot be declared as a symbol")]
    ReservedSymbol(String),
    #[error("production for \"{lhs}\" references undeclared symbol \"{symbol}\"")]
    UnknownSymbol { lhs: String, symbol: String },
    #[error("start symbol \"{0}\" is not a declared non-terminal")]
    UndeclaredStart(String),
}

/// Non-fatal findings from grammar construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarWarning {
    NoProductions(String),
    Unreachable(String),
}

impl std::fmt::Display for GrammarWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarWarning::NoProductions(name) => {
                write!(f, "non-terminal \"{}\" has no productions", name)
            }
            GrammarWarning::Unreachable(name) => {
                write!(f, "non-terminal \"{}\" is unreachable from the start symbol", name)
            }
        }
    }
}

/// An immutable grammar: interned symbols, a flat production list, the
/// declared and augmented start symbols. Built once from a
/// [`GrammarDescription`], validated and augmented up front; there are
/// no mutators, so derived sets can be cached against it safely.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: Vec<Symbol>,
    symbol_table: HashMap<String, usize>,
    productions: Vec<Production>,
    start: usize,
    augmented_start: usize,
    end_mark: usize,
    warnings: Vec<GrammarWarning>,
}

impl Grammar {
    /// Validates a description, interns its symbols, registers its
    /// productions in order, and augments it with a fresh start
    /// non-terminal `Start' -> Start $`.
    pub fn from_description(desc: &GrammarDescription) -> Result<Self, GrammarError> {
        let mut symbols: Vec<Symbol> = Vec::new();
        let mut symbol_table: HashMap<String, usize> = HashMap::new();

        fn add_symbol(
            symbols: &mut Vec<Symbol>,
            symbol_table: &mut HashMap<String, usize>,
            symbol: Symbol,
            name: &str,
        ) -> Result<usize, GrammarError> {
            if name == EPSILON || (name == END_MARK && !symbol.is_terminal()) {
                return Err(GrammarError::ReservedSymbol(name.to_string()));
            }
            if symbol_table.contains_key(name) {
                return Err(GrammarError::DuplicateSymbol(name.to_string()));
            }
            let idx = symbols.len();
            symbols.push(symbol);
            symbol_table.insert(name.to_string(), idx);
            Ok(idx)
        }

        for name in &desc.nonterminals {
            let nt = NonTerminal {
                index: symbols.len(),
                name: name.clone(),
                productions: Vec::new(),
            };
            add_symbol(&mut symbols, &mut symbol_table, Symbol::NonTerminal(nt), name)?;
        }
        for name in &desc.terminals {
            add_symbol(&mut symbols, &mut symbol_table, Symbol::Terminal(name.clone()), name)?;
        }
        let end_mark = match symbol_table.get(END_MARK) {
            Some(&idx) => idx,
            None => add_symbol(
                &mut symbols,
                &mut symbol_table,
                Symbol::Terminal(END_MARK.to_string()),
                END_MARK,
            )?,
        };

        let start = match symbol_table.get(&desc.start) {
            Some(&idx) if !symbols[idx].is_terminal() => idx,
            _ => return Err(GrammarError::UndeclaredStart(desc.start.clone())),
        };

        let mut productions: Vec<Production> = Vec::new();
        for rule in &desc.rules {
            let lhs = match symbol_table.get(&rule.lhs) {
                Some(&idx) if !symbols[idx].is_terminal() => idx,
                _ => {
                    return Err(GrammarError::UnknownSymbol {
                        lhs: rule.lhs.clone(),
                        symbol: rule.lhs.clone(),
                    })
                }
            };
            for alternative in &rule.rhs {
                let mut rhs: Vec<usize> = Vec::new();
                for name in alternative {
                    // Empty-string and epsilon markers only mark the
                    // alternative as empty; they never become symbols.
                    if name.is_empty() || name == EPSILON {
                        continue;
                    }
                    match symbol_table.get(name) {
                        Some(&idx) => rhs.push(idx),
                        None => {
                            return Err(GrammarError::UnknownSymbol {
                                lhs: rule.lhs.clone(),
                                symbol: name.clone(),
                            })
                        }
                    }
                }
                let id = productions.len();
                productions.push(Production { id, lhs, rhs });
                match &mut symbols[lhs] {
                    Symbol::NonTerminal(nt) => nt.productions.push(id),
                    Symbol::Terminal(_) => unreachable!(),
                }
            }
        }

        // Augment: Start' -> Start $. Priming repeats until the name is
        // fresh, so an existing Start' is never overwritten.
        let mut aug_name = format!("{}'", desc.start);
        while symbol_table.contains_key(&aug_name) {
            aug_name.push('\'');
        }
        let augmented_start = symbols.len();
        let id = productions.len();
        symbols.push(Symbol::NonTerminal(NonTerminal {
            index: augmented_start,
            name: aug_name.clone(),
            productions: vec![id],
        }));
        symbol_table.insert(aug_name, augmented_start);
        productions.push(Production {
            id,
            lhs: augmented_start,
            rhs: vec![start, end_mark],
        });

        let mut grammar = Self {
            symbols,
            symbol_table,
            productions,
            start,
            augmented_start,
            end_mark,
            warnings: Vec::new(),
        };
        grammar.warnings = grammar.collect_warnings();
        Ok(grammar)
    }

    fn collect_warnings(&self) -> Vec<GrammarWarning> {
        let mut warnings = Vec::new();
        for nt in self.non_terminal_iter() {
            if nt.productions.is_empty() {
                warnings.push(GrammarWarning::NoProductions(nt.name.clone()));
            }
        }

        let mut reached: HashSet<usize> = HashSet::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        reached.insert(self.augmented_start);
        queue.push_back(self.augmented_start);
        while let Some(idx) = queue.pop_front() {
            for &pid in &self.symbols[idx].non_terminal().unwrap().productions {
                for &s in &self.productions[pid].rhs {
                    if !self.symbols[s].is_terminal() && reached.insert(s) {
                        queue.push_back(s);
                    }
                }
            }
        }
        for nt in self.non_terminal_iter() {
            if !reached.contains(&nt.index) {
                warnings.push(GrammarWarning::Unreachable(nt.name.clone()));
            }
        }
        warnings
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        self.symbols[index].is_terminal()
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.symbols.iter().enumerate().filter_map(|(i, s)| {
            if let Symbol::Terminal(name) = s {
                Some((i, name.as_str()))
            } else {
                None
            }
        })
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols.iter().filter_map(|s| s.non_terminal())
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: usize) -> &Production {
        &self.productions[id]
    }

    pub fn productions_of(&self, non_terminal: usize) -> impl Iterator<Item = &Production> {
        self.symbols[non_terminal]
            .non_terminal()
            .into_iter()
            .flat_map(|nt| nt.productions.iter().map(|&id| &self.productions[id]))
    }

    pub fn start_symbol(&self) -> usize {
        self.start
    }

    pub fn augmented_start(&self) -> usize {
        self.augmented_start
    }

    pub fn end_mark(&self) -> usize {
        self.end_mark
    }

    pub fn warnings(&self) -> &[GrammarWarning] {
        &self.warnings
    }

    pub fn production_to_vec_str(&self, production: &Production) -> Vec<&str> {
        production
            .rhs
            .iter()
            .map(|&idx| self.get_symbol_name(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> GrammarDescription {
        GrammarDescription {
            terminals: vec!["a".to_string(), "b".to_string()],
            nonterminals: vec!["S".to_string(), "A".to_string()],
            start: "S".to_string(),
            rules: vec![
                RuleDescription {
                    lhs: "S".to_string(),
                    rhs: vec![
                        vec!["A".to_string(), "a".to_string()],
                        vec!["b".to_string()],
                    ],
                },
                RuleDescription {
                    lhs: "A".to_string(),
                    rhs: vec![vec!["a".to_string()]],
                },
            ],
        }
    }

    #[test]
    fn builds_and_augments() {
        let g = Grammar::from_description(&description()).unwrap();

        let s = g.get_symbol_index("S").unwrap();
        assert_eq!(g.start_symbol(), s);

        let aug = g.augmented_start();
        assert_eq!(g.get_symbol_name(aug), "S'");
        let aug_prods: Vec<_> = g.productions_of(aug).collect();
        assert_eq!(aug_prods.len(), 1);
        assert_eq!(aug_prods[0].rhs, vec![s, g.end_mark()]);

        // "$" was added to the terminal set by augmentation.
        assert_eq!(g.get_symbol_name(g.end_mark()), "$");
        assert!(g.is_terminal(g.end_mark()));
        assert!(g.warnings().is_empty());
    }

    #[test]
    fn augmented_name_is_freshened() {
        let mut desc = description();
        desc.nonterminals.push("S'".to_string());
        desc.rules.push(RuleDescription {
            lhs: "S'".to_string(),
            rhs: vec![vec!["a".to_string()]],
        });
        let g = Grammar::from_description(&desc).unwrap();
        assert_eq!(g.get_symbol_name(g.augmented_start()), "S''");
        // The declared S' is untouched and now unreachable.
        assert!(g
            .warnings()
            .contains(&GrammarWarning::Unreachable("S'".to_string())));
    }

    #[test]
    fn epsilon_marker_means_empty() {
        let mut desc = description();
        desc.rules[1].rhs.push(vec!["ε".to_string()]);
        let g = Grammar::from_description(&desc).unwrap();
        let a = g.get_symbol_index("A").unwrap();
        let prods: Vec<_> = g.productions_of(a).collect();
        assert_eq!(prods.len(), 2);
        assert!(prods[1].rhs.is_empty());
    }

    #[test]
    fn unknown_rhs_symbol_is_rejected() {
        let mut desc = description();
        desc.rules[0].rhs.push(vec!["c".to_string()]);
        assert_eq!(
            Grammar::from_description(&desc).unwrap_err(),
            GrammarError::UnknownSymbol {
                lhs: "S".to_string(),
                symbol: "c".to_string()
            }
        );
    }

    #[test]
    fn undeclared_start_is_rejected() {
        let mut desc = description();
        desc.start = "X".to_string();
        assert_eq!(
            Grammar::from_description(&desc).unwrap_err(),
            GrammarError::UndeclaredStart("X".to_string())
        );
    }

    #[test]
    fn duplicate_and_reserved_declarations_are_rejected() {
        let mut desc = description();
        desc.terminals.push("S".to_string());
        assert_eq!(
            Grammar::from_description(&desc).unwrap_err(),
            GrammarError::DuplicateSymbol("S".to_string())
        );

        let mut desc = description();
        desc.nonterminals.push("ε".to_string());
        assert_eq!(
            Grammar::from_description(&desc).unwrap_err(),
            GrammarError::ReservedSymbol("ε".to_string())
        );
    }

    #[test]
    fn missing_productions_is_a_warning() {
        let mut desc = description();
        desc.nonterminals.push("B".to_string());
        let g = Grammar::from_description(&desc).unwrap();
        assert!(g
            .warnings()
            .contains(&GrammarWarning::NoProductions("B".to_string())));
        assert!(g
            .warnings()
            .contains(&GrammarWarning::Unreachable("B".to_string())));
    }
}
