pub mod analysis;
pub mod epsilon;
pub mod first;
pub mod follow;
pub mod grammar;
pub mod parse;
pub mod parse_table;
pub mod pretty_print;

pub use analysis::Analysis;
pub use grammar::{Grammar, GrammarDescription, GrammarError, GrammarWarning, Production};

/// Marker for "derives the empty string" in grammar text and reports.
/// Never a real symbol: nullability is tracked by the epsilon solver,
/// not by an epsilon entry in any FIRST set.
pub const EPSILON: &str = "ε";
/// The end-of-input terminal.
pub const END_MARK: &str = "$";
