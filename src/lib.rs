extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

mod grammar;
pub use grammar::grammar::RuleDescription;
pub use grammar::{
    Analysis, Grammar, GrammarDescription, GrammarError, GrammarWarning, Production, END_MARK,
    EPSILON,
};

fn error_json(e: GrammarError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => Analysis::new(g).to_non_terminal_output_vec().to_json(),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => Analysis::new(g).to_ll1_table_output().to_json(),
        Err(e) => error_json(e),
    }
}
