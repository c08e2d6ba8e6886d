use super::grammar::{GrammarDescription, GrammarError, RuleDescription};
use crate::Grammar;

impl Grammar {
    /// Parses the `A -> x y | z` text format into a description and
    /// builds the grammar from it. Left-hand sides declare the
    /// non-terminals; every other symbol is a terminal. The first
    /// left-hand side is the start symbol. A line starting with `|`
    /// continues the previous rule.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let desc = GrammarDescription::parse(grammar)?;
        Self::from_description(&desc)
    }
}

impl GrammarDescription {
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        fn err(line: usize, message: &str) -> GrammarError {
            GrammarError::Parse {
                line: line + 1,
                message: message.to_string(),
            }
        }

        let mut desc = GrammarDescription::default();

        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            let (left, rights): (String, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(err(i, "empty left side"));
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(err(i, "left side contains whitespace"));
                }
                (left_str.to_string(), parts[1].trim())
            } else if parts.len() > 2 {
                return Err(err(i, "too many \"->\""));
            } else {
                let rest = parts[0].trim();
                match (desc.rules.last(), rest.strip_prefix('|')) {
                    (Some(rule), Some(rest)) => (rule.lhs.clone(), rest.trim()),
                    _ => return Err(err(i, "cannot find left side")),
                }
            };

            if !desc.nonterminals.contains(&left) {
                desc.nonterminals.push(left.clone());
            }

            let alternatives: Vec<Vec<String>> = rights
                .split('|')
                .map(|right| right.split_whitespace().map(str::to_string).collect())
                .collect();
            match desc.rules.last_mut() {
                Some(rule) if rule.lhs == left => rule.rhs.extend(alternatives),
                _ => desc.rules.push(RuleDescription {
                    lhs: left,
                    rhs: alternatives,
                }),
            }
        }

        // Everything that never appears as a left side is a terminal.
        for rule in &desc.rules {
            for alternative in &rule.rhs {
                for name in alternative {
                    if name != super::EPSILON
                        && !desc.nonterminals.contains(name)
                        && !desc.terminals.contains(name)
                    {
                        desc.terminals.push(name.clone());
                    }
                }
            }
        }

        desc.start = match desc.nonterminals.first() {
            Some(name) => name.clone(),
            None => {
                return Err(GrammarError::Parse {
                    line: 0,
                    message: "grammar has no rules".to_string(),
                })
            }
        };

        Ok(desc)
    }
}
