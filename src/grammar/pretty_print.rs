use crowbook_text_processing::escape;
use serde::Serialize;

use super::{Analysis, EPSILON};

/// A production (or a bundle of alternatives for one left side),
/// rendered with names instead of symbol indices.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

fn right_to_plaintext(right: &[&str]) -> String {
    if right.is_empty() {
        EPSILON.to_string()
    } else {
        right.join(" ")
    }
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right_to_plaintext(right))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let right = self
            .rights
            .iter()
            .map(|right| {
                if right.is_empty() {
                    "\\epsilon".to_string()
                } else {
                    right
                        .iter()
                        .map(|s| escape::tex(*s))
                        .collect::<Vec<_>>()
                        .join(" \\ ")
                }
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        format!("{} \\rightarrow {}", escape::tex(self.left), right)
    }
}

#[derive(Debug, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{l}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[derive(Debug, Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

/// The nullable/FIRST/FOLLOW report, one row per non-terminal
/// (augmented start included, last).
#[derive(Debug, Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

#[derive(Debug, Serialize)]
pub struct ConflictOutput<'a> {
    pub non_terminal: &'a str,
    pub terminal: &'a str,
    pub productions: Vec<ProductionOutput<'a>>,
}

/// The LL(1) table report: terminals across, non-terminals down, each
/// cell listing every claiming production (more than one only on a
/// conflict), plus the structured conflict list.
#[derive(Debug, Serialize)]
pub struct LL1TableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<Vec<ProductionOutput<'a>>>)>,
    conflicts: Vec<ConflictOutput<'a>>,
}

impl LL1TableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(row.iter().map(|productions| {
                productions
                    .iter()
                    .map(|production| production.to_plaintext(left.len(), false))
                    .collect::<Vec<_>>()
                    .join(", ")
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| output.iter().map(|line| line[j].len()).max().unwrap())
            .collect();
        let table = output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        if self.conflicts.is_empty() {
            table
        } else {
            let notes = self
                .conflicts
                .iter()
                .map(|c| {
                    format!(
                        "conflict at ({}, {}): {}",
                        c.non_terminal,
                        c.terminal,
                        c.productions
                            .iter()
                            .map(|p| p.to_plaintext(0, false))
                            .collect::<Vec<_>>()
                            .join(" / ")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}\n{}", table, notes)
        }
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![escape::tex(*left).to_string()];
            line.extend(row.iter().map(|productions| {
                let cell = productions
                    .iter()
                    .map(|production| production.to_latex())
                    .collect::<Vec<_>>()
                    .join("; ");
                if productions.len() > 1 {
                    format!("{{\\color{{red}}{}}}", cell)
                } else {
                    cell
                }
            }));
            output.push(line.join(" & "));
        }
        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn conflicts(&self) -> &[ConflictOutput<'_>] {
        &self.conflicts
    }
}

impl Analysis {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let grammar = self.grammar();
        let productions = grammar
            .non_terminal_iter()
            .map(|nt| ProductionOutput {
                left: nt.name.as_str(),
                rights: grammar
                    .productions_of(nt.index)
                    .map(|p| grammar.production_to_vec_str(p))
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }

    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let grammar = self.grammar();
        let nullable = self.nullable();
        let first = self.first();
        let follow = self.follow();

        let mut data = Vec::new();
        for nt in grammar.non_terminal_iter() {
            let mut t = NonTerminalOutput {
                name: nt.name.as_str(),
                nullable: nullable.contains(nt.index),
                first: first
                    .first(nt.index)
                    .iter()
                    .map(|&idx| grammar.get_symbol_name(idx))
                    .collect(),
                follow: follow
                    .follow(nt.index)
                    .iter()
                    .map(|&idx| grammar.get_symbol_name(idx))
                    .collect(),
            };
            t.first.sort_unstable();
            t.follow.sort_unstable();

            if t.nullable {
                t.first.push(EPSILON);
            }
            data.push(t);
        }
        NonTerminalOutputVec { data }
    }

    pub fn to_ll1_table_output(&self) -> LL1TableOutput {
        let grammar = self.grammar();
        let table = self.table();

        let terminals: Vec<(usize, &str)> = grammar.terminal_iter().collect();

        let mut rows = Vec::new();
        for nt in grammar.non_terminal_iter() {
            let mut row: Vec<Vec<ProductionOutput>> = Vec::new();
            for &(terminal, _) in &terminals {
                let mut cell: Vec<usize> = Vec::new();
                if let Some(winner) = table.production_for(nt.index, terminal) {
                    cell.push(winner);
                }
                if let Some(conflict) = table
                    .conflicts()
                    .iter()
                    .find(|c| c.non_terminal == nt.index && c.terminal == terminal)
                {
                    cell.extend(conflict.productions.iter().skip(1).copied());
                }
                row.push(
                    cell.into_iter()
                        .map(|id| ProductionOutput {
                            left: nt.name.as_str(),
                            rights: vec![grammar.production_to_vec_str(grammar.production(id))],
                        })
                        .collect(),
                );
            }
            rows.push((nt.name.as_str(), row));
        }

        let conflicts = table
            .conflicts()
            .iter()
            .map(|c| ConflictOutput {
                non_terminal: grammar.get_symbol_name(c.non_terminal),
                terminal: grammar.get_symbol_name(c.terminal),
                productions: c
                    .productions
                    .iter()
                    .map(|&id| {
                        let p = grammar.production(id);
                        ProductionOutput {
                            left: grammar.get_symbol_name(p.lhs),
                            rights: vec![grammar.production_to_vec_str(p)],
                        }
                    })
                    .collect(),
            })
            .collect();

        LL1TableOutput {
            terminals: terminals.into_iter().map(|(_, name)| name).collect(),
            rows,
            conflicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grammar;

    #[test]
    fn nullable_first_follow_report() {
        let analysis = Analysis::new(Grammar::parse("S -> A a | b\nA -> a").unwrap());
        let out = analysis.to_non_terminal_output_vec();
        let text = out.to_plaintext();
        assert!(text.contains("S | false | a, b | $"));
        assert!(text.contains("A | false | a | a"));

        let json: serde_json::Value = serde_json::from_str(&out.to_json()).unwrap();
        assert_eq!(json["data"][0]["name"], "S");
        assert_eq!(json["data"][0]["first"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn printed_first_of_nullable_non_terminal_carries_epsilon_marker() {
        let analysis = Analysis::new(Grammar::parse("S -> A b\nA -> a | ε").unwrap());
        let text = analysis.to_non_terminal_output_vec().to_plaintext();
        assert!(text.contains("A | true | a, ε | b"));
    }

    #[test]
    fn production_listing_prints_epsilon_alternatives() {
        let analysis = Analysis::new(Grammar::parse("S -> a\n | ε").unwrap());
        let text = analysis.to_production_output_vec().to_plaintext();
        assert!(text.contains("S -> a"));
        assert!(text.contains("| ε"));
    }

    #[test]
    fn conflicted_cell_lists_every_claimant() {
        let analysis = Analysis::new(Grammar::parse("S -> a b | a c").unwrap());
        let out = analysis.to_ll1_table_output();
        assert_eq!(out.conflicts().len(), 1);

        let text = out.to_plaintext();
        assert!(text.contains("conflict at (S, a)"));
        assert!(text.contains("S -> a b"));
        assert!(text.contains("S -> a c"));
    }
}
