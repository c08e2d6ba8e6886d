use std::{fs, io::BufRead};

use ll1_analyzer::{Analysis, Grammar, GrammarDescription};

fn print_help() {
    println!("Usage: ll1-analyzer outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  nff: Nullable, first and follow sets");
    println!("  ll1: LL(1) parsing table and conflicts");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!();
    println!("The grammar is read from the file (or stdin) either as");
    println!("\"A -> x y | z\" rules or, when the input starts with '{{',");
    println!("as a JSON grammar description.");
}

enum OutputFormat {
    Plain,
    LaTeX,
    Json,
}

fn main() {
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && ["prod", "nff", "ll1"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    while i < args.len() && ["-h", "--help", "-l", "-j"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::Json;
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        std::process::exit(2);
    }

    let input: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .map(|l| l.expect("Failed to read stdin"))
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        match fs::read_to_string(args[i].as_str()) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("{}: {}", args[i], e);
                std::process::exit(1);
            }
        }
    };

    let grammar = if input.trim_start().starts_with('{') {
        serde_json::from_str::<GrammarDescription>(&input)
            .map_err(|e| e.to_string())
            .and_then(|desc| Grammar::from_description(&desc).map_err(|e| e.to_string()))
    } else {
        Grammar::parse(&input).map_err(|e| e.to_string())
    };
    let grammar = match grammar {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for warning in grammar.warnings() {
        eprintln!("warning: {}", warning);
    }

    let analysis = Analysis::new(grammar);
    for output in outputs {
        if output == "prod" {
            let t = analysis.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "nff" {
            let t = analysis.to_non_terminal_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "ll1" {
            let t = analysis.to_ll1_table_output();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
            if !analysis.table().is_ll1() {
                eprintln!("warning: grammar is not LL(1)");
            }
        }
    }
}
