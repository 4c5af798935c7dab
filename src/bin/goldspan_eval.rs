//! CLI tool for span resolution and coreference scoring.
//!
//! Usage:
//!   goldspan-eval <COMMAND> [ARGS]
//!
//! Commands:
//!   eval     Score a predicted corpus against a gold corpus
//!   resolve  Resolve gold spans against a candidate span list
//!
//! Examples:
//!   goldspan-eval eval dev.jsonl dev.predictions.jsonl
//!   goldspan-eval resolve 0:2,1:1,3:5 1:1,3:5
//!   goldspan-eval resolve 5:6,0:1 5:6,0:1 --sorted

use std::env;
use std::process;

use goldspan::cluster::{load_jsonl, pair_documents};
use goldspan::eval::evaluate_corpus;
use goldspan::{Result, Span, SpanResolver};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "eval" | "e" => run_eval(&args[2..]),
        "resolve" | "r" => run_resolve(&args[2..]),
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        "version" | "-V" | "--version" => {
            println!("goldspan-eval {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"goldspan-eval - span resolution and coreference scoring

USAGE:
    goldspan-eval <COMMAND> [ARGS]

COMMANDS:
    eval, e       Score a predicted corpus against a gold corpus
                  goldspan-eval eval <gold.jsonl> <predicted.jsonl>
    resolve, r    Resolve gold spans against candidates
                  goldspan-eval resolve <candidates> <gold> [--sorted]
                  Span lists are comma-separated start:end pairs.
    help          Print this help message
    version       Print version

EXAMPLES:
    # Corpus-level MUC / B³ / CEAF-e / LEA / CoNLL report
    goldspan-eval eval dev.jsonl dev.predictions.jsonl

    # Which candidate positions hold the gold spans?
    goldspan-eval resolve 0:2,1:1,3:5 1:1,3:5

    # Same, re-expressed in canonical span order
    goldspan-eval resolve 5:6,0:1 5:6,0:1 --sorted
"#
    );
}

fn run_eval(args: &[String]) -> Result<()> {
    let (gold_path, predicted_path) = match args {
        [gold, predicted] => (gold, predicted),
        _ => {
            eprintln!("Usage: goldspan-eval eval <gold.jsonl> <predicted.jsonl>");
            process::exit(1);
        }
    };

    let gold = load_jsonl(gold_path)?;
    let predicted = load_jsonl(predicted_path)?;
    let report = evaluate_corpus(&pair_documents(&gold, &predicted));
    print!("{}", report);
    Ok(())
}

fn run_resolve(args: &[String]) -> Result<()> {
    let (candidates_arg, gold_arg, sorted) = match args {
        [candidates, gold] => (candidates, gold, false),
        [candidates, gold, flag] if flag.as_str() == "--sorted" => (candidates, gold, true),
        _ => {
            eprintln!("Usage: goldspan-eval resolve <candidates> <gold> [--sorted]");
            process::exit(1);
        }
    };

    let candidates = parse_spans(candidates_arg)?;
    let gold = parse_spans(gold_arg)?;

    let indices = SpanResolver::new().sorted(sorted).resolve(&candidates, &gold)?;
    for &i in &indices {
        println!("{}\t{}", i, candidates[i]);
    }
    Ok(())
}

/// Parse a comma-separated list of `start:end` pairs.
fn parse_spans(arg: &str) -> Result<Vec<Span>> {
    arg.split(',')
        .map(|pair| {
            let (start, end) = pair.split_once(':').ok_or_else(|| {
                goldspan::Error::invalid_input(format!("expected start:end, got {:?}", pair))
            })?;
            let start = start.trim().parse::<u32>().map_err(|e| {
                goldspan::Error::invalid_input(format!("bad start in {:?}: {}", pair, e))
            })?;
            let end = end.trim().parse::<u32>().map_err(|e| {
                goldspan::Error::invalid_input(format!("bad end in {:?}: {}", pair, e))
            })?;
            Ok(Span::new(start, end))
        })
        .collect()
}
