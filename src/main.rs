//! esllog CLI: run theory files or start an interactive session.

use esllog::repl::Repl;
use esllog::session::{ExecResult, Session};

fn main() {
    pretty_env_logger::init();
    let files: Vec<String> = std::env::args().skip(1).collect();
    if files.is_empty() {
        println!("esllog - limited-belief reasoning for the epistemic situation calculus");
        println!("Type :help for help, :quit to exit.\n");
        let mut repl = Repl::new();
        if let Err(e) = repl.run() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let mut failures = 0usize;
    for path in &files {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}: {}", path, e);
                std::process::exit(2);
            }
        };
        let mut session = Session::new();
        match session.execute_source(&source) {
            Ok(results) => {
                for (i, result) in results.iter().enumerate() {
                    if let ExecResult::Query {
                        entailed,
                        satisfied,
                    } = result
                    {
                        let verdict = if *satisfied { "OK" } else { "FAILED" };
                        println!(
                            "{}: query {}: {} ({})",
                            path,
                            i + 1,
                            verdict,
                            if *entailed { "entailed" } else { "not entailed" }
                        );
                        if !satisfied {
                            failures += 1;
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("{}: {}", path, e);
                std::process::exit(2);
            }
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}
