//! REPL implementation.

use std::io::{self, BufRead, Write};

use crate::session::{ExecResult, Session, SessionError};

/// REPL error.
#[derive(Debug)]
pub struct ReplError {
    pub message: String,
}

impl std::fmt::Display for ReplError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ReplError {}

impl From<SessionError> for ReplError {
    fn from(e: SessionError) -> Self {
        ReplError { message: e.message }
    }
}

impl From<io::Error> for ReplError {
    fn from(e: io::Error) -> Self {
        ReplError {
            message: e.to_string(),
        }
    }
}

/// Interactive loop over a [`Session`].
pub struct Repl {
    session: Session,
}

impl Repl {
    pub fn new() -> Self {
        Repl {
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Load and execute a file.
    pub fn load_file(&mut self, path: &str) -> Result<String, ReplError> {
        let source = std::fs::read_to_string(path)?;
        let results = self.session.execute_source(&source)?;
        let queries = results
            .iter()
            .filter(|r| matches!(r, ExecResult::Query { .. }))
            .count();
        Ok(format!(
            "loaded {}: {} statements, {} queries",
            path,
            results.len(),
            queries
        ))
    }

    /// Process one line of input, returning the text to display.
    pub fn process_line(&mut self, line: &str) -> Result<String, ReplError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(String::new());
        }
        if let Some(command) = line.strip_prefix(':') {
            return self.process_command(command);
        }
        let results = self.session.execute_source(line)?;
        let mut out = Vec::new();
        for r in results {
            let text = format_result(&r);
            if !text.is_empty() {
                out.push(text);
            }
        }
        Ok(out.join("\n"))
    }

    fn process_command(&mut self, command: &str) -> Result<String, ReplError> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        match parts.as_slice() {
            ["quit"] | ["q"] | ["exit"] => Ok("Goodbye!".to_string()),
            ["help"] | ["h"] => Ok(HELP.to_string()),
            ["load", path] | ["l", path] => self.load_file(path),
            ["set", key, value] => {
                self.session.set_option(key, value)?;
                Ok(format!("{} = {}", key, value))
            }
            ["load"] | ["l"] => Err(ReplError {
                message: "Usage: :load <filename>".to_string(),
            }),
            ["set", ..] => Err(ReplError {
                message: "Usage: :set <option> <on|off>".to_string(),
            }),
            _ => Err(ReplError {
                message: format!("unknown command ':{}'; try :help", command),
            }),
        }
    }

    /// Run the interactive loop over stdin until :quit or end of input.
    pub fn run(&mut self) -> Result<(), ReplError> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            print!("> ");
            stdout.flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }
            let trimmed = line.trim();
            if matches!(trimmed, ":quit" | ":q" | ":exit") {
                println!("Goodbye!");
                return Ok(());
            }
            match self.process_line(&line) {
                Ok(text) if text.is_empty() => {}
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Repl::new()
    }
}

fn format_result(result: &ExecResult) -> String {
    match result {
        ExecResult::Declared | ExecResult::Defined => String::new(),
        ExecResult::ClauseAdded => "ok".to_string(),
        ExecResult::Sensed => "sensed".to_string(),
        ExecResult::Query {
            entailed,
            satisfied,
        } => format!(
            "{} ({})",
            if *satisfied { "OK" } else { "FAILED" },
            if *entailed { "entailed" } else { "not entailed" }
        ),
    }
}

const HELP: &str = "\
Commands:
  Sort <s> [rigid]          declare a sort
  Name <n> -> <s>           declare a standard name
  Fun <f>/<arity> -> <s>    declare a function symbol
  Let <id> := <formula>     define a formula macro
  static(<formula>)         add a static clause
  box(<formula>)            add a clause holding after every action sequence
  Sense <a> -> <bool>       record a sensing outcome
  Assert [G] Know<k> <phi>  expect entailment at effort k
  Refute [G] Know<k> <phi>  expect non-entailment at effort k
REPL:
  :load <file>   :set <option> <on|off>   :help   :quit";
