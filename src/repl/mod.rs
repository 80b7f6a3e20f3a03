//! Interactive read-eval-print loop.

#[allow(clippy::module_inception)]
mod repl;

pub use repl::Repl;
