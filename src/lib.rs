//! A tree-walking evaluator for a small S-expression / Q-expression language.
//!
//! Source text is never parsed here: trees come from an external parser (see [`reader`]),
//! are read into [`Value`]s and evaluated by an [`Interpreter`].

pub mod error;
pub mod interpreter;
pub mod reader;

pub use error::Error;
pub use interpreter::{Interpreter, Value};
