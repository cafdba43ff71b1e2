pub mod builtin;
pub mod env;
pub mod error;
pub mod eval;
pub mod function;
pub mod json;
pub mod value;


pub use builtin::{Builtin, BUILTINS};
pub use env::{Env, Frame, ScopeId};
pub use function::{Function, Lambda};
pub use value::Value;

use tracing::debug;

use crate::reader::Node;

pub fn new() -> Interpreter { Interpreter::new() }

/// One root environment plus the entry points that evaluate against it. Independent
/// interpreters share nothing.
#[derive(Debug)]
pub struct Interpreter {
    env: Env,
}

impl Default for Interpreter {
    fn default() -> Self { Interpreter::new() }
}

impl Interpreter {
    pub fn new() -> Interpreter { Interpreter { env: Env::with_builtins() } }

    /// An interpreter over a caller-prepared root, e.g. one without builtins.
    pub fn with_env(env: Env) -> Interpreter { Interpreter { env } }

    pub fn env(&self) -> &Env { &self.env }

    pub fn eval(&mut self, val: Value) -> Value {
        debug!("eval / {}", val);
        let result = eval::eval(&mut self.env, Env::ROOT, val);
        debug!("eval => {}", result);
        result
    }

    pub fn eval_node(&mut self, node: &Node) -> Value { self.eval(Value::from_node(node)) }

    /// Evaluate trees in order, sharing definitions between them.
    pub fn run(&mut self, nodes: &[Node]) -> Vec<Value> { nodes.iter().map(|node| self.eval_node(node)).collect() }
}
