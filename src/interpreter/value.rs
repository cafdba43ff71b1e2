use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interpreter::builtin::Builtin;
use crate::interpreter::env::Frame;
use crate::interpreter::function::{Function, Lambda};
use crate::lerr;
use crate::reader::{Node, NodeKind};

/// Every runtime value. Each variant owns its children outright, so `clone` is a deep copy
/// and dropping a value releases the whole tree.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(i64),
    Error(String),
    Symbol(String),

    /// `( ... )`, evaluated as an application.
    EvalList(Vec<Value>),
    /// `{ ... }`, never evaluated on its own.
    LiteralList(Vec<Value>),

    Function(Function),
}

impl Value {
    pub fn number(n: i64) -> Value { Value::Number(n) }

    pub fn symbol(name: &str) -> Value { Value::Symbol(name.into()) }

    pub fn eval_list(cells: Vec<Value>) -> Value { Value::EvalList(cells) }

    pub fn literal_list(cells: Vec<Value>) -> Value { Value::LiteralList(cells) }

    pub fn builtin(op: Builtin) -> Value { Value::Function(Function::Builtin(op)) }

    pub fn lambda(formals: Vec<Value>, body: Vec<Value>, env: Frame) -> Value { Value::Function(Function::Lambda(Lambda { formals, body, env })) }

    /// `()`, what binding forms return.
    pub fn unit() -> Value { Value::EvalList(vec![]) }

    pub fn is_error(&self) -> bool { matches!(self, Value::Error(_)) }

    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Number(_) => "Number",
            Value::Error(_) => "Error",
            Value::Symbol(_) => "Symbol",
            Value::EvalList(_) => "S-Expression",
            Value::LiteralList(_) => "Q-Expression",
            Value::Function(_) => "Function",
        }
    }

    pub fn into_cells(self) -> Option<Vec<Value>> {
        match self {
            Value::EvalList(cells) | Value::LiteralList(cells) => Some(cells),
            _ => None,
        }
    }

    /// Build a value from an externally parsed tree. Malformed leaves become error values,
    /// they never abort the read.
    pub fn from_node(node: &Node) -> Value {
        match node.kind() {
            NodeKind::Number => match node.contents.trim().parse::<i64>() {
                Ok(n) => Value::Number(n),
                Err(_) => lerr!("invalid number"),
            },
            NodeKind::Symbol => Value::Symbol(node.contents.clone()),
            NodeKind::EvalList => Value::EvalList(Value::read_children(node)),
            NodeKind::LiteralList => Value::LiteralList(Value::read_children(node)),
            NodeKind::Skip | NodeKind::Unknown => lerr!("Cannot read node tagged '{}'.", node.tag),
        }
    }

    fn read_children(node: &Node) -> Vec<Value> {
        node.children
            .iter()
            .filter(|child| !child.is_structural())
            .map(Value::from_node)
            .collect()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::EvalList(a), Value::EvalList(b)) => a == b,
            (Value::LiteralList(a), Value::LiteralList(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

pub(crate) fn write_cells(f: &mut fmt::Formatter, open: char, cells: &[Value], close: char) -> fmt::Result {
    let strs: Vec<String> = cells.iter().map(|v| v.to_string()).collect();
    write!(f, "{}{}{}", open, strs.join(" "), close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Error(ref msg) => write!(f, "Error: {}", msg),
            Value::Symbol(ref name) => write!(f, "{}", name),
            Value::EvalList(ref cells) => write_cells(f, '(', cells, ')'),
            Value::LiteralList(ref cells) => write_cells(f, '{', cells, '}'),
            Value::Function(ref func) => write!(f, "{}", func),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value { Value::Number(n) }
}
