use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interpreter::builtin::Builtin;
use crate::interpreter::env::Frame;
use crate::interpreter::value::{write_cells, Value};

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Function {
    Builtin(Builtin),
    Lambda(Lambda),
}

/// A user-defined function. `env` holds the arguments bound so far by partial application;
/// it is owned by this value and has no parent until the lambda is called.
#[derive(Clone, Serialize, Deserialize)]
pub struct Lambda {
    pub formals: Vec<Value>,
    pub body: Vec<Value>,
    pub env: Frame,
}

/// Formals and body decide equality, bound arguments do not.
impl PartialEq for Lambda {
    fn eq(&self, other: &Lambda) -> bool { self.formals == other.formals && self.body == other.body }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Function::Builtin(_) => write!(f, "<builtin>"),
            Function::Lambda(ref lambda) => {
                write!(f, "(\\ ")?;
                write_cells(f, '{', &lambda.formals, '}')?;
                write!(f, " ")?;
                write_cells(f, '{', &lambda.body, '}')?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Function::Builtin(op) => write!(f, "<builtin:{}>", op.name()),
            Function::Lambda(_) => write!(f, "{}", self),
        }
    }
}
