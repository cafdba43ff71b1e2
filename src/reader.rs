//! The inbound boundary: syntax trees produced by an external parser.
//!
//! Nothing here tokenizes text. Trees arrive already built, usually decoded from JSON, and
//! [`crate::interpreter::Value::from_node`] turns them into values.

pub mod ast;

pub use ast::{Node, NodeKind};

use std::io::Read;

use crate::Error;

/// Decode every JSON tree in `input`, in order. Documents may be separated by any whitespace.
pub fn read_nodes<R: Read>(input: R) -> Result<Vec<Node>, Error> {
    serde_json::Deserializer::from_reader(input)
        .into_iter::<Node>()
        .map(|node| node.map_err(Error::from))
        .collect()
}

pub fn read_nodes_from_str(src: &str) -> Result<Vec<Node>, Error> { read_nodes(src.as_bytes()) }
