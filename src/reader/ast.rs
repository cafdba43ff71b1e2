use serde::{Deserialize, Serialize};

/// One node of an externally parsed tree.
///
/// `tag` carries the parser's rule path (`"expr|number|regex"`, `"sexpr"`, `">"` for the root...),
/// `contents` the matched text of leaves and bracket tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Number,
    Symbol,
    /// The root (`>`) or an explicit `( ... )`.
    EvalList,
    /// `{ ... }`
    LiteralList,
    /// Brackets, regex anchors and comments: structure only, never read.
    Skip,
    Unknown,
}

const BRACKETS: [&str; 4] = ["(", ")", "{", "}"];

impl Node {
    pub fn leaf(tag: &str, contents: &str) -> Node {
        Node {
            tag: tag.into(),
            contents: contents.into(),
            children: vec![],
        }
    }

    pub fn branch(tag: &str, children: Vec<Node>) -> Node {
        Node {
            tag: tag.into(),
            contents: String::new(),
            children,
        }
    }

    /// Classify by tag. Order matters: `number`/`symbol` leaves win over list tags.
    pub fn kind(&self) -> NodeKind {
        let tag = self.tag.as_str();
        if tag.contains("number") {
            NodeKind::Number
        } else if tag.contains("symbol") {
            NodeKind::Symbol
        } else if tag == ">" || tag.contains("sexpr") {
            NodeKind::EvalList
        } else if tag.contains("qexpr") {
            NodeKind::LiteralList
        } else if self.is_structural() {
            NodeKind::Skip
        } else {
            NodeKind::Unknown
        }
    }

    /// Tokens the parser keeps for its own bookkeeping.
    pub fn is_structural(&self) -> bool {
        self.tag == "regex" || self.tag.contains("comment") || BRACKETS.contains(&self.contents.as_str())
    }
}
