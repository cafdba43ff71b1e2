use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::interpreter::builtin::BUILTINS;
use crate::interpreter::value::Value;
use crate::lerr;

/// Index of a live frame inside an [`Env`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScopeId(usize);

/// One level of the scope chain. Bindings keep insertion order and names are unique.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(skip)]
    parent: Option<ScopeId>,
    bindings: Vec<(String, Value)>,
}

impl Frame {
    pub fn new() -> Frame { Frame::default() }

    pub fn parent(&self) -> Option<ScopeId> { self.parent }

    pub fn lookup(&self, name: &str) -> Option<&Value> { self.bindings.iter().find(|(key, _)| key == name).map(|(_, value)| value) }

    // Rebinding drops the old value in place
    pub fn put(&mut self, name: &str, value: Value) {
        match self.bindings.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.bindings.push((name.to_string(), value)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.bindings.iter().map(|(key, _)| key.as_str()) }

    pub fn len(&self) -> usize { self.bindings.len() }

    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        match self.parent {
            Some(ScopeId(parent)) => write!(f, "<Frame {:?} ^{}>", names, parent),
            None => write!(f, "<Frame {:?}>", names),
        }
    }
}

/// Arena of frames. Frame 0 is the root; frames entered for a call are released in
/// reverse order, so the arena behaves as a stack and parents are always older entries.
#[derive(Debug)]
pub struct Env {
    frames: Vec<Frame>,
}

impl Default for Env {
    fn default() -> Self { Env::new() }
}

impl Env {
    pub const ROOT: ScopeId = ScopeId(0);

    /// An empty root, no builtins.
    pub fn new() -> Env { Env { frames: vec![Frame::new()] } }

    /// A root with the whole builtin catalog bound under its canonical names.
    pub fn with_builtins() -> Env {
        let mut env = Env::new();
        for (name, op) in BUILTINS.entries() {
            env.def(Env::ROOT, name, Value::builtin(*op));
        }
        env
    }

    /// Attach `frame` as a child of `parent` and return its scope.
    pub(crate) fn enter(&mut self, parent: ScopeId, mut frame: Frame) -> ScopeId {
        debug_assert!(parent.0 < self.frames.len(), "entering below a released frame");
        frame.parent = Some(parent);
        self.frames.push(frame);
        let scope = ScopeId(self.frames.len() - 1);
        trace!(scope = scope.0, parent = parent.0, "enter frame");
        scope
    }

    /// Release `scope` and anything entered after it. The root is never released.
    pub(crate) fn leave(&mut self, scope: ScopeId) {
        if scope != Env::ROOT {
            trace!(scope = scope.0, "leave frame");
            self.frames.truncate(scope.0);
        }
    }

    pub(crate) fn frame(&self, scope: ScopeId) -> &Frame { &self.frames[scope.0] }

    pub fn depth(&self) -> usize { self.frames.len() }

    /// Walk outward from `scope`, returning a copy of the first binding found.
    pub fn get(&self, scope: ScopeId, name: &str) -> Value {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = &self.frames[id.0];
            if let Some(value) = frame.lookup(name) {
                return value.clone();
            }
            current = frame.parent;
        }
        lerr!("Unbound Symbol: `{}`", name)
    }

    /// Bind in the nearest frame only.
    pub fn put(&mut self, scope: ScopeId, name: &str, value: Value) {
        trace!(scope = scope.0, name, "put");
        self.frames[scope.0].put(name, value)
    }

    /// Bind in the root of the chain that `scope` belongs to.
    pub fn def(&mut self, scope: ScopeId, name: &str, value: Value) {
        let root = self.root_of(scope);
        trace!(scope = root.0, name, "def");
        self.frames[root.0].put(name, value)
    }

    /// Deep copy of every binding visible from `scope` below the root, inner frames
    /// shadowing outer ones. This is what a lambda closes over.
    pub(crate) fn capture(&self, scope: ScopeId) -> Frame {
        let mut chain = vec![];
        let mut current = scope;
        while let Some(parent) = self.frames[current.0].parent {
            chain.push(current);
            current = parent;
        }

        let mut captured = Frame::new();
        for id in chain.into_iter().rev() {
            for (name, value) in self.frames[id.0].bindings.iter() {
                captured.put(name, value.clone());
            }
        }
        captured
    }

    pub(crate) fn root_of(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        while let Some(parent) = self.frames[current.0].parent {
            current = parent;
        }
        current
    }
}

#[cfg(test)]
mod test_env {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unbound_symbol() {
        let env = Env::new();
        assert_eq!(env.get(Env::ROOT, "nope"), lerr!("Unbound Symbol: `nope`"));
    }

    #[test]
    fn test_put_rebinds_in_place() {
        let mut env = Env::new();
        env.put(Env::ROOT, "x", Value::number(1));
        env.put(Env::ROOT, "y", Value::number(2));
        env.put(Env::ROOT, "x", Value::number(3));
        assert_eq!(env.get(Env::ROOT, "x"), Value::number(3));
        assert_eq!(env.frame(Env::ROOT).names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut env = Env::new();
        env.put(Env::ROOT, "x", Value::number(1));
        let child = env.enter(Env::ROOT, Frame::new());
        let grandchild = env.enter(child, Frame::new());
        env.put(child, "y", Value::number(2));
        assert_eq!(env.get(grandchild, "x"), Value::number(1));
        assert_eq!(env.get(grandchild, "y"), Value::number(2));
        assert!(env.get(Env::ROOT, "y").is_error());
    }

    #[test]
    fn test_put_shadows_def_writes_root() {
        let mut env = Env::new();
        env.put(Env::ROOT, "x", Value::number(5));
        let child = env.enter(Env::ROOT, Frame::new());

        env.put(child, "x", Value::number(7));
        assert_eq!(env.get(child, "x"), Value::number(7));
        assert_eq!(env.get(Env::ROOT, "x"), Value::number(5));

        env.def(child, "x", Value::number(10));
        assert_eq!(env.get(Env::ROOT, "x"), Value::number(10));
        assert_eq!(env.get(child, "x"), Value::number(7));
    }

    #[test]
    fn test_leave_releases_frames() {
        let mut env = Env::new();
        let child = env.enter(Env::ROOT, Frame::new());
        env.enter(child, Frame::new());
        assert_eq!(env.depth(), 3);
        env.leave(child);
        assert_eq!(env.depth(), 1);
        env.leave(Env::ROOT);
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_get_returns_a_copy() {
        let mut env = Env::new();
        env.put(Env::ROOT, "l", Value::literal_list(vec![Value::number(1)]));
        let mut copy = env.get(Env::ROOT, "l");
        if let Value::LiteralList(ref mut cells) = copy {
            cells.push(Value::number(2));
        }
        assert_eq!(env.get(Env::ROOT, "l").to_string(), "{1}");
    }

    #[test]
    fn test_capture_skips_root_and_shadows() {
        let mut env = Env::new();
        env.put(Env::ROOT, "g", Value::number(0));
        let outer = env.enter(Env::ROOT, Frame::new());
        env.put(outer, "x", Value::number(1));
        env.put(outer, "y", Value::number(2));
        let inner = env.enter(outer, Frame::new());
        env.put(inner, "x", Value::number(3));

        let captured = env.capture(inner);
        assert_eq!(captured.lookup("x"), Some(&Value::number(3)));
        assert_eq!(captured.lookup("y"), Some(&Value::number(2)));
        assert_eq!(captured.lookup("g"), None);
        assert_eq!(captured.parent(), None);
        assert!(env.capture(Env::ROOT).is_empty());

        // later rebinding in the live frame does not reach the copy
        env.put(outer, "y", Value::number(9));
        assert_eq!(captured.lookup("y"), Some(&Value::number(2)));
    }

    #[test]
    fn test_builtins_bound() {
        let env = Env::with_builtins();
        for name in ["+", "-", "*", "/", "list", "head", "tail", "join", "eval", "def", "=", "\\"] {
            assert!(matches!(env.get(Env::ROOT, name), Value::Function(_)), "{} is not bound", name);
        }
    }
}
