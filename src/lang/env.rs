use crate::lang::value::{RegId, Value};

/// An ordered set of name→value bindings. Entries are kept sorted by name so
/// a find is a prefix traversal that stops at the matching entry or at the
/// insertion point before the first greater name. Both insert and lookup are
/// linear over a small bounded collection.
pub struct Env {
    items: Vec<(String, Value)>,
    cap: usize,
}

impl Env {
    pub fn new(cap: usize) -> Self {
        Env {
            items: Vec::new(),
            cap,
        }
    }

    /// Index of the matching entry, or of the first entry greater than
    /// `name` (== `items.len()` when every entry is smaller).
    fn find(&self, name: &str) -> usize {
        self.items
            .iter()
            .position(|(n, _)| n.as_str() >= name)
            .unwrap_or(self.items.len())
    }

    /// Inserts a binding in sorted position. Returns false (and leaves the
    /// environment untouched) if the name is already bound.
    pub fn bind(&mut self, name: &str, val: Value) -> bool {
        let at = self.find(name);
        if at < self.items.len() && self.items[at].0 == name {
            return false;
        }
        assert!(self.items.len() < self.cap, "environment overflow");
        self.items.insert(at, (name.to_string(), val));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let at = self.find(name);
        match self.items.get(at) {
            Some((n, val)) if n == name => Some(val),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(n, _)| n.as_str())
    }
}

/// One lexical scope: its bindings plus the running register count, which a
/// child scope inherits at push so child allocations never collide with the
/// parent's.
pub struct Scope {
    pub bindings: Env,
    pub reg_count: RegId,
}

impl Scope {
    pub fn new(env_cap: usize, reg_count: RegId) -> Self {
        Scope {
            bindings: Env::new(env_cap),
            reg_count,
        }
    }
}
