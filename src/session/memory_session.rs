use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use crate::session::{NodeMetadata, Session, SessionError};
use crate::znode::path;

/// An in-memory namespace with fault injection for exercising the traversals.
#[derive(Debug)]
pub struct MemorySession {
    nodes: RefCell<BTreeMap<String, Vec<u8>>>,
    failing_gets: HashSet<String>,
    disconnected: bool,
    calls: Cell<usize>,
    mutations: Cell<usize>,
}

impl MemorySession {
    /// A namespace holding only the root node.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Vec::new());
        MemorySession {
            nodes: RefCell::new(nodes),
            failing_gets: HashSet::new(),
            disconnected: false,
            calls: Cell::new(0),
            mutations: Cell::new(0),
        }
    }

    /// A session on which every call fails with [`SessionError::ConnectionLoss`].
    pub fn disconnected() -> Self {
        MemorySession {
            disconnected: true,
            ..Self::new()
        }
    }

    /// Seeds a node without counting it as a mutation. Missing ancestors are created empty.
    pub fn with_node(self, node_path: &str, data: &[u8]) -> Self {
        {
            let mut nodes = self.nodes.borrow_mut();
            let mut current = String::from("/");
            for segment in node_path.split('/').filter(|s| !s.is_empty()) {
                current = path::join(&current, segment);
                nodes.entry(current.clone()).or_default();
            }
            nodes.insert(node_path.to_string(), data.to_vec());
        }
        self
    }

    /// Makes `get` on `node_path` fail with [`SessionError::NoNode`] while it is still listed.
    pub fn with_failing_get(mut self, node_path: &str) -> Self {
        self.failing_gets.insert(node_path.to_string());
        self
    }

    pub fn data(&self, node_path: &str) -> Option<Vec<u8>> {
        self.nodes.borrow().get(node_path).cloned()
    }

    pub fn contains(&self, node_path: &str) -> bool {
        self.nodes.borrow().contains_key(node_path)
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    fn enter(&self) -> Result<(), SessionError> {
        self.calls.set(self.calls.get() + 1);
        if self.disconnected {
            Err(SessionError::ConnectionLoss)
        } else {
            Ok(())
        }
    }

    fn child_names(&self, parent: &str) -> Vec<String> {
        self.nodes
            .borrow()
            .keys()
            .filter_map(|key| {
                let rest = if parent == "/" {
                    key.strip_prefix('/')
                } else {
                    key.strip_prefix(parent)?.strip_prefix('/')
                }?;
                (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
            })
            .collect()
    }
}

impl Session for MemorySession {
    fn get(&self, node_path: &str) -> Result<(Vec<u8>, NodeMetadata), SessionError> {
        self.enter()?;
        if self.failing_gets.contains(node_path) {
            return Err(SessionError::NoNode);
        }
        let data = self.data(node_path).ok_or(SessionError::NoNode)?;
        let metadata = NodeMetadata {
            num_children: self.child_names(node_path).len(),
        };
        Ok((data, metadata))
    }

    fn list_children(&self, node_path: &str) -> Result<Vec<String>, SessionError> {
        self.enter()?;
        if !self.contains(node_path) {
            return Err(SessionError::NoNode);
        }
        Ok(self.child_names(node_path))
    }

    fn create(&self, node_path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.enter()?;
        if self.contains(node_path) {
            return Err(SessionError::NodeExists);
        }
        let parent = match node_path.rsplit_once('/') {
            Some(("", _)) => "/",
            Some((parent, _)) => parent,
            None => return Err(SessionError::NoNode),
        };
        if !self.contains(parent) {
            return Err(SessionError::NoNode);
        }
        self.nodes
            .borrow_mut()
            .insert(node_path.to_string(), data.to_vec());
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }

    fn set_data(&self, node_path: &str, data: &[u8]) -> Result<(), SessionError> {
        self.enter()?;
        let mut nodes = self.nodes.borrow_mut();
        let slot = nodes.get_mut(node_path).ok_or(SessionError::NoNode)?;
        *slot = data.to_vec();
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_creates_missing_ancestors() {
        let session = MemorySession::new().with_node("/a/b/c", b"leaf");

        assert!(session.contains("/a"));
        assert!(session.contains("/a/b"));
        assert_eq!(session.data("/a/b/c"), Some(b"leaf".to_vec()));
        assert_eq!(session.mutations(), 0);
    }

    #[test]
    fn lists_only_direct_children() {
        let session = MemorySession::new()
            .with_node("/a/b/c", b"")
            .with_node("/a/d", b"")
            .with_node("/ab", b"");

        assert_eq!(session.list_children("/a").unwrap(), vec!["b", "d"]);
        assert_eq!(session.list_children("/").unwrap(), vec!["a", "ab"]);
    }

    #[test]
    fn create_requires_parent() {
        let session = MemorySession::new();

        assert!(matches!(
            session.create("/missing/child", b""),
            Err(SessionError::NoNode)
        ));
        assert!(session.create("/top", b"").is_ok());
        assert!(matches!(
            session.create("/top", b""),
            Err(SessionError::NodeExists)
        ));
    }
}
