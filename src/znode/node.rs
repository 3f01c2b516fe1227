use crate::znode::path;

/// One znode of a snapshot together with everything beneath it.
///
/// Children are owned exclusively by their parent. A child's `path` is always
/// its parent's `path` with one segment appended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub path: String,
    pub data: Vec<u8>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Node {
            path: path.into(),
            data: data.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// The last segment of this node's path, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        path::final_segment(&self.path)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_includes_every_descendant() {
        let tree = Node::new("/a", "x").with_children(vec![
            Node::new("/a/b", "y").with_children(vec![Node::new("/a/b/c", "")]),
            Node::new("/a/d", ""),
        ]);

        assert_eq!(tree.count(), 4);
        assert_eq!(tree.children[1].count(), 1);
    }

    #[test]
    fn name_is_the_final_segment() {
        assert_eq!(Node::new("/a/b", "").name(), Some("b"));
        assert_eq!(Node::new("/", "").name(), None);
    }
}
