use crate::environment::Cost;

/// Index of a node in a [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One generated node.
#[derive(Debug, Clone)]
pub struct Node<S, A> {
    pub state: S,
    pub parent: Option<NodeId>,
    /// Action taken from the parent; `None` only for the root.
    pub action: Option<A>,
    /// Path cost from the root.
    pub g: Cost,
    pub depth: usize,
}

/// Append-only arena of search nodes linked by parent pointers.
#[derive(Debug)]
pub struct SearchTree<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A: Clone> SearchTree<S, A> {
    /// Creates a tree holding only the root.
    pub fn new(root: S) -> (Self, NodeId) {
        let tree = Self {
            nodes: vec![Node {
                state: root,
                parent: None,
                action: None,
                g: 0.0,
                depth: 0,
            }],
        };
        (tree, NodeId(0))
    }

    /// Adds a child of `parent` reached by `action` at `step_cost`.
    pub fn push(&mut self, parent: NodeId, action: A, state: S, step_cost: Cost) -> NodeId {
        let (g, depth) = {
            let p = &self.nodes[parent.0];
            (p.g + step_cost, p.depth + 1)
        };
        self.nodes.push(Node {
            state,
            parent: Some(parent),
            action: Some(action),
            g,
            depth,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Actions from the root to `id`, in order.
    pub fn path_to(&self, id: NodeId) -> Vec<A> {
        let mut actions = Vec::with_capacity(self.nodes[id.0].depth);
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current.0];
            if let Some(action) = &node.action {
                actions.push(action.clone());
            }
            cursor = node.parent;
        }
        actions.reverse();
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_reconstruction() {
        let (mut tree, root) = SearchTree::new('A');
        let b = tree.push(root, "to-b", 'B', 1.5);
        let c = tree.push(b, "to-c", 'C', 2.0);
        let _d = tree.push(root, "to-d", 'D', 9.0);

        assert_eq!(tree.path_to(c), vec!["to-b", "to-c"]);
        assert_eq!(tree.get(c).depth, 2);
        assert!((tree.get(c).g - 3.5).abs() < 1e-12);
        assert!(tree.path_to(root).is_empty());
        assert_eq!(tree.len(), 4);
    }
}
