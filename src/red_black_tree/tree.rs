use crate::arena::{Handle, TypedArena};
use crate::red_black_tree::node::{Color, Node, Side};
use crate::red_black_tree::{Error, Result};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// The balancing engine behind `RedBlackSet<T>`.
///
/// Every node lives in `arena` and refers to its neighbours through handles. The tree caches the
/// handles of its minimum and maximum nodes so both ends are reachable in constant time.
pub struct Tree<T> {
    arena: TypedArena<Node<T>>,
    root: Option<Handle>,
    min: Option<Handle>,
    max: Option<Handle>,
    len: usize,
}

impl<T> Tree<T> {
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
            min: None,
            max: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn chunk_size(&self) -> usize {
        self.arena.chunk_size()
    }

    pub fn first(&self) -> Option<Handle> {
        self.min
    }

    pub fn last(&self) -> Option<Handle> {
        self.max
    }

    pub fn value(&self, node: Handle) -> &T {
        &self.arena[node].value
    }

    fn parent(&self, node: Option<Handle>) -> Option<Handle> {
        node.and_then(|handle| self.arena[handle].parent)
    }

    fn child(&self, node: Option<Handle>, side: Side) -> Option<Handle> {
        node.and_then(|handle| self.arena[handle].child(side))
    }

    fn color(&self, node: Option<Handle>) -> Color {
        node.map_or(Color::Black, |handle| self.arena[handle].color)
    }

    fn set_color(&mut self, node: Option<Handle>, color: Color) {
        if let Some(handle) = node {
            self.arena[handle].color = color;
        }
    }

    fn set_child(&mut self, node: Handle, side: Side, child: Option<Handle>) {
        *self.arena[node].child_mut(side) = child;
        if let Some(child) = child {
            self.arena[child].parent = Some(node);
        }
    }

    // `node` may be absent, in which case the side is whichever child of `parent` is absent.
    fn side_of(&self, node: Option<Handle>, parent: Handle) -> Side {
        if self.arena[parent].left == node {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Puts `new` in the position `old` occupies under its parent, or makes it the root.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        match self.arena[old].parent {
            None => {
                self.root = new;
                if let Some(new) = new {
                    self.arena[new].parent = None;
                }
            },
            Some(parent) => {
                let side = self.side_of(Some(old), parent);
                self.set_child(parent, side, new);
            },
        }
    }

    /// Rotates `node` towards `side`: the child on the opposite side takes its place and `node`
    /// becomes that child's `side` child. `Side::Left` is a left rotation.
    fn rotate(&mut self, node: Handle, side: Side) {
        let child = self.arena[node]
            .child(side.opposite())
            .expect("Expected rising child node to be `Some`.");
        let inner = self.arena[child].child(side);
        self.set_child(node, side.opposite(), inner);
        self.transplant(node, Some(child));
        self.set_child(child, side, Some(node));
    }

    fn extreme(&self, mut node: Handle, side: Side) -> Handle {
        while let Some(child) = self.arena[node].child(side) {
            node = child;
        }
        node
    }

    // the next node in the direction of `side`: `Side::Right` is the in-order successor
    fn neighbor(&self, node: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.arena[node].child(side) {
            return Some(self.extreme(child, side.opposite()));
        }
        let mut curr = node;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].child(side.opposite()) == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    pub fn tree_min(&self, node: Handle) -> Handle {
        self.extreme(node, Side::Left)
    }

    pub fn tree_max(&self, node: Handle) -> Handle {
        self.extreme(node, Side::Right)
    }

    pub fn successor(&self, node: Handle) -> Option<Handle> {
        self.neighbor(node, Side::Right)
    }

    pub fn predecessor(&self, node: Handle) -> Option<Handle> {
        self.neighbor(node, Side::Left)
    }

    pub fn find<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.value.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns the first node whose value is not less than `key`.
    pub fn lower_bound<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.descend(key) {
            None => None,
            Some((handle, Ordering::Greater)) => self.successor(handle),
            Some((handle, _)) => Some(handle),
        }
    }

    /// Returns the last node whose value is not greater than `key`.
    pub fn floor<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.descend(key) {
            None => None,
            Some((handle, Ordering::Less)) => self.predecessor(handle),
            Some((handle, _)) => Some(handle),
        }
    }

    // Ordered descent towards `key`. Returns the equal node, or the last node visited together
    // with how `key` compares to it. Only an empty tree yields `None`.
    fn descend<V>(&self, key: &V) -> Option<(Handle, Ordering)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut last = None;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            let ordering = key.cmp(node.value.borrow());
            curr = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some((handle, ordering)),
            };
            last = Some((handle, ordering));
        }
        last
    }

    /// Inserts `value` unless an equal value is present. Returns whether the tree changed.
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut is_min = true;
        let mut is_max = true;
        let mut curr = self.root;
        while let Some(handle) = curr {
            side = match value.cmp(&self.arena[handle].value) {
                Ordering::Less => {
                    is_max = false;
                    Side::Left
                },
                Ordering::Greater => {
                    is_min = false;
                    Side::Right
                },
                Ordering::Equal => return false,
            };
            parent = Some(handle);
            curr = self.arena[handle].child(side);
        }

        let node = self.arena.allocate(Node::new(value));
        match parent {
            None => self.root = Some(node),
            Some(parent) => self.set_child(parent, side, Some(node)),
        }
        if is_min {
            self.min = Some(node);
        }
        if is_max {
            self.max = Some(node);
        }
        self.len += 1;

        self.insert_fix_up(node);
        true
    }

    fn insert_fix_up(&mut self, mut node: Handle) {
        while self.color(self.parent(Some(node))) == Color::Red {
            let parent = self
                .parent(Some(node))
                .expect("Expected red parent node to be `Some`.");
            let grandparent = self
                .parent(Some(parent))
                .expect("Expected red node to have a parent.");
            let side = self.side_of(Some(parent), grandparent);
            let uncle = self.child(Some(grandparent), side.opposite());

            if self.color(uncle) == Color::Red {
                self.set_color(Some(parent), Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(Some(grandparent), Color::Red);
                node = grandparent;
                continue;
            }

            // zig-zag: straighten the inner child into a line first
            if self.side_of(Some(node), parent) != side {
                node = parent;
                self.rotate(node, side);
            }

            let parent = self
                .parent(Some(node))
                .expect("Expected red parent node to be `Some`.");
            self.set_color(Some(parent), Color::Black);
            self.set_color(Some(grandparent), Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let node = self.find(key)?;
        Some(self.remove_node(node))
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let node = self.min?;
        Some(self.remove_node(node))
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let node = self.max?;
        Some(self.remove_node(node))
    }

    /// Unlinks `node`, rebalances, and frees it. All other nodes keep their handles.
    fn remove_node(&mut self, node: Handle) -> T {
        if self.min == Some(node) {
            self.min = self.successor(node);
        }
        if self.max == Some(node) {
            self.max = self.predecessor(node);
        }

        let left = self.arena[node].left;
        let right = self.arena[node].right;
        let mut removed_color = self.arena[node].color;

        // `child` is the node that moved into the vacated position, which may be absent, so its
        // parent is tracked separately
        let (child, parent) = match (left, right) {
            (None, _) => {
                let parent = self.arena[node].parent;
                self.transplant(node, right);
                (right, parent)
            },
            (_, None) => {
                let parent = self.arena[node].parent;
                self.transplant(node, left);
                (left, parent)
            },
            (Some(left), Some(right)) => {
                let successor = self.tree_min(right);
                removed_color = self.arena[successor].color;
                let child = self.arena[successor].right;
                let parent = if self.arena[successor].parent == Some(node) {
                    successor
                } else {
                    let parent = self.arena[successor]
                        .parent
                        .expect("Expected successor node to have a parent.");
                    self.transplant(successor, child);
                    self.set_child(successor, Side::Right, Some(right));
                    parent
                };
                self.transplant(node, Some(successor));
                self.set_child(successor, Side::Left, Some(left));
                let color = self.arena[node].color;
                self.arena[successor].color = color;
                (child, Some(parent))
            },
        };

        if removed_color == Color::Black {
            self.remove_fix_up(child, parent);
        }

        self.len -= 1;
        self.arena.free(&node).value
    }

    // `node` carries an extra black. `parent` is its parent, tracked explicitly because `node`
    // may be absent.
    fn remove_fix_up(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && self.color(node) == Color::Black {
            let curr_parent = match parent {
                Some(parent) => parent,
                None => break,
            };
            let side = self.side_of(node, curr_parent);
            let mut sibling = self.child(Some(curr_parent), side.opposite());

            if self.color(sibling) == Color::Red {
                self.set_color(sibling, Color::Black);
                self.set_color(Some(curr_parent), Color::Red);
                self.rotate(curr_parent, side);
                sibling = self.child(Some(curr_parent), side.opposite());
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());
            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                self.set_color(sibling, Color::Red);
                node = Some(curr_parent);
                parent = self.parent(node);
                continue;
            }

            if self.color(far) == Color::Black {
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(
                    sibling.expect("Expected sibling node to be `Some`."),
                    side.opposite(),
                );
                sibling = self.child(Some(curr_parent), side.opposite());
            }

            let parent_color = self.color(Some(curr_parent));
            self.set_color(sibling, parent_color);
            self.set_color(Some(curr_parent), Color::Black);
            let far = self.child(sibling, side.opposite());
            self.set_color(far, Color::Black);
            self.rotate(curr_parent, side);
            node = self.root;
            parent = None;
        }

        self.set_color(node, Color::Black);
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.min = None;
        self.max = None;
        self.len = 0;
    }

    /// Checks every structural invariant and returns the first violation found.
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        if self.color(self.root) == Color::Red {
            return Err(Error::RedRoot);
        }
        if self.parent(self.root).is_some() {
            return Err(Error::BrokenParentLink);
        }
        self.validate_subtree(self.root)?;

        if self.root.map(|root| self.tree_min(root)) != self.min
            || self.root.map(|root| self.tree_max(root)) != self.max
        {
            return Err(Error::StaleBounds);
        }

        let mut count = 0;
        let mut prev: Option<Handle> = None;
        let mut curr = self.min;
        while let Some(handle) = curr {
            if let Some(prev) = prev {
                if self.arena[prev].value >= self.arena[handle].value {
                    return Err(Error::UnorderedElements);
                }
            }
            count += 1;
            prev = Some(handle);
            curr = self.successor(handle);
        }

        if count != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: count,
            });
        }
        if self.arena.len() != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: self.arena.len(),
            });
        }
        Ok(())
    }

    // returns the black height of the subtree, counting the absent leaves
    fn validate_subtree(&self, node: Option<Handle>) -> Result<usize> {
        let handle = match node {
            Some(handle) => handle,
            None => return Ok(1),
        };
        let curr = &self.arena[handle];

        for &side in &[Side::Left, Side::Right] {
            if let Some(child) = curr.child(side) {
                if self.arena[child].parent != Some(handle) {
                    return Err(Error::BrokenParentLink);
                }
                if curr.color == Color::Red && self.arena[child].color == Color::Red {
                    return Err(Error::ConsecutiveReds);
                }
            }
        }

        let left = self.validate_subtree(curr.left)?;
        let right = self.validate_subtree(curr.right)?;
        if left != right {
            return Err(Error::UnbalancedBlacks { left, right });
        }

        match curr.color {
            Color::Black => Ok(left + 1),
            Color::Red => Ok(left),
        }
    }

    fn detached_copy(&self, node: Handle) -> Node<T>
    where
        T: Clone,
    {
        let Node { value, color, .. } = &self.arena[node];
        Node {
            value: value.clone(),
            color: *color,
            parent: None,
            left: None,
            right: None,
        }
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    /// Copies the shape, colors and values into a fresh arena. The walk uses an explicit stack.
    fn clone(&self) -> Self {
        let mut tree = Tree::new(self.chunk_size());
        if let Some(root) = self.root {
            let new_root = tree.arena.allocate(self.detached_copy(root));
            let mut stack = vec![(root, new_root)];
            while let Some((source, target)) = stack.pop() {
                for &side in &[Side::Left, Side::Right] {
                    if let Some(child) = self.arena[source].child(side) {
                        let copy = tree.arena.allocate(self.detached_copy(child));
                        tree.set_child(target, side, Some(copy));
                        stack.push((child, copy));
                    }
                }
            }
            tree.root = Some(new_root);
            tree.min = Some(tree.tree_min(new_root));
            tree.max = Some(tree.tree_max(new_root));
        }
        tree.len = self.len;
        tree
    }
}
