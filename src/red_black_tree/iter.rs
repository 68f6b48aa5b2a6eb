use crate::arena::Handle;
use crate::red_black_tree::tree::Tree;
use std::fmt;
use std::iter::FusedIterator;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Position {
    Node(Handle),
    End,
}

impl From<Option<Handle>> for Position {
    fn from(node: Option<Handle>) -> Self {
        node.map_or(Position::End, Position::Node)
    }
}

/// A bidirectional cursor over a `RedBlackSet<T>`.
///
/// A cursor either points at an element or is at the end of the set. The end position sits
/// between the maximum and the minimum: moving forward from the maximum reaches the end, and
/// moving forward from the end wraps around to the minimum. Moving backward is the mirror image.
///
/// Two cursors are equal if they come from the same set and are at the same position.
///
/// # Examples
///
/// ```
/// use red_black_set::red_black_tree::RedBlackSet;
///
/// let set: RedBlackSet<u32> = [1, 3, 5].iter().cloned().collect();
///
/// let mut cursor = set.begin();
/// assert_eq!(cursor.get(), Some(&1));
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&3));
///
/// let mut cursor = set.end();
/// assert!(cursor.is_end());
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&5));
/// ```
pub struct Cursor<'a, T> {
    tree: &'a Tree<T>,
    owner: usize,
    position: Position,
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(tree: &'a Tree<T>, owner: usize, node: Option<Handle>) -> Self {
        Cursor {
            tree,
            owner,
            position: Position::from(node),
        }
    }

    /// Returns the element the cursor points at, or `None` if the cursor is at the end.
    pub fn get(&self) -> Option<&'a T> {
        let tree = self.tree;
        match self.position {
            Position::Node(node) => Some(tree.value(node)),
            Position::End => None,
        }
    }

    /// Returns `true` if the cursor is at the end of the set.
    pub fn is_end(&self) -> bool {
        self.position == Position::End
    }

    /// Moves the cursor to the next element. Moving past the maximum reaches the end, and moving
    /// from the end reaches the minimum.
    pub fn move_next(&mut self) {
        self.position = match self.position {
            Position::Node(node) => Position::from(self.tree.successor(node)),
            Position::End => Position::from(self.tree.first()),
        };
    }

    /// Moves the cursor to the previous element. Moving from the end reaches the maximum, and
    /// moving before the minimum reaches the end.
    pub fn move_prev(&mut self) {
        self.position = match self.position {
            Position::Node(node) => Position::from(self.tree.predecessor(node)),
            Position::End => Position::from(self.tree.last()),
        };
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Cursor<'a, T>) -> bool {
        self.owner == other.owner && self.position == other.position
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T> fmt::Debug for Cursor<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// An iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references. It
/// walks parent links, so it needs no auxiliary stack.
pub struct Iter<'a, T> {
    tree: &'a Tree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(tree: &'a Tree<T>) -> Self {
        Iter {
            tree,
            front: tree.first(),
            back: tree.last(),
            remaining: tree.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree;
        let node = self.front?;
        self.remaining -= 1;
        self.front = tree.successor(node);
        Some(tree.value(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree;
        let node = self.back?;
        self.remaining -= 1;
        self.back = tree.predecessor(node);
        Some(tree.value(node))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> where T: 'a {}

impl<'a, T> FusedIterator for Iter<'a, T> where T: 'a {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// An owning iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned values.
pub struct IntoIter<T> {
    tree: Tree<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(tree: Tree<T>) -> Self {
        IntoIter { tree }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
