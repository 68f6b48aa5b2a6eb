use crate::red_black_tree::iter::{Cursor, IntoIter, Iter};
use crate::red_black_tree::tree::Tree;
use crate::red_black_tree::Result;
use log::{debug, trace};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The number of nodes a set allocates at a time when it is constructed with `new`.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

static NEXT_SET_ID: AtomicUsize = AtomicUsize::new(0);

fn next_set_id() -> usize {
    NEXT_SET_ID.fetch_add(1, Ordering::Relaxed)
}

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black.
/// The root is black, a red node never has a red child, and every path from the root to a missing
/// child passes through the same number of black nodes, which bounds the height of the tree to
/// `O(log n)`.
///
/// Nodes live in an arena and are never moved once allocated: removing an element leaves every
/// other element at the same place, so a `Cursor` to another element stays meaningful.
///
/// # Examples
///
/// ```
/// use red_black_set::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct RedBlackSet<T> {
    tree: Tree<T>,
    id: usize,
}

impl<T> RedBlackSet<T> {
    /// Constructs a new, empty `RedBlackSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackSet<T>` whose nodes are allocated `chunk_size` at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::with_chunk_size(1024);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackSet {
            tree: Tree::new(chunk_size),
            id: next_set_id(),
        }
    }

    /// Inserts a value into the set. Returns `false` and leaves the set unchanged if an equal
    /// value already exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        self.tree.insert(value)
    }

    /// Removes a value from the set. If the value exists in the set, it will return the stored
    /// value. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, value: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.remove(value)
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, value: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(String::from("a"));
    /// assert_eq!(set.get("a"), Some(&String::from("a")));
    /// assert_eq!(set.get("b"), None);
    /// ```
    pub fn get<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(value).map(|node| self.tree.value(node))
    }

    /// Returns a cursor pointing at the element equal to `value`, or the end cursor if there is
    /// no such element.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = [5, 3, 8].iter().cloned().collect();
    /// assert_eq!(set.find(&8).get(), Some(&8));
    /// assert_eq!(set.find(&100), set.end());
    /// ```
    pub fn find<V>(&self, value: &V) -> Cursor<'_, T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        Cursor::new(&self.tree, self.id, self.tree.find(value))
    }

    /// Returns a cursor pointing at the first element that is not less than `value`, or the end
    /// cursor if every element is less than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = [10, 20, 30].iter().cloned().collect();
    /// assert_eq!(set.lower_bound(&20).get(), Some(&20));
    /// assert_eq!(set.lower_bound(&21).get(), Some(&30));
    /// assert_eq!(set.lower_bound(&31), set.end());
    /// ```
    pub fn lower_bound<V>(&self, value: &V) -> Cursor<'_, T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        Cursor::new(&self.tree, self.id, self.tree.lower_bound(value))
    }

    /// Returns a cursor pointing at the minimum element, or the end cursor if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// assert_eq!(set.begin(), set.end());
    /// ```
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(&self.tree, self.id, self.tree.first())
    }

    /// Returns the end cursor of the set.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(&self.tree, self.id, None)
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing set {} of {} elements", self.id, self.tree.len());
        self.tree.clear();
    }

    /// Returns a value in the set that is less than or equal to a particular value. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.floor(value).map(|node| self.tree.value(node))
    }

    /// Returns a value in the set that is greater than or equal to a particular value. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.lower_bound(value).map(|node| self.tree.value(node))
    }

    /// Returns the minimum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree.first().map(|node| self.tree.value(node))
    }

    /// Returns the maximum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.last().map(|node| self.tree.value(node))
    }

    /// Removes and returns the minimum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set: RedBlackSet<u32> = [1, 3].iter().cloned().collect();
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(3));
    /// assert_eq!(set.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    /// Removes and returns the maximum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set: RedBlackSet<u32> = [1, 3].iter().cloned().collect();
    /// assert_eq!(set.pop_last(), Some(3));
    /// assert_eq!(set.pop_last(), Some(1));
    /// assert_eq!(set.pop_last(), None);
    /// ```
    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.tree)
    }

    /// Checks the red black tree invariants, the cached bounds and the length of the set, and
    /// returns the first violation found.
    ///
    /// # Examples
    ///
    /// ```
    /// use red_black_set::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = (0..100).collect();
    /// assert!(set.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        self.tree.validate()
    }
}

impl<T> Clone for RedBlackSet<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        trace!("copying {} elements out of set {}", self.tree.len(), self.id);
        RedBlackSet {
            tree: self.tree.clone(),
            id: next_set_id(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        trace!(
            "copying {} elements from set {} into set {}",
            source.tree.len(),
            source.id,
            self.id,
        );
        self.tree = source.tree.clone();
    }
}

impl<T> IntoIterator for RedBlackSet<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree)
    }
}

impl<'a, T> IntoIterator for &'a RedBlackSet<T>
where
    T: 'a,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = RedBlackSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, const N: usize> From<[T; N]> for RedBlackSet<T>
where
    T: Ord,
{
    fn from(values: [T; N]) -> Self {
        IntoIterator::into_iter(values).collect()
    }
}

impl<T> PartialEq for RedBlackSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &RedBlackSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RedBlackSet<T> where T: Eq {}

impl<T> fmt::Debug for RedBlackSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for RedBlackSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackSet;

    #[test]
    fn test_len_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert!(set.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut set = RedBlackSet::new();
        assert!(set.insert(1));
        assert!(set.contains(&1));
        assert_eq!(set.find(&1).get(), Some(&1));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = RedBlackSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        assert_eq!(set.remove(&1), Some(1));
        assert!(!set.contains(&1));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_absent() {
        let mut set: RedBlackSet<u32> = [1, 2, 3].iter().cloned().collect();
        assert_eq!(set.remove(&4), None);
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_min_max() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.floor(&0), None);
        assert_eq!(set.floor(&2), Some(&1));
        assert_eq!(set.floor(&4), Some(&3));
        assert_eq!(set.floor(&6), Some(&5));

        assert_eq!(set.ceil(&0), Some(&1));
        assert_eq!(set.ceil(&2), Some(&3));
        assert_eq!(set.ceil(&4), Some(&5));
        assert_eq!(set.ceil(&6), None);
    }

    #[test]
    fn test_lower_bound_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.lower_bound(&0), set.end());
        assert!(set.lower_bound(&0).is_end());
    }

    #[test]
    fn test_begin_end() {
        let set: RedBlackSet<u32> = [2, 1].iter().cloned().collect();
        let mut cursor = set.begin();
        assert_eq!(cursor.get(), Some(&1));
        cursor.move_next();
        cursor.move_next();
        assert_eq!(cursor, set.end());
    }

    #[test]
    fn test_cursors_from_different_sets() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        let other: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.end(), set.end());
        assert_ne!(set.end(), other.end());
    }

    #[test]
    fn test_from_array() {
        let set = RedBlackSet::from([5, 3, 5, 3]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &5]);
    }

    #[test]
    fn test_into_iter() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
        assert_eq!(set.iter().rev().collect::<Vec<&u32>>(), vec![&5, &3, &1]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut set: RedBlackSet<u32> = (0..10).collect();
        let mut copy = set.clone();
        assert_eq!(set, copy);
        assert_ne!(set.begin(), copy.begin());

        copy.remove(&0);
        set.insert(10);
        assert_eq!(copy.iter().cloned().collect::<Vec<u32>>(), (1..10).collect::<Vec<u32>>());
        assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), (0..11).collect::<Vec<u32>>());
        assert!(set.validate().is_ok());
        assert!(copy.validate().is_ok());
    }

    #[test]
    fn test_clone_from() {
        let source: RedBlackSet<u32> = (0..5).collect();
        let mut target: RedBlackSet<u32> = (10..20).collect();
        target.clone_from(&source);
        assert_eq!(target, source);
        assert!(target.validate().is_ok());
    }

    #[test]
    fn test_debug() {
        let set: RedBlackSet<u32> = [3, 1, 2].iter().cloned().collect();
        assert_eq!(format!("{:?}", set), "{1, 2, 3}");
    }

    #[test]
    fn test_clear_resets_state() {
        let mut set: RedBlackSet<u32> = (0..100).collect();
        set.clear();
        assert_eq!(set, RedBlackSet::new());
        assert_eq!(set.begin(), set.end());
        assert!(set.validate().is_ok());
        set.insert(1);
        assert_eq!(set.min(), Some(&1));
    }
}
