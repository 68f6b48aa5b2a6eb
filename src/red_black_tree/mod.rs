//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Nodes are stored in a `TypedArena` and link to their children and parent through arena
//! handles, so the tree can be walked in both directions without an auxiliary stack.

mod iter;
mod node;
mod set;
mod tree;

pub use self::iter::{Cursor, IntoIter, Iter};
pub use self::set::{RedBlackSet, DEFAULT_CHUNK_SIZE};

use std::error;
use std::fmt;
use std::result;

/// A violated red black tree invariant reported by `RedBlackSet::validate`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// An in-order walk found two elements that are not strictly increasing.
    UnorderedElements,
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    ConsecutiveReds,
    /// Two sibling subtrees have a different number of black nodes on their paths.
    UnbalancedBlacks { left: usize, right: usize },
    /// A child does not point back at its parent, or the root has a parent.
    BrokenParentLink,
    /// The cached minimum or maximum is not the true minimum or maximum.
    StaleBounds,
    /// The element count differs from the number of reachable or allocated nodes.
    LengthMismatch { expected: usize, actual: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnorderedElements => write!(f, "elements are not in strictly increasing order"),
            Error::RedRoot => write!(f, "root node is red"),
            Error::ConsecutiveReds => write!(f, "red node has a red child"),
            Error::UnbalancedBlacks { left, right } => {
                write!(f, "unbalanced black heights left:{} right:{}", left, right)
            },
            Error::BrokenParentLink => write!(f, "child and parent links disagree"),
            Error::StaleBounds => write!(f, "cached minimum or maximum is stale"),
            Error::LengthMismatch { expected, actual } => {
                write!(f, "length is {} but found {} nodes", expected, actual)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
