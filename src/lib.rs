//! An ordered set backed by a red black tree whose nodes live in a chunked arena.
//!
//! # Examples
//!
//! ```
//! use red_black_set::RedBlackSet;
//!
//! let mut set: RedBlackSet<u32> = [5, 3, 8, 1, 4, 7, 9].iter().cloned().collect();
//! set.remove(&3);
//!
//! assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), vec![1, 4, 5, 7, 8, 9]);
//! assert_eq!(set.lower_bound(&6).get(), Some(&7));
//! ```

pub mod arena;
pub mod red_black_tree;

pub use crate::red_black_tree::RedBlackSet;
