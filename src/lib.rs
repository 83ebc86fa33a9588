//! A region quadtree for 2D points with a deterministic traversal order.
//!
//! The tree recursively partitions an axis-aligned [`Region`] into four
//! quadrants (always NW, NE, SW, SE). Each leaf holds up to `capacity`
//! resident points before it subdivides. Two configurations cover the two
//! intended uses:
//!
//! - **Ranking** (`capacity == 1`): the pre-order leaf traversal
//!   ([`QuadTree::preorder`]) visits every point exactly once in a
//!   deterministic, quadrant-recursive order, so a point's position in the
//!   sequence is a stable spatial sort key.
//! - **Indexing** (`capacity == N`): [`QuadTree::query`] answers axis-aligned
//!   range queries by pruning subtrees whose region misses the query window.
//!
//! ```
//! use nalgebra::point;
//! use quadrank::{QuadTree, Region, Window, YAxis};
//!
//! let bounds = Region::new(point![0.0, 0.0], 6.0, 6.0, YAxis::BottomUp);
//! let mut tree = QuadTree::new(bounds, 1)?;
//! tree.insert(&point![4.0, 2.0]);
//! tree.insert(&point![1.0, 1.0]);
//!
//! let mut hits = Vec::new();
//! tree.query(&Window::new(point![0.0, 0.0], 6.0, 6.0), &mut hits);
//! assert_eq!(hits.len(), 2);
//! # Ok::<(), quadrank::QuadError>(())
//! ```

pub mod driver;
mod quadtree;
mod region;

pub use quadtree::{Preorder, QuadTree};
pub use region::{Region, Window, YAxis};

use nalgebra::Point2;
use thiserror::Error;

/// 2d position type used throughout the crate
pub type P2 = Point2<f64>;

/// Trait for getting the 2d position of data stored in the [`QuadTree`]
///
/// Items are never compared for equality or order; only their positions are.
pub trait Locate {
    /// Get the item's 2d position
    fn position(&self) -> P2;
}

impl Locate for P2 {
    fn position(&self) -> P2 {
        *self
    }
}

/// Errors raised by tree construction and the store drivers.
#[derive(Debug, Error)]
pub enum QuadError {
    /// Capacity 0 would force every insert through an already-maximal
    /// subdivision; rejected at construction.
    #[error("node capacity must be at least 1")]
    ZeroCapacity,

    /// A point fell outside the tree's root region. The bootstrap extent is
    /// computed to cover every point, so hitting this means the extent or the
    /// axis convention is wrong for the data.
    #[error("point ({x}, {y}) falls outside the reference extent")]
    OutOfBounds { x: f64, y: f64 },

    /// The store is missing an attribute field the driver needs.
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Store-specific read/write failure, surfaced verbatim.
    #[error("store error: {0}")]
    Store(String),
}

/// Result alias for this crate's operations
pub type Result<T> = std::result::Result<T, QuadError>;
