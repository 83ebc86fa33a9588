use crate::{
    region::{Region, Window},
    Locate, QuadError, Result,
};

/// A region quadtree for spatial indexing and deterministic ranking of 2D
/// points.
#[derive(Debug)]
pub struct QuadTree<T> {
    root: Node<T>,
    capacity: usize,
}

impl<T: Locate + Clone> QuadTree<T> {
    /// Create a new empty quadtree
    ///
    /// ## Arguments
    /// - `region`: The root coverage of the tree; its [`crate::YAxis`]
    ///   convention applies to every node.
    /// - `capacity`: The maximum number of points a leaf can hold before
    ///   subdividing. `1` gives ranking behavior (every occupied leaf splits
    ///   on the next insert); larger values give bucketed indexing.
    ///
    /// ## Errors
    /// Returns [`QuadError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(region: Region, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(QuadError::ZeroCapacity);
        }
        Ok(Self {
            root: Node::Vacant { region, depth: 0 },
            capacity,
        })
    }

    /// Insert a point into the quadtree
    ///
    /// **Returns** `false` iff the point lies outside the root region; the
    /// tree is left unchanged in that case.
    pub fn insert(&mut self, item: &T) -> bool {
        self.root.insert(item, self.capacity)
    }

    /// Collect all points whose position satisfies the window's half-open
    /// membership test into `results`.
    ///
    /// Output order is unspecified. The tree is not mutated; querying twice
    /// yields the same result set.
    pub fn query(&self, window: &Window, results: &mut Vec<T>) {
        self.root.query(window, results)
    }

    /// Depth-first traversal of all stored points, children visited in fixed
    /// NW, NE, SW, SE order and leaf residents in insertion order.
    ///
    /// The traversal is lazy and deterministic: a freshly created iterator
    /// over an unchanged tree always yields the identical sequence, so a
    /// point's position in it is a stable spatial rank.
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder {
            stack: vec![&self.root],
            leaf: [].iter(),
        }
    }

    /// Number of points stored in the tree
    pub fn len(&self) -> usize {
        self.preorder().count()
    }

    /// Check if the tree holds no points
    pub fn is_empty(&self) -> bool {
        self.preorder().next().is_none()
    }

    /// Get the root region of the quadtree
    pub fn region(&self) -> &Region {
        self.root.region()
    }

    /// Get the leaf capacity of the quadtree
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Depth of the deepest node, with the root at depth 0
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }
}

/// QuadTree node enum
///
/// ## Variants
/// - `Vacant`: Covers an area that holds no points yet.
/// - `Leaf`: Holds up to `capacity` resident points directly.
/// - `Branch`: Has subdivided; its four children exactly partition its
///   region and hold every point of the subtree. A branch never holds
///   residents of its own.
#[derive(Debug)]
enum Node<T> {
    Vacant {
        region: Region,
        depth: u32,
    },
    Leaf {
        region: Region,
        depth: u32,
        points: Vec<T>,
    },
    Branch {
        region: Region,
        depth: u32,
        children: [Box<Self>; 4],
    },
}

impl<T: Locate + Clone> Node<T> {
    fn insert(&mut self, item: &T, capacity: usize) -> bool {
        let position = item.position();

        // Containment guard before any mutation.
        if !self.region().contains(&position) {
            return false;
        }

        match self {
            &mut Self::Vacant { region, depth } => {
                let mut points = Vec::with_capacity(capacity);
                points.push(item.clone());
                *self = Self::Leaf {
                    region,
                    depth,
                    points,
                };
                true
            }
            &mut Self::Leaf {
                region,
                depth,
                ref mut points,
            } => {
                if points.len() < capacity {
                    points.push(item.clone());
                    return true;
                }

                // Full leaf: subdivide, then move the residents down in their
                // stored order before offering the new point. The former
                // resident list stays empty from here on.
                let points = std::mem::take(points);
                let children = Self::subdivide(region, depth);
                *self = Self::Branch {
                    region,
                    depth,
                    children,
                };

                for existing_item in &points {
                    self.insert(existing_item, capacity);
                }

                self.insert(item, capacity)
            }
            Self::Branch { children, .. } => {
                // Fixed NW, NE, SW, SE offer order; the first quadrant whose
                // region contains the point absorbs it, which makes boundary
                // ties deterministic.
                children.iter_mut().any(|child| child.insert(item, capacity))
            }
        }
    }

    fn query(&self, window: &Window, results: &mut Vec<T>) {
        match self {
            Self::Leaf { region, points, .. } => {
                if region.overlaps(window) {
                    for item in points {
                        if window.admits(&item.position()) {
                            results.push(item.clone());
                        }
                    }
                }
            }
            Self::Branch {
                region, children, ..
            } => {
                if region.overlaps(window) {
                    for child in children {
                        child.query(window, results);
                    }
                }
            }
            Self::Vacant { .. } => (),
        }
    }

    fn subdivide(region: Region, depth: u32) -> [Box<Self>; 4] {
        region.quarter().map(|quadrant| {
            Box::new(Self::Vacant {
                region: quadrant,
                depth: depth + 1,
            })
        })
    }
}

impl<T> Node<T> {
    fn region(&self) -> &Region {
        match self {
            Self::Vacant { region, .. } => region,
            Self::Leaf { region, .. } => region,
            Self::Branch { region, .. } => region,
        }
    }

    fn max_depth(&self) -> u32 {
        match self {
            Self::Vacant { depth, .. } => *depth,
            Self::Leaf { depth, .. } => *depth,
            Self::Branch { children, .. } => {
                children.iter().map(|child| child.max_depth()).max().unwrap_or(0)
            }
        }
    }
}

/// Lazy pre-order iterator over the points of a [`QuadTree`].
///
/// Created by [`QuadTree::preorder`]; restartable by creating it again.
#[derive(Debug)]
pub struct Preorder<'a, T> {
    stack: Vec<&'a Node<T>>,
    leaf: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.leaf.next() {
                return Some(item);
            }
            match self.stack.pop()? {
                Node::Vacant { .. } => (),
                Node::Leaf { points, .. } => self.leaf = points.iter(),
                Node::Branch { children, .. } => {
                    // Reversed push so NW pops first.
                    for child in children.iter().rev() {
                        self.stack.push(child);
                    }
                }
            }
        }
    }
}
