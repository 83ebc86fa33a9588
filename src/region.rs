use nalgebra::point;

use crate::P2;

/// Vertical-axis convention for a [`Region`]'s extent.
///
/// The two reference dataset layouts anchor regions at opposite corners, and
/// mixing them silently corrupts containment tests, so the convention is an
/// explicit parameter carried by every region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum YAxis {
    /// Origin at the top-left corner; height grows downward, so the vertical
    /// extent is `[origin_y - height, origin_y]`.
    TopDown,
    /// Origin at the bottom-left corner; height grows upward, so the vertical
    /// extent is `[origin_y, origin_y + height]`.
    BottomUp,
}

/// An axis-aligned rectangle anchored at an origin corner, defining the
/// spatial coverage of a quadtree node.
///
/// The horizontal extent is always `[origin_x, origin_x + width]`; the
/// vertical extent depends on the configured [`YAxis`]. Containment is
/// inclusive on all four edges. A point on a shared quadrant edge is
/// therefore contained by more than one quadrant, and the fixed NW, NE, SW,
/// SE routing order decides where it lands.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    origin: P2,
    width: f64,
    height: f64,
    axis: YAxis,
}

impl Region {
    /// Create a new region from its anchor corner and size.
    ///
    /// Zero width or height is allowed and models a region collapsed onto a
    /// line; only points exactly on that line can be contained.
    pub fn new(origin: P2, width: f64, height: f64, axis: YAxis) -> Self {
        Self {
            origin,
            width,
            height,
            axis,
        }
    }

    /// Get the anchor corner of the region
    pub fn origin(&self) -> P2 {
        self.origin
    }

    /// Get the width of the region
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Get the height of the region
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Get the vertical-axis convention of the region
    pub fn axis(&self) -> YAxis {
        self.axis
    }

    /// Smallest contained x coordinate
    pub fn x_min(&self) -> f64 {
        self.origin.x
    }

    /// Largest contained x coordinate
    pub fn x_max(&self) -> f64 {
        self.origin.x + self.width
    }

    /// Smallest contained y coordinate
    pub fn y_min(&self) -> f64 {
        match self.axis {
            YAxis::TopDown => self.origin.y - self.height,
            YAxis::BottomUp => self.origin.y,
        }
    }

    /// Largest contained y coordinate
    pub fn y_max(&self) -> f64 {
        match self.axis {
            YAxis::TopDown => self.origin.y,
            YAxis::BottomUp => self.origin.y + self.height,
        }
    }

    /// Check if a point lies within the region, inclusive on all edges
    pub fn contains(&self, point: &P2) -> bool {
        self.x_min() <= point.x
            && point.x <= self.x_max()
            && self.y_min() <= point.y
            && point.y <= self.y_max()
    }

    /// Check if the region shares any space with another region.
    ///
    /// Touching edges count as intersecting; the test fails only when one
    /// extent ends strictly before the other begins on some axis.
    pub fn intersects(&self, other: &Region) -> bool {
        !(self.x_max() < other.x_min()
            || other.x_max() < self.x_min()
            || self.y_max() < other.y_min()
            || other.y_max() < self.y_min())
    }

    /// Check if the region could contain a point admitted by `window`.
    ///
    /// Used to prune range queries. Conservative: never false when some
    /// contained point satisfies the window's half-open membership test.
    pub fn overlaps(&self, window: &Window) -> bool {
        !(self.x_max() < window.x_min()
            || self.x_min() >= window.x_max()
            || self.y_max() < window.y_min()
            || self.y_min() >= window.y_max())
    }

    /// Quarter the region into its four quadrants, in NW, NE, SW, SE order.
    ///
    /// Each quadrant has exactly half the width and half the height. Halving
    /// is exact in binary floating point, so the quadrant extents reconstruct
    /// the parent with no gap or overlap.
    pub fn quarter(&self) -> [Self; 4] {
        let (x, y) = (self.origin.x, self.origin.y);
        let w2 = self.width / 2.0;
        let h2 = self.height / 2.0;

        let corners = match self.axis {
            YAxis::TopDown => [(x, y), (x + w2, y), (x, y - h2), (x + w2, y - h2)],
            YAxis::BottomUp => [(x, y + h2), (x + w2, y + h2), (x, y), (x + w2, y)],
        };

        corners.map(|(qx, qy)| Self::new(point![qx, qy], w2, h2, self.axis))
    }
}

/// A half-open query rectangle: membership is `[x, x + w) × [y, y + h)`.
///
/// Range queries use this convention regardless of the tree's own [`YAxis`];
/// retrieval semantics are defined independently from partitioning.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    origin: P2,
    width: f64,
    height: f64,
}

impl Window {
    /// Create a new query window from its minimum corner and size
    pub fn new(origin: P2, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Smallest admitted x coordinate
    pub fn x_min(&self) -> f64 {
        self.origin.x
    }

    /// Exclusive upper x bound
    pub fn x_max(&self) -> f64 {
        self.origin.x + self.width
    }

    /// Smallest admitted y coordinate
    pub fn y_min(&self) -> f64 {
        self.origin.y
    }

    /// Exclusive upper y bound
    pub fn y_max(&self) -> f64 {
        self.origin.y + self.height
    }

    /// Half-open membership test
    pub fn admits(&self, point: &P2) -> bool {
        self.x_min() <= point.x
            && point.x < self.x_max()
            && self.y_min() <= point.y
            && point.y < self.y_max()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn top_down(x: f64, y: f64, w: f64, h: f64) -> Region {
        Region::new(point![x, y], w, h, YAxis::TopDown)
    }

    pub(crate) fn bottom_up(x: f64, y: f64, w: f64, h: f64) -> Region {
        Region::new(point![x, y], w, h, YAxis::BottomUp)
    }

    pub(crate) fn make_window(x: f64, y: f64, w: f64, h: f64) -> Window {
        Window::new(point![x, y], w, h)
    }

    #[test]
    fn contains_point_bottom_up() {
        let region = bottom_up(0.0, 0.0, 10.0, 10.0);
        assert!(
            region.contains(&point![5.0, 5.0]),
            "Interior point should be contained"
        );
        assert!(
            region.contains(&point![0.0, 0.0]) && region.contains(&point![10.0, 10.0]),
            "Both corner points should be contained (inclusive edges)"
        );
        assert!(
            !region.contains(&point![5.0, 10.1]),
            "Point above the extent should not be contained"
        );
        assert!(
            !region.contains(&point![-0.1, 5.0]),
            "Point left of the extent should not be contained"
        );
    }

    #[test]
    fn contains_point_top_down() {
        let region = top_down(0.0, 10.0, 10.0, 10.0);
        assert!(
            region.contains(&point![5.0, 5.0]),
            "Interior point should be contained"
        );
        assert!(
            region.contains(&point![0.0, 10.0]) && region.contains(&point![10.0, 0.0]),
            "Anchor and opposite corner should both be contained"
        );
        assert!(
            !region.contains(&point![5.0, 10.5]),
            "Point above the anchor row should not be contained"
        );
        assert!(
            !region.contains(&point![5.0, -0.5]),
            "Point below the extent should not be contained"
        );
    }

    #[test]
    fn intersects_counts_touching_edges() {
        let a = bottom_up(0.0, 0.0, 10.0, 10.0);
        assert!(
            a.intersects(&bottom_up(5.0, 5.0, 10.0, 10.0)),
            "Overlapping regions should intersect"
        );
        assert!(
            a.intersects(&bottom_up(10.0, 10.0, 5.0, 5.0)),
            "Regions touching at a corner should intersect"
        );
        assert!(
            a.intersects(&bottom_up(2.0, 2.0, 3.0, 3.0)),
            "A region fully inside another should intersect"
        );
        assert!(
            !a.intersects(&bottom_up(10.5, 0.0, 5.0, 10.0)),
            "A region strictly to the right should not intersect"
        );
        assert!(
            !a.intersects(&bottom_up(0.0, -6.0, 10.0, 5.0)),
            "A region strictly below should not intersect"
        );
    }

    #[test]
    fn intersects_across_conventions() {
        // Same extent [0,10]x[0,10] expressed with both anchors.
        let up = bottom_up(0.0, 0.0, 10.0, 10.0);
        let down = top_down(0.0, 10.0, 10.0, 10.0);
        assert!(
            up.intersects(&down) && down.intersects(&up),
            "Identical extents should intersect regardless of anchor convention"
        );
    }

    #[test]
    fn quarter_order_bottom_up() {
        let quads = bottom_up(0.0, 0.0, 10.0, 10.0).quarter();
        assert_eq!(
            quads[0],
            bottom_up(0.0, 5.0, 5.0, 5.0),
            "First quadrant should be NW"
        );
        assert_eq!(
            quads[1],
            bottom_up(5.0, 5.0, 5.0, 5.0),
            "Second quadrant should be NE"
        );
        assert_eq!(
            quads[2],
            bottom_up(0.0, 0.0, 5.0, 5.0),
            "Third quadrant should be SW"
        );
        assert_eq!(
            quads[3],
            bottom_up(5.0, 0.0, 5.0, 5.0),
            "Fourth quadrant should be SE"
        );
    }

    #[test]
    fn quarter_order_top_down() {
        let quads = top_down(0.0, 10.0, 10.0, 10.0).quarter();
        assert_eq!(
            quads[0],
            top_down(0.0, 10.0, 5.0, 5.0),
            "First quadrant should be NW"
        );
        assert_eq!(
            quads[1],
            top_down(5.0, 10.0, 5.0, 5.0),
            "Second quadrant should be NE"
        );
        assert_eq!(
            quads[2],
            top_down(0.0, 5.0, 5.0, 5.0),
            "Third quadrant should be SW"
        );
        assert_eq!(
            quads[3],
            top_down(5.0, 5.0, 5.0, 5.0),
            "Fourth quadrant should be SE"
        );
    }

    #[test]
    fn quarter_partitions_parent_exactly() {
        for region in [top_down(-3.0, 7.0, 7.0, 7.0), bottom_up(-3.0, 0.0, 7.0, 7.0)] {
            let quads = region.quarter();

            // Union reconstructs the parent extent.
            let x_min = quads.iter().map(Region::x_min).fold(f64::MAX, f64::min);
            let x_max = quads.iter().map(Region::x_max).fold(f64::MIN, f64::max);
            let y_min = quads.iter().map(Region::y_min).fold(f64::MAX, f64::min);
            let y_max = quads.iter().map(Region::y_max).fold(f64::MIN, f64::max);
            assert_eq!(x_min, region.x_min(), "Union should reach the parent x_min");
            assert_eq!(x_max, region.x_max(), "Union should reach the parent x_max");
            assert_eq!(y_min, region.y_min(), "Union should reach the parent y_min");
            assert_eq!(y_max, region.y_max(), "Union should reach the parent y_max");

            // Siblings meet exactly on shared edges, no gap and no overlap.
            assert_eq!(quads[0].x_max(), quads[1].x_min(), "NW/NE shared edge");
            assert_eq!(quads[2].x_max(), quads[3].x_min(), "SW/SE shared edge");
            assert_eq!(quads[0].y_min(), quads[2].y_max(), "NW/SW shared edge");
            assert_eq!(quads[1].y_min(), quads[3].y_max(), "NE/SE shared edge");

            // Interiors are pairwise disjoint.
            assert!(
                quads[0].x_max() <= quads[1].x_min() && quads[0].y_min() >= quads[2].y_max(),
                "Quadrant interiors should not overlap"
            );
        }
    }

    #[test]
    fn degenerate_region_collapses_to_line() {
        let line = bottom_up(2.0, 0.0, 0.0, 10.0);
        assert!(
            line.contains(&point![2.0, 5.0]),
            "Point exactly on the collapsed axis should be contained"
        );
        assert!(
            !line.contains(&point![2.1, 5.0]),
            "Point off the collapsed axis should not be contained"
        );

        for quad in line.quarter() {
            assert_eq!(quad.width(), 0.0, "Quartering keeps the zero dimension");
            assert_eq!(quad.height(), 5.0, "Non-zero dimension halves exactly");
        }
    }

    #[test]
    fn window_is_half_open() {
        let window = make_window(0.0, 0.0, 10.0, 10.0);
        assert!(
            window.admits(&point![0.0, 0.0]),
            "Minimum corner should be admitted"
        );
        assert!(
            !window.admits(&point![10.0, 5.0]),
            "Point on the exclusive x bound should not be admitted"
        );
        assert!(
            !window.admits(&point![5.0, 10.0]),
            "Point on the exclusive y bound should not be admitted"
        );
        assert!(
            window.admits(&point![9.999, 9.999]),
            "Point just inside both upper bounds should be admitted"
        );
    }

    #[test]
    fn overlap_keeps_points_on_region_max_edge() {
        // A point on a node's max edge can still satisfy the half-open
        // window test, so pruning must not discard that node.
        let region = bottom_up(0.0, 0.0, 5.0, 5.0);
        let window = make_window(5.0, 0.0, 5.0, 5.0);
        assert!(
            region.overlaps(&window),
            "Region touching the window's min edge may hold an admitted point"
        );

        let disjoint = make_window(5.5, 0.0, 5.0, 5.0);
        assert!(
            !region.overlaps(&disjoint),
            "Region strictly left of the window should be pruned"
        );

        let behind = make_window(-5.0, 0.0, 5.0, 5.0);
        assert!(
            !region.overlaps(&behind),
            "Window ending at the region's min edge admits nothing inside it"
        );
    }
}
