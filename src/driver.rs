//! Glue between the quadtree core and an external vector-data store.
//!
//! The store is modeled as three narrow capabilities rather than one shared
//! handle: [`ExtentSource`] (bounding extent of a reference layer),
//! [`PointSource`] (stable enumeration of point records), and [`RankSink`]
//! (writing a computed rank back onto a record). [`assign_ranks`] wires them
//! together: it bootstraps a capacity-1 tree from the extent, inserts every
//! point in enumeration order, and writes each point's pre-order traversal
//! position as its rank. [`extent_sheet`] shapes the extent into the closed
//! polygon ring plus projection/encoding sidecar data the store persists.
//!
//! None of this performs I/O itself; read/write failures surface as
//! [`QuadError`] values from the capability implementations, and a failed
//! batch aborts before any rank is written so the store is never partially
//! labeled.

use geo::{LineString, Polygon};
use nalgebra::point;
use tracing::{debug, warn};

use crate::{Locate, P2, QuadError, QuadTree, Region, Result, YAxis};

/// Bounding extent of a reference geometry layer, as four finite coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    /// Horizontal size of the extent
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical size of the extent
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Region covering the extent under the given axis convention.
    ///
    /// Top-down trees anchor at `(x_min, y_max)`, bottom-up trees at
    /// `(x_min, y_min)`; either way the region spans the full extent.
    pub fn region(&self, axis: YAxis) -> Region {
        let origin = match axis {
            YAxis::TopDown => point![self.x_min, self.y_max],
            YAxis::BottomUp => point![self.x_min, self.y_min],
        };
        Region::new(origin, self.width(), self.height(), axis)
    }
}

/// One point record enumerated from the store: a position plus the opaque
/// identifier the store keys its records by.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site<Id> {
    pub position: P2,
    pub id: Id,
}

impl<Id> Locate for Site<Id> {
    fn position(&self) -> P2 {
        self.position
    }
}

/// Capability: read the bounding extent of a reference geometry layer.
pub trait ExtentSource {
    fn extent(&self) -> Result<Extent>;
}

/// Capability: enumerate point records in stable order.
///
/// The enumeration order is the tree's insertion order, so it decides which
/// point wins a quadrant-boundary tie and the resident order within a leaf.
pub trait PointSource {
    /// Identifier the store keys its records by
    type Id: Clone;

    fn points(&self) -> Result<Vec<Site<Self::Id>>>;
}

/// Capability: persist a computed rank onto the record with the given id.
///
/// Formatting the rank into a stored label is the implementation's business.
pub trait RankSink<Id> {
    fn write_rank(&mut self, id: &Id, rank: usize) -> Result<()>;
}

/// Rank every point of the store by its pre-order traversal position.
///
/// Builds a capacity-1, top-down tree sized to the store's reference extent,
/// inserts all points in enumeration order, then writes each point's 0-based
/// traversal index through the sink. Returns the number of ranked points.
///
/// ## Errors
/// Any point outside the reference extent aborts the whole batch with
/// [`QuadError::OutOfBounds`] before a single rank is written; the extent is
/// supposed to cover every point, so reaching this means it was read from the
/// wrong layer or with the wrong axis convention. Store read/write failures
/// propagate unchanged.
pub fn assign_ranks<S>(store: &mut S) -> Result<usize>
where
    S: ExtentSource + PointSource + RankSink<<S as PointSource>::Id>,
{
    let extent = store.extent()?;
    let sites = store.points()?;
    debug!(
        count = sites.len(),
        x_min = extent.x_min,
        y_max = extent.y_max,
        "ranking sites against reference extent"
    );

    let mut tree = QuadTree::new(extent.region(YAxis::TopDown), 1)?;
    for site in &sites {
        if !tree.insert(site) {
            warn!(
                x = site.position.x,
                y = site.position.y,
                "site outside reference extent, aborting batch"
            );
            return Err(QuadError::OutOfBounds {
                x: site.position.x,
                y: site.position.y,
            });
        }
    }

    // The traversal position carries the rank directly; no per-point index
    // lookups against the ordered sequence.
    let mut ranked = 0;
    for (rank, site) in tree.preorder().enumerate() {
        store.write_rank(&site.id, rank)?;
        ranked += 1;
    }
    debug!(ranked, "wrote spatial ranks");
    Ok(ranked)
}

/// Format a rank as a zero-padded label with a fixed prefix.
///
/// `rank_label("YZ", 7, 4)` yields `"YZ-0007"`.
pub fn rank_label(prefix: &str, rank: usize, width: usize) -> String {
    format!("{prefix}-{rank:0width$}")
}

/// Text encoding declared for the store's attribute data sidecar
pub const SHEET_ENCODING: &str = "UTF-8";

/// Persistable shape of a layer's bounding extent: the closed boundary ring
/// plus the projection and encoding sidecar contents.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtentSheet {
    /// Closed polygon over the four extent corners
    pub boundary: Polygon<f64>,
    /// Coordinate-reference-system descriptor, persisted as the projection
    /// sidecar
    pub crs_wkt: String,
    /// Text encoding declaration, persisted as the encoding sidecar
    pub encoding: &'static str,
}

/// Shape an extent into its persistable polygon form.
///
/// The ring runs top-left, top-right, bottom-right, bottom-left and closes
/// back on the first corner. Pure data shaping; the store writes it out.
pub fn extent_sheet(extent: &Extent, crs_wkt: impl Into<String>) -> ExtentSheet {
    let ring = LineString::from(vec![
        (extent.x_min, extent.y_max),
        (extent.x_max, extent.y_max),
        (extent.x_max, extent.y_min),
        (extent.x_min, extent.y_min),
    ]);
    ExtentSheet {
        boundary: Polygon::new(ring, vec![]),
        crs_wkt: crs_wkt.into(),
        encoding: SHEET_ENCODING,
    }
}
