//! Pixel occupancy masks for oriented rectangles.
//!
//! Both track segments and car footprints are rasterized once into a boolean
//! grid covering their axis-aligned bounding box. Collision tests then compare
//! pixels directly, which keeps rotated shapes exact instead of falling back to
//! bounding boxes.

use geo::{BoundingRect, Coord, Point, Polygon, Rect, Rotate};
use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

/// Integer axis-aligned rectangle in world pixels.
///
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    /// Leftmost pixel column.
    pub left: i32,
    /// Topmost pixel row.
    pub top: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Returns `true` if the rectangles share at least one pixel.
    ///
    /// Rectangles that merely touch along an edge do not intersect.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// Slack on the half-open edge test so pixel centers that sit exactly on an
/// edge land on the same side regardless of rotation rounding.
const EDGE_EPSILON: f64 = 1e-4;

/// Exact per-pixel occupancy of a shape, anchored at a world position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    /// World-space box covered by `bits`.
    bounds: PixelRect,
    /// Occupancy indexed as `(row, column)`.
    bits: Array2<bool>,
}

impl Mask {
    /// Rasterizes a `width` × `height` rectangle centered on `center` and
    /// rotated by `angle` degrees.
    ///
    /// Positive angles turn clockwise on screen (y grows downward), matching
    /// how headings are integrated. `width` runs along the rotated x axis.
    ///
    /// A pixel is occupied when its center, taken into the rectangle's own
    /// frame, lies in `[-width/2, width/2) × [-height/2, height/2)`. An
    /// unrotated rectangle with whole-pixel sides therefore covers exactly
    /// `width * height` pixels wherever it is centered.
    pub fn oriented_rect(center: Point<f32>, angle: f32, width: f32, height: f32) -> Self {
        let half = Coord {
            x: width / 2.0,
            y: height / 2.0,
        };
        let polygon = Rect::new(center.0 - half, center.0 + half)
            .to_polygon()
            .rotate_around_point(angle, center);
        let bounds = pixel_bounds(&polygon, center);

        let (sin, cos) = f64::from(angle).to_radians().sin_cos();
        let (half_w, half_h) = (f64::from(half.x), f64::from(half.y));
        let (cx, cy) = (f64::from(center.x()), f64::from(center.y()));

        let bits = Array2::from_shape_fn(
            (bounds.height as usize, bounds.width as usize),
            |(row, col)| {
                let dx = f64::from(bounds.left) + col as f64 + 0.5 - cx;
                let dy = f64::from(bounds.top) + row as f64 + 0.5 - cy;
                // undo the rotation
                let lx = dx * cos + dy * sin;
                let ly = dy * cos - dx * sin;
                half_open(lx, half_w) && half_open(ly, half_h)
            },
        );

        Self { bounds, bits }
    }

    /// World-space bounding rectangle of the mask.
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    /// Looks up a pixel in mask-local coordinates.
    ///
    /// Returns `None` when the coordinate lies outside the mask.
    pub fn get(&self, col: i32, row: i32) -> Option<bool> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        self.bits.get((row, col)).copied()
    }

    /// Returns `true` if the world pixel `(x, y)` is occupied.
    ///
    /// Pixels outside the mask are simply unoccupied.
    pub fn contains_pixel(&self, x: i32, y: i32) -> bool {
        self.get(x - self.bounds.left, y - self.bounds.top)
            .unwrap_or(false)
    }

    /// Number of occupied pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// Returns `true` if any pixel is occupied by both masks.
    ///
    /// The masks are aligned by the offset between their world origins.
    pub fn overlaps(&self, other: &Mask) -> bool {
        let (a, b) = (self.bounds, other.bounds);
        if !a.intersects(&b) {
            return false;
        }

        let left = a.left.max(b.left);
        let right = a.right().min(b.right());
        let top = a.top.max(b.top);
        let bottom = a.bottom().min(b.bottom());

        let own = self.bits.slice(s![
            (top - a.top) as usize..(bottom - a.top) as usize,
            (left - a.left) as usize..(right - a.left) as usize
        ]);
        let theirs = other.bits.slice(s![
            (top - b.top) as usize..(bottom - b.top) as usize,
            (left - b.left) as usize..(right - b.left) as usize
        ]);

        own.iter().zip(theirs.iter()).any(|(&p, &q)| p && q)
    }
}

/// Smallest pixel rectangle enclosing the polygon.
fn pixel_bounds(polygon: &Polygon<f32>, center: Point<f32>) -> PixelRect {
    let Some(rect) = polygon.bounding_rect() else {
        return PixelRect::new(center.x().floor() as i32, center.y().floor() as i32, 0, 0);
    };

    let left = rect.min().x.floor() as i32;
    let top = rect.min().y.floor() as i32;
    let right = rect.max().x.ceil() as i32;
    let bottom = rect.max().y.ceil() as i32;

    PixelRect::new(left, top, right - left, bottom - top)
}

/// `-half <= v < half`, with both edges nudged by [`EDGE_EPSILON`].
fn half_open(v: f64, half: f64) -> bool {
    v >= -half - EDGE_EPSILON && v < half - EDGE_EPSILON
}
