//! Hex/Pixel Geometry
//!
//! Axial-coordinate addressing for the pointy-top hex board, plus the pixel
//! transforms every other module relies on. [`hex_to_pixel`] is the single
//! source of truth for a hex's world position: reachability-boundary and
//! tile-cluster math depend on its vertex ordering matching exactly, so
//! nothing else in the crate re-derives the formula.
//!
//! Screen convention: +x right, +y down. Hexes are pointy-top; `+r` steps
//! toward screen-down, `+q` toward screen-right.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Width factor of a pointy-top hex: sqrt(3).
pub const SQRT_3: f32 = 1.732_050_8;

/// Integer axial address of a hex on the board.
///
/// Identity is the `(q, r)` pair; [`AxialCoord::key`] packs it into a stable
/// `i64` for use as a map key where a primitive is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Stable packed identity key (`q` in the high 32 bits).
    pub const fn key(self) -> i64 {
        ((self.q as i64) << 32) | (self.r as i64 & 0xffff_ffff)
    }

    /// The adjacent hex in the given direction.
    pub fn neighbor(self, direction: HexDirection) -> Self {
        let (dq, dr) = direction.offset();
        Self::new(self.q + dq, self.r + dr)
    }

    /// All six adjacent hexes, in [`HexDirection`] iteration order.
    pub fn neighbors(self) -> impl Iterator<Item = AxialCoord> {
        HexDirection::iter().map(move |dir| self.neighbor(dir))
    }

    /// Hop distance between two hexes.
    ///
    /// Standard axial/cube distance: the number of single-hex steps needed to
    /// walk from `self` to `other`. Used as the A* heuristic.
    pub fn distance_to(self, other: AxialCoord) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        // Cube coords satisfy q + r + s = 0, so ds = -(dq + dr)
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }
}

impl fmt::Display for AxialCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// The six directions out of a pointy-top hex.
///
/// Iteration order is counter-clockwise starting at `East`. Each direction
/// knows its axial offset and which pair of the owner's vertices (from
/// [`hex_vertices`]) forms the edge facing it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Axial `(dq, dr)` offset of this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            HexDirection::East => (1, 0),
            HexDirection::NorthEast => (1, -1),
            HexDirection::NorthWest => (0, -1),
            HexDirection::West => (-1, 0),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::SouthEast => (0, 1),
        }
    }

    /// Indices into [`hex_vertices`] of the edge that faces this direction,
    /// in clockwise order along the hex outline.
    pub const fn edge_vertices(self) -> (usize, usize) {
        match self {
            HexDirection::NorthEast => (0, 1),
            HexDirection::East => (1, 2),
            HexDirection::SouthEast => (2, 3),
            HexDirection::SouthWest => (3, 4),
            HexDirection::West => (4, 5),
            HexDirection::NorthWest => (5, 0),
        }
    }

    /// The opposite direction.
    pub const fn opposite(self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }
}

/// Convert an axial coordinate to the pixel position of the hex center.
///
/// `size` is the circumradius (center-to-vertex distance) of a hex.
pub fn hex_to_pixel(coord: AxialCoord, size: f32) -> Vec2 {
    Vec2::new(
        SQRT_3 * size * (coord.q as f32 + coord.r as f32 / 2.0),
        1.5 * size * coord.r as f32,
    )
}

/// Convert a pixel position back to the hex containing it.
///
/// Fractional axial coordinates are resolved with cube rounding, so positions
/// near an edge always land in exactly one hex. Used for gesture picking.
pub fn pixel_to_hex(pos: Vec2, size: f32) -> AxialCoord {
    let q = (SQRT_3 / 3.0 * pos.x - pos.y / 3.0) / size;
    let r = (2.0 / 3.0 * pos.y) / size;
    axial_round(q, r)
}

/// Round fractional axial coordinates to the nearest hex (cube rounding).
fn axial_round(q: f32, r: f32) -> AxialCoord {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    AxialCoord::new(rq as i32, rr as i32)
}

/// The six vertices of a pointy-top hex of the given circumradius, centered
/// on the origin.
///
/// Vertex 0 is the top corner; vertices proceed clockwise in screen space
/// (+y down). [`HexDirection::edge_vertices`] indexes into this array, so the
/// ordering here must never change.
pub fn hex_vertices(size: f32) -> [Vec2; 6] {
    let w = SQRT_3 / 2.0 * size;
    let h = size / 2.0;
    [
        Vec2::new(0.0, -size),
        Vec2::new(w, -h),
        Vec2::new(w, h),
        Vec2::new(0.0, size),
        Vec2::new(-w, h),
        Vec2::new(-w, -h),
    ]
}

/// Rotate a point around the origin by `angle` radians (counter-clockwise in
/// math convention; clockwise on screen because +y points down).
///
/// Used for whole-map orientation.
pub fn rotate(point: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(
        point.x * cos - point.y * sin,
        point.x * sin + point.y * cos,
    )
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Bounds containing exactly one point.
    pub fn at(point: Vec2) -> Self {
        Self { min: point, max: point }
    }

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The smallest bounds containing both inputs.
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow by `margin` on every side.
    pub fn inflate(self, margin: f32) -> Bounds {
        Bounds {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    pub fn center(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Clamp a point into the bounds.
    pub fn clamp(self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// The bounding rectangle of a set of points.
///
/// Returns `None` for an empty set.
pub fn bounds_of(points: &[Vec2]) -> Option<Bounds> {
    let (first, rest) = points.split_first()?;
    let mut bounds = Bounds::at(*first);
    for p in rest {
        bounds.min = bounds.min.min(*p);
        bounds.max = bounds.max.max(*p);
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_distance() {
        let origin = AxialCoord::ORIGIN;
        assert_eq!(origin.distance_to(origin), 0);
        for neighbor in origin.neighbors() {
            assert_eq!(origin.distance_to(neighbor), 1);
        }
        assert_eq!(origin.distance_to(AxialCoord::new(3, -1)), 3);
        assert_eq!(origin.distance_to(AxialCoord::new(-2, -2)), 4);
    }

    #[test]
    fn test_neighbors_are_distinct() {
        let coord = AxialCoord::new(4, -2);
        let neighbors: Vec<_> = coord.neighbors().collect();
        assert_eq!(neighbors.len(), 6);
        for (i, a) in neighbors.iter().enumerate() {
            for b in &neighbors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_opposite_round_trip() {
        for dir in HexDirection::iter() {
            assert_eq!(dir.opposite().opposite(), dir);
            let coord = AxialCoord::new(1, 2);
            assert_eq!(coord.neighbor(dir).neighbor(dir.opposite()), coord);
        }
    }

    #[test]
    fn test_direction_wire_casing() {
        // Rule-engine payloads spell directions in camelCase
        let json = serde_json::to_string(&HexDirection::NorthEast).unwrap();
        assert_eq!(json, r#""northEast""#);
        let east: HexDirection = serde_json::from_str(r#""east""#).unwrap();
        assert_eq!(east, HexDirection::East);
    }

    #[test]
    fn test_packed_key_is_unique() {
        let coords = [
            AxialCoord::new(0, 0),
            AxialCoord::new(0, 1),
            AxialCoord::new(1, 0),
            AxialCoord::new(-1, 0),
            AxialCoord::new(0, -1),
            AxialCoord::new(i32::MAX, i32::MIN),
        ];
        for (i, a) in coords.iter().enumerate() {
            for b in &coords[i + 1..] {
                assert_ne!(a.key(), b.key());
            }
        }
    }

    #[test]
    fn test_pixel_round_trip() {
        let size = 24.0;
        for q in -5..=5 {
            for r in -5..=5 {
                let coord = AxialCoord::new(q, r);
                assert_eq!(pixel_to_hex(hex_to_pixel(coord, size), size), coord);
            }
        }
    }

    #[test]
    fn test_pixel_to_hex_near_edges() {
        let size = 10.0;
        let coord = AxialCoord::new(2, -1);
        let center = hex_to_pixel(coord, size);
        // Points inside the hex but off-center still resolve to it
        for vertex in hex_vertices(size) {
            let inside = center + vertex * 0.9;
            assert_eq!(pixel_to_hex(inside, size), coord);
        }
    }

    #[test]
    fn test_edge_faces_its_neighbor() {
        // The midpoint of the edge facing a direction must be the midpoint
        // between the hex center and the neighbor center. This pins the
        // vertex ordering that boundary math depends on.
        let size = 16.0;
        let coord = AxialCoord::new(-1, 3);
        let center = hex_to_pixel(coord, size);
        let vertices = hex_vertices(size);
        for dir in HexDirection::iter() {
            let (a, b) = dir.edge_vertices();
            let edge_mid = center + (vertices[a] + vertices[b]) * 0.5;
            let neighbor_center = hex_to_pixel(coord.neighbor(dir), size);
            let expected = (center + neighbor_center) * 0.5;
            assert_approx_eq!(edge_mid.x, expected.x, 1e-3);
            assert_approx_eq!(edge_mid.y, expected.y, 1e-3);
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert_approx_eq!(p.x, 0.0, 1e-6);
        assert_approx_eq!(p.y, 1.0, 1e-6);
    }

    #[test]
    fn test_bounds_of_points() {
        let bounds = bounds_of(&[
            Vec2::new(-2.0, 5.0),
            Vec2::new(3.0, -1.0),
            Vec2::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vec2::new(-2.0, -1.0));
        assert_eq!(bounds.max, Vec2::new(3.0, 5.0));
        assert!(bounds.contains(Vec2::ZERO));
        assert!(!bounds.contains(Vec2::new(4.0, 0.0)));
        assert!(bounds_of(&[]).is_none());
    }
}
