//! Boundary edges of the reachable region.
//!
//! For each reachable hex and each of its six neighbors, the hex's own edge
//! facing that neighbor is a boundary edge iff the neighbor is outside the
//! set. Edges share vertices at corners, so concatenating them yields a
//! closed outline without any polygon merging.

use std::collections::HashSet;

use glam::Vec2;
use strum::IntoEnumIterator;

use super::ReachableHex;
use crate::hex::{AxialCoord, HexDirection, hex_to_pixel, hex_vertices};

/// One edge of the reachable-region outline, in pixel space.
///
/// Derived, never stored: recomputed from the reachability set each time it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEdge {
    pub start: Vec2,
    pub end: Vec2,
    /// Inherited from the owning hex, for differential styling.
    pub is_terminal: bool,
    pub owner: AxialCoord,
    pub direction: HexDirection,
}

/// Compute the outline of the reachable region.
///
/// `player` is the implicit member of the set (the origin of every move),
/// included even when the snapshot omits it. `hex_size` is the circumradius
/// used for [`hex_to_pixel`].
pub fn boundary_edges(
    reachable: &[ReachableHex],
    player: AxialCoord,
    hex_size: f32,
) -> Vec<BoundaryEdge> {
    let mut members: HashSet<i64> = reachable.iter().map(|r| r.hex.key()).collect();
    members.insert(player.key());

    let vertices = hex_vertices(hex_size);
    let mut edges = Vec::new();

    let hexes = reachable
        .iter()
        .map(|r| (r.hex, r.is_terminal))
        .chain(
            // The player hex contributes edges too, unless the snapshot
            // already listed it
            (!reachable.iter().any(|r| r.hex == player))
                .then_some((player, false)),
        );

    for (hex, is_terminal) in hexes {
        let center = hex_to_pixel(hex, hex_size);
        for direction in HexDirection::iter() {
            if members.contains(&hex.neighbor(direction).key()) {
                continue;
            }
            let (a, b) = direction.edge_vertices();
            edges.push(BoundaryEdge {
                start: center + vertices[a],
                end: center + vertices[b],
                is_terminal,
                owner: hex,
                direction,
            });
        }
    }
    edges
}

/// Order a set of boundary edges into a polyline by chaining shared
/// vertices, starting from the first edge.
///
/// Feeds the tracer effect, which wants an ordered outline to draw along.
/// When the edge set contains several disjoint loops only the loop reachable
/// from the first edge is returned.
pub fn chain_outline(edges: &[BoundaryEdge]) -> Vec<Vec2> {
    const EPSILON: f32 = 1e-2;

    let Some((first, rest)) = edges.split_first() else {
        return Vec::new();
    };
    let mut remaining: Vec<&BoundaryEdge> = rest.iter().collect();
    let mut outline = vec![first.start, first.end];

    while let Some(tip) = outline.last().copied() {
        let Some(index) = remaining.iter().position(|e| {
            e.start.distance_squared(tip) < EPSILON || e.end.distance_squared(tip) < EPSILON
        }) else {
            break;
        };
        let edge = remaining.swap_remove(index);
        let next = if edge.start.distance_squared(tip) < EPSILON {
            edge.end
        } else {
            edge.start
        };
        // Closed the loop
        if next.distance_squared(outline[0]) < EPSILON {
            outline.push(outline[0]);
            break;
        }
        outline.push(next);
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(hex: AxialCoord) -> ReachableHex {
        ReachableHex {
            hex,
            total_cost: 1,
            is_terminal: false,
            came_from: None,
        }
    }

    #[test]
    fn test_isolated_hex_has_six_edges() {
        let player = AxialCoord::ORIGIN;
        let edges = boundary_edges(&[], player, 10.0);
        assert_eq!(edges.len(), 6);

        let directions: HashSet<_> = edges.iter().map(|e| e.direction).collect();
        assert_eq!(directions.len(), 6);
        for edge in &edges {
            assert_eq!(edge.owner, player);
        }
    }

    #[test]
    fn test_seven_hex_cluster() {
        let center = AxialCoord::ORIGIN;
        let ring: Vec<ReachableHex> = center.neighbors().map(member).collect();
        let edges = boundary_edges(&ring, center, 10.0);

        // Center contributes nothing; each outer hex exactly 3 edges
        assert!(edges.iter().all(|e| e.owner != center));
        for hex in center.neighbors() {
            let count = edges.iter().filter(|e| e.owner == hex).count();
            assert_eq!(count, 3, "hex {hex} should contribute 3 edges");
        }
        assert_eq!(edges.len(), 18);
    }

    #[test]
    fn test_terminal_flag_carries_to_edges() {
        let player = AxialCoord::ORIGIN;
        let terminal = ReachableHex {
            is_terminal: true,
            ..member(AxialCoord::new(1, 0))
        };
        let edges = boundary_edges(&[terminal], player, 10.0);
        for edge in edges {
            if edge.owner == AxialCoord::new(1, 0) {
                assert!(edge.is_terminal);
            } else {
                assert!(!edge.is_terminal);
            }
        }
    }

    #[test]
    fn test_player_listed_in_snapshot_not_duplicated() {
        let player = AxialCoord::ORIGIN;
        let edges = boundary_edges(&[member(player)], player, 10.0);
        assert_eq!(edges.len(), 6);
    }

    #[test]
    fn test_outline_chains_into_closed_loop() {
        let player = AxialCoord::ORIGIN;
        let edges = boundary_edges(&[], player, 10.0);
        let outline = chain_outline(&edges);

        // 6 edges chain into 6 distinct vertices plus the closing point
        assert_eq!(outline.len(), 7);
        assert!(outline[0].distance_squared(outline[6]) < 1e-2);
    }

    #[test]
    fn test_outline_of_empty_set() {
        assert!(chain_outline(&[]).is_empty());
    }
}
