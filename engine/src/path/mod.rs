//! Pathfinding & Reachability Boundary
//!
//! Pure functions over the reachability snapshot supplied by the rule
//! engine. Path display walks the engine's own `came_from` back-pointers —
//! re-running a local search here can tie-break differently from the server
//! (and route the player through an encounter it deliberately avoided), so
//! [`reconstruct_path`] never searches. [`preview_path`] is the one
//! exception: a local A* used only to sketch a cosmetic preview when no
//! back-pointer data exists, never for gameplay decisions.

mod boundary;

pub use boundary::{BoundaryEdge, boundary_edges, chain_outline};

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::hex::AxialCoord;

/// Authoritative multi-hop reachability record.
///
/// The `came_from` back-pointers form a tree rooted at the player's hex.
/// Read-only snapshot; supplied externally per turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachableHex {
    pub hex: AxialCoord,
    pub total_cost: u32,
    /// A terminal hex ends the move sequence (e.g. triggers an encounter).
    pub is_terminal: bool,
    #[serde(default)]
    pub came_from: Option<AxialCoord>,
}

/// Single-hop analogue of [`ReachableHex`]: origin is implicitly the player,
/// so no back-pointer is carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTarget {
    pub hex: AxialCoord,
    pub cost: u32,
    #[serde(default)]
    pub is_terminal: bool,
}

/// Reconstruct the path the rule engine actually computed, from `start`
/// (the player's hex) to `end`, by walking `came_from` pointers backward
/// and reversing.
///
/// Returns `[start]` when `end == start`, and an empty path when `end` is
/// neither reachable nor a single-hop target — "no path" is a normal
/// outcome here, not an error. A single-hop [`MoveTarget`] without
/// back-pointer data yields the direct path `[start, end]`.
pub fn reconstruct_path(
    start: AxialCoord,
    end: AxialCoord,
    reachable: &[ReachableHex],
    move_targets: &[MoveTarget],
) -> Vec<AxialCoord> {
    if end == start {
        return vec![start];
    }

    let by_key: HashMap<i64, &ReachableHex> =
        reachable.iter().map(|r| (r.hex.key(), r)).collect();

    if by_key.contains_key(&end.key()) {
        let mut path = vec![end];
        let mut current = end;
        while current != start {
            // The back-pointer tree can never be deeper than the set itself;
            // anything longer is corrupt snapshot data
            if path.len() > reachable.len() + 1 {
                warn!("cycle in came_from chain at {current}; dropping path");
                return Vec::new();
            }
            match by_key.get(&current.key()).and_then(|r| r.came_from) {
                Some(previous) => {
                    path.push(previous);
                    current = previous;
                }
                // Chain ends short of start: a first hop directly from the
                // player, which the tree leaves implicit
                None => {
                    path.push(start);
                    break;
                }
            }
        }
        path.reverse();
        return path;
    }

    if move_targets.iter().any(|t| t.hex == end) {
        return vec![start, end];
    }

    Vec::new()
}

#[derive(PartialEq, Eq)]
struct OpenNode {
    f_score: u32,
    hex: AxialCoord,
}

// BinaryHeap is a max-heap; invert so the lowest f-score pops first
impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.hex.key().cmp(&self.hex.key()))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Local A* over unit-cost hexes, with the axial hop distance as heuristic.
///
/// Cosmetic preview only: its tie-breaks can diverge from the rule engine's
/// chosen path, so nothing gameplay-affecting may be derived from the
/// result. `passable` decides which hexes the preview may cross; expansion
/// is bounded by `max_expansions` so a huge unreachable query stays cheap.
/// Returns an empty path when `end` cannot be reached.
pub fn preview_path(
    start: AxialCoord,
    end: AxialCoord,
    passable: impl Fn(AxialCoord) -> bool,
    max_expansions: usize,
) -> Vec<AxialCoord> {
    if start == end {
        return vec![start];
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<i64, AxialCoord> = HashMap::new();
    let mut g_score: HashMap<i64, u32> = HashMap::new();
    let mut closed: HashSet<i64> = HashSet::new();

    g_score.insert(start.key(), 0);
    open.push(OpenNode {
        f_score: start.distance_to(end),
        hex: start,
    });

    let mut expansions = 0;
    while let Some(OpenNode { hex: current, .. }) = open.pop() {
        if current == end {
            let mut path = vec![current];
            let mut walk = current;
            while let Some(&previous) = came_from.get(&walk.key()) {
                path.push(previous);
                walk = previous;
            }
            path.reverse();
            return path;
        }
        if !closed.insert(current.key()) {
            continue;
        }
        expansions += 1;
        if expansions > max_expansions {
            return Vec::new();
        }

        let tentative = g_score[&current.key()] + 1;
        for neighbor in current.neighbors() {
            if neighbor != end && !passable(neighbor) {
                continue;
            }
            if closed.contains(&neighbor.key()) {
                continue;
            }
            let known = g_score.get(&neighbor.key()).copied();
            if known.is_none_or(|g| tentative < g) {
                g_score.insert(neighbor.key(), tentative);
                came_from.insert(neighbor.key(), current);
                open.push(OpenNode {
                    f_score: tentative + neighbor.distance_to(end),
                    hex: neighbor,
                });
            }
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable(hex: AxialCoord, came_from: Option<AxialCoord>) -> ReachableHex {
        ReachableHex {
            hex,
            total_cost: 1,
            is_terminal: false,
            came_from,
        }
    }

    #[test]
    fn test_start_equals_end() {
        let start = AxialCoord::new(2, -1);
        assert_eq!(reconstruct_path(start, start, &[], &[]), vec![start]);
    }

    #[test]
    fn test_unreachable_end_yields_empty_path() {
        let start = AxialCoord::ORIGIN;
        let end = AxialCoord::new(5, 5);
        let set = vec![reachable(AxialCoord::new(1, 0), None)];
        assert!(reconstruct_path(start, end, &set, &[]).is_empty());
        assert!(reconstruct_path(start, end, &[], &[]).is_empty());
    }

    #[test]
    fn test_back_pointer_chain() {
        let a = AxialCoord::new(0, 0);
        let b = AxialCoord::new(1, 0);
        let c = AxialCoord::new(2, 0);
        let d = AxialCoord::new(3, 0);
        let set = vec![
            reachable(b, Some(a)),
            reachable(c, Some(b)),
            reachable(d, Some(c)),
        ];
        assert_eq!(reconstruct_path(a, d, &set, &[]), vec![a, b, c, d]);
    }

    #[test]
    fn test_missing_back_pointer_falls_back_to_direct_hop() {
        let start = AxialCoord::ORIGIN;
        let end = AxialCoord::new(1, 0);
        let set = vec![reachable(end, None)];
        assert_eq!(reconstruct_path(start, end, &set, &[]), vec![start, end]);
    }

    #[test]
    fn test_move_target_without_reachability_data() {
        let start = AxialCoord::ORIGIN;
        let end = AxialCoord::new(0, 1);
        let targets = vec![MoveTarget {
            hex: end,
            cost: 1,
            is_terminal: false,
        }];
        assert_eq!(reconstruct_path(start, end, &[], &targets), vec![start, end]);
    }

    #[test]
    fn test_corrupt_cycle_yields_empty_path() {
        let a = AxialCoord::new(1, 0);
        let b = AxialCoord::new(2, 0);
        let set = vec![reachable(a, Some(b)), reachable(b, Some(a))];
        assert!(reconstruct_path(AxialCoord::ORIGIN, b, &set, &[]).is_empty());
    }

    #[test]
    fn test_preview_straight_line() {
        let start = AxialCoord::ORIGIN;
        let end = AxialCoord::new(3, 0);
        let path = preview_path(start, end, |_| true, 256);
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance_to(pair[1]), 1);
        }
    }

    #[test]
    fn test_preview_routes_around_a_wall() {
        let start = AxialCoord::ORIGIN;
        let end = AxialCoord::new(2, 0);
        let wall = AxialCoord::new(1, 0);
        let path = preview_path(start, end, |hex| hex != wall, 256);
        assert!(!path.is_empty());
        assert!(!path.contains(&wall));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_preview_respects_expansion_bound() {
        let start = AxialCoord::ORIGIN;
        let end = AxialCoord::new(100, 0);
        // Nothing is passable, so the search exhausts without finding end
        let path = preview_path(start, end, |_| false, 8);
        assert!(path.is_empty());
    }
}
