//! Board Snapshot
//!
//! Read-only model of the authoritative game state as the rule engine
//! publishes it each turn. The scene diffs consecutive snapshots to decide
//! what to animate; nothing here is ever mutated locally.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::hex::AxialCoord;
use crate::path::{MoveTarget, ReachableHex};

/// One placed map tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileState {
    pub id: String,
    /// Center hex of the tile; individual hexes are addressed absolutely.
    pub center: AxialCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnemyColor {
    Green,
    Grey,
    Brown,
    Violet,
    Red,
    White,
}

/// An enemy token occupying a hex. Unrevealed tokens render face-down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyToken {
    pub id: String,
    pub hex: AxialCoord,
    pub color: EnemyColor,
    pub revealed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: String,
    pub hex: AxialCoord,
    /// Whose turn it is; exactly one player is active per snapshot.
    pub is_active: bool,
}

/// A hex the player may reveal a new tile from, with the direction the new
/// tile would extend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreTarget {
    pub hex: AxialCoord,
    pub direction: crate::hex::HexDirection,
    pub cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeTarget {
    pub hex: AxialCoord,
    pub enemy_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SiteAction {
    Enter,
    Burn,
    Plunder,
}

/// A site hex (keep, village, monastery...) and the actions legal on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteTarget {
    pub hex: AxialCoord,
    pub actions: Vec<SiteAction>,
}

/// Everything the active player may legally do this turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalMoves {
    pub move_targets: Vec<MoveTarget>,
    pub reachable: Vec<ReachableHex>,
    pub explore: Vec<ExploreTarget>,
    pub challenges: Vec<ChallengeTarget>,
    pub sites: Vec<SiteTarget>,
}

/// One immutable state snapshot from the rule engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub turn: u32,
    pub tiles: Vec<TileState>,
    #[serde(default)]
    pub enemies: Vec<EnemyToken>,
    pub players: Vec<PlayerState>,
    #[serde(default)]
    pub legal_moves: LegalMoves,
}

impl BoardSnapshot {
    /// Parse a snapshot from the rule engine's JSON payload.
    pub fn from_json(payload: &str) -> anyhow::Result<Self> {
        serde_json::from_str(payload).context("malformed board snapshot")
    }

    /// The player whose turn it is, if any.
    pub fn active_player(&self) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.is_active)
    }

    /// The tile IDs present in this snapshot but not in `previous`.
    pub fn new_tiles<'a>(&'a self, previous: &BoardSnapshot) -> Vec<&'a TileState> {
        self.tiles
            .iter()
            .filter(|t| !previous.tiles.iter().any(|p| p.id == t.id))
            .collect()
    }

    /// The enemy on a given hex, if any.
    pub fn enemy_at(&self, hex: AxialCoord) -> Option<&EnemyToken> {
        self.enemies.iter().find(|e| e.hex == hex)
    }
}
