//! Player Intents
//!
//! Discrete commands emitted toward the rule engine, only ever in response
//! to a completed user gesture — never speculatively. Hover events flow the
//! other way, toward the UI chrome for tooltips.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::hex::{AxialCoord, HexDirection};

/// A command for the rule engine, produced by a completed gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlayerIntent {
    MoveTo {
        hex: AxialCoord,
    },
    Explore {
        hex: AxialCoord,
        direction: HexDirection,
    },
    Challenge {
        hex: AxialCoord,
        enemy_id: String,
    },
    EnterSite {
        hex: AxialCoord,
    },
    BurnSite {
        hex: AxialCoord,
    },
    PlunderSite {
        hex: AxialCoord,
    },
}

/// Hover information for the tooltip layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverEvent {
    pub coord: AxialCoord,
    /// Hex center in screen pixels.
    pub screen_pos: Vec2,
    /// Hex circumradius in screen pixels at the current zoom, so the
    /// tooltip can anchor outside the hex.
    pub screen_hex_radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serializes_tagged() {
        let intent = PlayerIntent::Explore {
            hex: AxialCoord::new(3, -2),
            direction: HexDirection::East,
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains(r#""kind":"explore""#));
        let back: PlayerIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intent);
    }
}
