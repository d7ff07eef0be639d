//! Game Module
//!
//! Board-game-specific presentation built on top of the engine: the
//! authoritative snapshot model, the intents sent back to the rule engine,
//! visual/input configuration, and the board scene that composes the
//! animation stack.

pub mod assets;
pub mod config;
pub mod intents;
pub mod scenes;
pub mod state;

pub use assets::TextureCache;
pub use config::{CameraTuning, InputConfig, VisualConfig};
pub use intents::{HoverEvent, PlayerIntent};
pub use scenes::{BoardScene, SceneServices};
pub use state::{
    BoardSnapshot, ChallengeTarget, EnemyColor, EnemyToken, ExploreTarget, LegalMoves,
    PlayerState, SiteAction, SiteTarget, TileState,
};
