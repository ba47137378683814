//! [`looms`](crate) is a rules-engine library for five-dimensional chess with
//! multiverse time travel. It deals with board representation across branching
//! timelines, 4-D move generation, the turn-submission ("Present") protocol,
//! and 5D-PGN parsing. Rendering, network transport and engine search are
//! deliberately out of scope: they consume this crate through
//! [`GameState`](state::GameState) and the rights-gated entry points on it.

use thiserror::Error;

use crate::coords::BoardId;

/// Snapshots of single boards, one per (turn, timeline, colour).
pub mod board;
/// Castle zones, castle-rights bitset and castling geometry.
pub mod castling;
/// The countdown clock consumed at submission and undo boundaries.
pub mod clock;
/// Low-level helper functions shared by the parsing code.
pub mod common;
/// 2-D and 4-D integer vectors plus the colour-tagged absolute variants.
pub mod coords;
/// Pseudo-legal move generation, implemented on [`state::GameState`].
pub mod movegen;
/// Moves, move kinds and the applied-move history entry.
pub mod moves;
/// 5D-PGN import/export and the built-in variant registry.
pub mod pgn;
/// Colours, piece kinds and the sliding-capability sets.
pub mod pieces;
/// The aggregate root: the multiverse, history, and the turn protocol.
pub mod state;
/// Combinatorial derivation of the 4-D step tables.
pub mod steps;

pub use crate::state::GameState;

pub type Res<T> = anyhow::Result<T>;

/// Structural failures of the engine. Authorization and active-colour
/// rejections are deliberately *not* errors: those surface as `false` returns
/// so that networked and UI callers can drop bad input without unwinding.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EngineError {
    /// The caller referenced a board identity that is not part of the game.
    #[error("no board exists at {0}")]
    ReferencedBoardMissing(BoardId),
    /// The origin board already has a successor, so it can no longer move.
    #[error("board {0} is frozen (it already has a successor)")]
    FrozenBoardMove(BoardId),
    /// The document failed the 5D-PGN grammar.
    #[error("malformed notation: {0}")]
    MalformedNotation(String),
    /// Move pairs must be numbered `1.`, `2.`, ... without gaps.
    #[error("moves out of order (expected '{expected}.', got '{got}.')")]
    MovesOutOfOrder { expected: u32, got: u32 },
    /// Only `[Mode "5D"]` documents are understood.
    #[error("unsupported mode '{0}'")]
    UnsupportedMode(String),
}
