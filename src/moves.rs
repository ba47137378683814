use static_assertions::const_assert;
use std::mem::size_of;
use strum_macros::EnumIter;

use crate::castling::CastleZone;
use crate::coords::{BoardId, Square, Vec2};
use crate::pieces::{Colour, Piece, PieceKind};

/// The promotion targets a pawn or brawn may turn into.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter)]
#[must_use]
pub enum Promotion {
    Knight,
    Rook,
    Bishop,
    Unicorn,
    Dragon,
    Princess,
    Queen,
}

impl Promotion {
    pub fn kind(self) -> PieceKind {
        match self {
            Promotion::Knight => PieceKind::Knight,
            Promotion::Rook => PieceKind::Rook,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Unicorn => PieceKind::Unicorn,
            Promotion::Dragon => PieceKind::Dragon,
            Promotion::Princess => PieceKind::Princess,
            Promotion::Queen => PieceKind::Queen,
        }
    }

    pub fn from_kind(kind: PieceKind) -> Option<Self> {
        Some(match kind {
            PieceKind::Knight => Promotion::Knight,
            PieceKind::Rook => Promotion::Rook,
            PieceKind::Bishop => Promotion::Bishop,
            PieceKind::Unicorn => Promotion::Unicorn,
            PieceKind::Dragon => Promotion::Dragon,
            PieceKind::Princess => Promotion::Princess,
            PieceKind::Queen => Promotion::Queen,
            _ => return None,
        })
    }

    pub fn from_ascii_char(c: char) -> Option<Self> {
        Self::from_kind(PieceKind::from_ascii_char(c)?)
    }

    pub fn letter(self) -> char {
        self.kind().to_ascii_char()
    }
}

/// What a move does beyond relocating one piece.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub enum MoveKind {
    #[default]
    Normal,
    /// Pawn double step; leaves an en-passant target on the new board.
    DoublePush,
    /// Captures the pawn one square behind the target.
    EnPassant,
    Castles(CastleZone),
    Promotion(Promotion),
    /// Advances a board one half-turn without touching any piece.
    ForcedPass,
}

impl MoveKind {
    pub fn promotion(self) -> Option<Promotion> {
        match self {
            MoveKind::Promotion(p) => Some(p),
            _ => None,
        }
    }

    pub fn castle_zone(self) -> Option<CastleZone> {
        match self {
            MoveKind::Castles(zone) => Some(zone),
            _ => None,
        }
    }
}

/// One move as proposed or generated: pseudo-legal until applied.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct Move {
    pub origin: Square,
    pub target: Square,
    pub kind: MoveKind,
}

// moves get collected in bulk, so keep them flat and small
const_assert!(size_of::<Move>() <= 48);

impl Move {
    pub fn new(origin: Square, target: Square) -> Self {
        Self::with_kind(origin, target, MoveKind::Normal)
    }

    pub fn with_kind(origin: Square, target: Square, kind: MoveKind) -> Self {
        Self { origin, target, kind }
    }

    /// The explicit pass: origin and target are the off-grid null position of
    /// the board that is being advanced.
    pub fn forced_pass(board: BoardId) -> Self {
        let null = Square::from_parts(Vec2::ZERO, board);
        Self::with_kind(null, null, MoveKind::ForcedPass)
    }

    pub fn colour(self) -> Colour {
        self.origin.colour
    }

    pub fn is_travel(self) -> bool {
        self.origin.board() != self.target.board()
    }

    /// Validation matches a caller's move against the generated list by
    /// endpoints (which include the colour), deliberately ignoring the kind
    /// tag: the caller picks the promotion target, the generator the rest.
    pub fn same_endpoints(self, other: Self) -> bool {
        self.origin == other.origin && self.target == other.target
    }
}

/// A history entry: the move plus everything needed to undo it and to
/// serialize it without replaying.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct AppliedMove {
    pub mv: Move,
    /// The board created on the origin timeline.
    pub origin_child: BoardId,
    /// The board created on the target side; equal to `origin_child` for
    /// same-board moves, on a fresh timeline for branching travel.
    pub target_child: BoardId,
    pub captured: Option<Piece>,
    /// Where the captured piece actually stood; differs from the move target
    /// for en passant.
    pub capture_square: Option<Vec2>,
}

impl AppliedMove {
    pub fn colour(self) -> Colour {
        self.mv.colour()
    }

    pub fn is_travel(self) -> bool {
        self.mv.is_travel()
    }

    /// Whether applying this move allocated a new timeline.
    pub fn branched(self) -> bool {
        self.target_child.l != self.mv.target.l
    }
}

/// What an external mover (a bot, a UI) wants to do next. Replaces in-band
/// signalling: "submit now" is a value, not a control-flow trick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum Decision {
    Play(Move),
    Submit,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn promotion_targets_are_the_seven_non_royals() {
        assert_eq!(Promotion::iter().count(), 7);
        for p in Promotion::iter() {
            assert!(!p.kind().is_royal());
            assert!(!p.kind().is_pawnlike());
            assert_eq!(Promotion::from_ascii_char(p.letter()), Some(p));
        }
        assert_eq!(Promotion::from_ascii_char('K'), None);
        assert_eq!(Promotion::from_ascii_char('P'), None);
    }

    #[test]
    fn endpoint_matching_ignores_the_kind() {
        let origin = Square::new(5, 7, 1, 0, Colour::White);
        let target = Square::new(5, 5, 1, 0, Colour::White);
        let plain = Move::new(origin, target);
        let tagged = Move::with_kind(origin, target, MoveKind::DoublePush);
        assert!(plain.same_endpoints(tagged));
        assert_ne!(plain, tagged);
        let other_colour = Move::new(
            Square::new(5, 7, 1, 0, Colour::Black),
            Square::new(5, 5, 1, 0, Colour::Black),
        );
        assert!(!plain.same_endpoints(other_colour));
    }

    #[test]
    fn forced_pass_is_a_same_board_move() {
        let pass = Move::forced_pass(BoardId::new(3, -1, Colour::Black));
        assert!(!pass.is_travel());
        assert_eq!(pass.colour(), Colour::Black);
        assert_eq!(pass.kind, MoveKind::ForcedPass);
    }
}
