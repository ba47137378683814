use strum_macros::EnumIter;

use crate::board::GameSettings;
use crate::coords::Vec2;
use crate::pieces::Colour;

/// One of the four castling moves. The colour is part of the zone because
/// rights are tracked per board, not per player turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter)]
#[must_use]
pub enum CastleZone {
    WhiteKingside,
    WhiteQueenside,
    BlackKingside,
    BlackQueenside,
}

impl CastleZone {
    pub fn new(colour: Colour, kingside: bool) -> Self {
        debug_assert!(!colour.is_none());
        match (colour, kingside) {
            (Colour::Black, true) => CastleZone::BlackKingside,
            (Colour::Black, false) => CastleZone::BlackQueenside,
            (_, true) => CastleZone::WhiteKingside,
            (_, false) => CastleZone::WhiteQueenside,
        }
    }

    pub fn colour(self) -> Colour {
        match self {
            CastleZone::WhiteKingside | CastleZone::WhiteQueenside => Colour::White,
            CastleZone::BlackKingside | CastleZone::BlackQueenside => Colour::Black,
        }
    }

    pub fn is_kingside(self) -> bool {
        matches!(self, CastleZone::WhiteKingside | CastleZone::BlackKingside)
    }

    /// +1 towards the rook for kingside, -1 for queenside.
    fn direction(self) -> i32 {
        if self.is_kingside() {
            1
        } else {
            -1
        }
    }

    pub fn king_origin(self, settings: &GameSettings) -> Vec2 {
        settings.king_home(self.colour())
    }

    /// The king always lands two files towards the rook.
    pub fn king_target(self, settings: &GameSettings) -> Vec2 {
        self.king_origin(settings) + Vec2::AXIS_X * (2 * self.direction())
    }

    /// The rook is expected on the outermost file of the king's rank.
    pub fn rook_origin(self, settings: &GameSettings) -> Vec2 {
        let x = if self.is_kingside() { settings.size.x } else { 1 };
        Vec2::new(x, self.king_origin(settings).y)
    }

    pub fn rook_target(self, settings: &GameSettings) -> Vec2 {
        self.king_origin(settings) + Vec2::AXIS_X * self.direction()
    }

    const fn bit(self) -> u8 {
        match self {
            CastleZone::WhiteKingside => 0b0001,
            CastleZone::WhiteQueenside => 0b0010,
            CastleZone::BlackKingside => 0b0100,
            CastleZone::BlackQueenside => 0b1000,
        }
    }
}

/// Which castling moves are still available on a given board. Rights are
/// lost when the king or the respective rook moves, or is captured at home.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    /// Parses the castling field of a FEN-style record ("KQkq", "-", ...).
    pub fn parse(field: &str) -> Self {
        let mut rights = Self::NONE;
        if field.contains('K') {
            rights.insert(CastleZone::WhiteKingside);
        }
        if field.contains('Q') {
            rights.insert(CastleZone::WhiteQueenside);
        }
        if field.contains('k') {
            rights.insert(CastleZone::BlackKingside);
        }
        if field.contains('q') {
            rights.insert(CastleZone::BlackQueenside);
        }
        rights
    }

    pub fn contains(self, zone: CastleZone) -> bool {
        self.0 & zone.bit() != 0
    }

    pub fn insert(&mut self, zone: CastleZone) {
        self.0 |= zone.bit();
    }

    pub fn remove(&mut self, zone: CastleZone) {
        self.0 &= !zone.bit();
    }

    /// Both of a player's rights at once, for a moved or captured king.
    pub fn clear_colour(&mut self, colour: Colour) {
        match colour {
            Colour::White => self.0 &= !0b0011,
            Colour::Black => self.0 &= !0b1100,
            Colour::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn standard_castle_geometry() {
        let s = GameSettings::default();
        // white king on e1 = (5, 8) in grid coordinates (y counts from the top)
        assert_eq!(CastleZone::WhiteKingside.king_origin(&s), Vec2::new(5, 8));
        assert_eq!(CastleZone::WhiteKingside.king_target(&s), Vec2::new(7, 8));
        assert_eq!(CastleZone::WhiteKingside.rook_origin(&s), Vec2::new(8, 8));
        assert_eq!(CastleZone::WhiteKingside.rook_target(&s), Vec2::new(6, 8));
        assert_eq!(CastleZone::BlackQueenside.king_target(&s), Vec2::new(3, 1));
        assert_eq!(CastleZone::BlackQueenside.rook_origin(&s), Vec2::new(1, 1));
        assert_eq!(CastleZone::BlackQueenside.rook_target(&s), Vec2::new(4, 1));
    }

    #[test]
    fn rights_parse_and_clear() {
        let mut rights = CastleRights::parse("KQkq");
        assert_eq!(rights, CastleRights::ALL);
        rights.remove(CastleZone::WhiteKingside);
        assert!(!rights.contains(CastleZone::WhiteKingside));
        assert!(rights.contains(CastleZone::WhiteQueenside));
        rights.clear_colour(Colour::Black);
        for zone in CastleZone::iter() {
            assert_eq!(rights.contains(zone), zone == CastleZone::WhiteQueenside);
        }
        assert_eq!(CastleRights::parse("-"), CastleRights::NONE);
        assert_eq!(CastleRights::parse("Kq"), {
            let mut r = CastleRights::NONE;
            r.insert(CastleZone::WhiteKingside);
            r.insert(CastleZone::BlackQueenside);
            r
        });
    }
}
