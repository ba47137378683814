use std::fmt;
use std::fmt::{Display, Formatter};

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::castling::{CastleRights, CastleZone};
use crate::coords::{BoardId, Vec2};
use crate::moves::Promotion;
use crate::pieces::{colour_of, Colour, ColourSet, Piece};
use crate::Res;

/// Game-wide configuration shared by every board: grid dimensions, the king
/// home squares castling is anchored to, and the promotion allow-lists.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameSettings {
    pub size: Vec2,
    king_home: [Vec2; 2],
    promotions: [Vec<Promotion>; 2],
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(8, 8),
            // y counts from the top, so White's home rank is y = 8
            king_home: [Vec2::new(5, 8), Vec2::new(5, 1)],
            promotions: [Promotion::iter().collect(), Promotion::iter().collect()],
        }
    }
}

impl GameSettings {
    pub fn king_home(&self, colour: Colour) -> Vec2 {
        self.king_home[colour.player_index()]
    }

    pub(crate) fn set_king_home(&mut self, white: Vec2, black: Vec2) {
        self.king_home = [white, black];
    }

    pub fn promotions(&self, colour: Colour) -> &[Promotion] {
        &self.promotions[colour.player_index()]
    }

    pub(crate) fn set_promotions(&mut self, colour: Colour, allowed: Vec<Promotion>) {
        self.promotions[colour.player_index()] = allowed;
    }

    pub fn in_bounds(&self, xy: Vec2) -> bool {
        1 <= xy.x && xy.x <= self.size.x && 1 <= xy.y && xy.y <= self.size.y
    }

    /// Parses algebraic coordinates ("e2"). Only the trailing file/rank pair
    /// is read, so an optional piece-letter prefix is tolerated. The rank is
    /// counted from the bottom of the board, the grid's y from the top.
    pub fn square_from_alg(&self, s: &str) -> Res<Vec2> {
        let mut chars = s.chars().rev();
        let (Some(rank), Some(file)) = (chars.next(), chars.next()) else {
            bail!("square '{s}' is too short");
        };
        if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
            bail!("'{s}' is not a square (expected a file letter and a rank digit)");
        }
        let xy = Vec2::new(
            file as i32 - 'a' as i32 + 1,
            (self.size.y + 1) - (rank as i32 - '0' as i32),
        );
        if !self.in_bounds(xy) {
            bail!("square '{s}' is outside the {}x{} board", self.size.x, self.size.y);
        }
        Ok(xy)
    }

    pub fn square_to_alg(&self, xy: Vec2) -> String {
        let file = char::from_u32(('a' as u32 - 1) + xy.x as u32).unwrap_or('?');
        let rank = char::from_u32('1' as u32 + (self.size.y - xy.y) as u32).unwrap_or('?');
        format!("{file}{rank}")
    }
}

/// One immutable snapshot of one timeline at one half-turn. Boards are only
/// ever created by parsing a position record or by deriving from exactly one
/// parent via a single piece relocation; they are never mutated afterwards.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Board {
    id: BoardId,
    parent: Option<BoardId>,
    size: Vec2,
    grid: Vec<Option<Piece>>,
    castle_rights: CastleRights,
    ep_target: Option<Vec2>,
    // last-move highlights, carried for renderers, never read by the rules
    moved_from: Option<Vec2>,
    moved_to: Option<Vec2>,
    travel_mark: Option<Vec2>,
    has_lost: ColourSet,
}

impl Board {
    /// A root board without a parent, from a FEN-style record.
    pub fn from_fen(settings: &GameSettings, id: BoardId, fen: &str) -> Res<Self> {
        let mut board = Self::empty(settings.size, id, None);
        board.load_fen(fen)?;
        Ok(board)
    }

    /// A setup board that continues an explicitly listed predecessor, e.g.
    /// the second board of a turn-zero variant.
    pub fn from_fen_with_parent(parent: &Board, fen: &str) -> Res<Self> {
        let mut board = Self::empty(parent.size, parent.id.next_turn(), Some(parent.id));
        board.load_fen(fen)?;
        Ok(board)
    }

    fn empty(size: Vec2, id: BoardId, parent: Option<BoardId>) -> Self {
        Self {
            id,
            parent,
            size,
            grid: vec![None; (size.x * size.y) as usize],
            castle_rights: CastleRights::NONE,
            ep_target: None,
            moved_from: None,
            moved_to: None,
            travel_mark: None,
            has_lost: ColourSet::NONE,
        }
    }

    /// Derives the successor board created by relocating (at most) one piece.
    /// `new_timeline` is only set by branching time travel; the derived board
    /// advances from this board's identity either way. Castle rights and loss
    /// flags carry over, the en-passant target does not.
    pub(crate) fn child(
        &self,
        new_timeline: Option<i32>,
        placed: Option<Piece>,
        from: Option<Vec2>,
        to: Option<Vec2>,
    ) -> Self {
        let id = BoardId::new(self.id.t, new_timeline.unwrap_or(self.id.l), self.id.colour).next_turn();
        let mut board = Self {
            id,
            parent: Some(self.id),
            size: self.size,
            grid: self.grid.clone(),
            castle_rights: self.castle_rights,
            ep_target: None,
            moved_from: None,
            moved_to: None,
            travel_mark: None,
            has_lost: self.has_lost,
        };
        if let Some(from) = from {
            board.remove_piece(from);
        }
        if let (Some(piece), Some(to)) = (placed, to) {
            board.place_piece(piece, to);
        }
        board
    }

    fn load_fen(&mut self, fen: &str) -> Res<()> {
        let mut fields = fen.split_ascii_whitespace();
        let Some(placement) = fields.next() else {
            bail!("empty position record");
        };
        let (mut x, mut y) = (0, 0);
        for c in placement.chars() {
            match c {
                '/' => {
                    x = 0;
                    y += 1;
                }
                '1'..='9' => x += c as i32 - '0' as i32,
                _ => {
                    let Some(piece) = Piece::from_ascii_char(c) else {
                        bail!("'{c}' is not a piece letter");
                    };
                    if x >= self.size.x || y >= self.size.y {
                        bail!("position row {} overflows the {}x{} board", y + 1, self.size.x, self.size.y);
                    }
                    self.grid[(y * self.size.x + x) as usize] = Some(piece);
                    x += 1;
                }
            }
        }

        let _side_to_move = fields.next(); // already part of the board identity
        let Some(castling) = fields.next() else {
            bail!("position record is missing the castling field");
        };
        self.castle_rights = CastleRights::parse(castling);

        let Some(ep) = fields.next() else {
            bail!("position record is missing the en-passant field");
        };
        self.ep_target = if ep == "-" {
            None
        } else {
            let mut chars = ep.chars();
            let (Some(file), Some(rank)) = (chars.next(), chars.next()) else {
                bail!("'{ep}' is not an en-passant square");
            };
            // the raw digit, not flipped like algebraic input
            Some(Vec2::new(file as i32 - 'a' as i32 + 1, rank as i32 - '0' as i32))
        };
        // move clocks don't matter here
        Ok(())
    }

    fn index(&self, at: Vec2) -> usize {
        debug_assert!(1 <= at.x && at.x <= self.size.x && 1 <= at.y && at.y <= self.size.y);
        ((at.y - 1) * self.size.x + (at.x - 1)) as usize
    }

    /// `None` for empty cells and for positions outside the grid.
    pub fn piece(&self, at: Vec2) -> Option<Piece> {
        if at.x < 1 || at.x > self.size.x || at.y < 1 || at.y > self.size.y {
            return None;
        }
        self.grid[self.index(at)]
    }

    pub fn colour_on(&self, at: Vec2) -> Colour {
        colour_of(self.piece(at))
    }

    pub(crate) fn remove_piece(&mut self, from: Vec2) {
        if from == Vec2::ZERO {
            return;
        }
        let idx = self.index(from);
        self.grid[idx] = None;
    }

    /// Placing a pawn or brawn onto this board's en-passant target also
    /// removes the pawn one square behind it.
    pub(crate) fn place_piece(&mut self, piece: Piece, to: Vec2) {
        if to == Vec2::ZERO {
            return;
        }
        let idx = self.index(to);
        self.grid[idx] = Some(piece);
        if self.ep_target == Some(to) && piece.kind.is_pawnlike() {
            let behind = to + Vec2::new(0, piece.colour.sign());
            let idx = self.index(behind);
            self.grid[idx] = None;
        }
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn parent(&self) -> Option<BoardId> {
        self.parent
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    pub fn ep_target(&self) -> Option<Vec2> {
        self.ep_target
    }

    pub fn has_lost(&self) -> ColourSet {
        self.has_lost
    }

    pub fn moved_from(&self) -> Option<Vec2> {
        self.moved_from
    }

    pub fn moved_to(&self) -> Option<Vec2> {
        self.moved_to
    }

    pub fn travel_mark(&self) -> Option<Vec2> {
        self.travel_mark
    }

    pub(crate) fn set_ep_target(&mut self, target: Vec2) {
        self.ep_target = Some(target);
    }

    pub(crate) fn clear_castle_zone(&mut self, zone: CastleZone) {
        self.castle_rights.remove(zone);
    }

    pub(crate) fn clear_castle_colour(&mut self, colour: Colour) {
        self.castle_rights.clear_colour(colour);
    }

    pub(crate) fn mark_loss(&mut self, colour: Colour) {
        self.has_lost |= ColourSet::single(colour);
    }

    pub(crate) fn set_move_highlight(&mut self, from: Vec2, to: Vec2) {
        self.moved_from = Some(from);
        self.moved_to = Some(to);
    }

    pub(crate) fn set_travel_mark(&mut self, at: Vec2) {
        self.travel_mark = Some(at);
    }
}

/// A plain character diagram, top row first. Diagnostic output for logs and
/// test failures, not a serialization format.
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for y in 1..=self.size.y {
            for x in 1..=self.size.x {
                let c = self.piece(Vec2::new(x, y)).map_or('.', Piece::to_ascii_char);
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
