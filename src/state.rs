use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::board::{Board, GameSettings};
use crate::castling::CastleZone;
use crate::clock::Clock;
use crate::coords::{BoardId, Vec2};
use crate::moves::{AppliedMove, Move, MoveKind};
use crate::pieces::{Colour, ColourSet, Piece, PieceKind};
use crate::{pgn, EngineError, Res};

/// The aggregate root: owns the entire multiverse and everything needed to
/// advance it. Exactly one logical owner mutates a value at a time; hand a
/// [`Clone`] to anything that wants to think about the position on the side.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameState {
    pub(crate) settings: GameSettings,
    /// The metadata block of the source document, reproduced on export.
    pub(crate) metadata: String,
    pub(crate) boards: HashMap<BoardId, Board>,
    pub(crate) history: Vec<AppliedMove>,
    pub(crate) active: Colour,
    pub(crate) min_tl: i32,
    pub(crate) max_tl: i32,
    pub(crate) min_t: i32,
    pub(crate) max_t: i32,
    pub(crate) clock: Option<Clock>,
    /// Committed at submission time.
    pub(crate) has_lost: ColourSet,
    /// Recomputed after every apply/undo; becomes `has_lost` on submit.
    pub(crate) loss_buf: ColourSet,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The standard variant's starting position.
    pub fn new() -> Self {
        pgn::parse(pgn::STANDARD).expect("the built-in standard variant parses")
    }

    /// Loads a named variant from the built-in registry.
    pub fn from_variant(id: &str) -> Res<Self> {
        let registry = pgn::VariantRegistry::builtin();
        Ok(pgn::parse(registry.get(id)?)?)
    }

    /// Parses a 5D-PGN document; see the grammar in [`crate::pgn`].
    pub fn from_notation(doc: &str) -> Result<Self, EngineError> {
        pgn::parse(doc)
    }

    /// Serializes the game back to 5D-PGN.
    pub fn to_notation(&self) -> String {
        pgn::write(self)
    }

    pub(crate) fn empty(settings: GameSettings) -> Self {
        Self {
            settings,
            metadata: String::new(),
            boards: HashMap::new(),
            history: Vec::new(),
            active: Colour::None,
            min_tl: 0,
            max_tl: 0,
            min_t: 0,
            max_t: 0,
            clock: None,
            has_lost: ColourSet::NONE,
            loss_buf: ColourSet::NONE,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn active_colour(&self) -> Colour {
        self.active
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.get(&id)
    }

    pub fn board_exists(&self, id: BoardId) -> bool {
        self.boards.contains_key(&id)
    }

    /// A board can still move iff nothing occupies its successor identity.
    pub fn board_playable(&self, id: BoardId) -> bool {
        !self.boards.contains_key(&id.next_turn())
    }

    fn require_board(&self, id: BoardId) -> Result<&Board, EngineError> {
        self.boards.get(&id).ok_or(EngineError::ReferencedBoardMissing(id))
    }

    pub fn history(&self) -> &[AppliedMove] {
        &self.history
    }

    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    pub fn start_with_clock(&mut self, clock: Clock) {
        self.clock = Some(clock);
    }

    /// The losses committed by the last submission.
    pub fn has_lost(&self) -> ColourSet {
        self.has_lost
    }

    /// Whether a royal piece has been captured since the last submission.
    pub fn royal_captured(&self) -> bool {
        !self.loss_buf.is_empty()
    }

    // *** Timeline and turn bounds ***

    pub fn min_timeline(&self) -> i32 {
        self.min_tl
    }

    pub fn max_timeline(&self) -> i32 {
        self.max_tl
    }

    pub fn min_turn(&self) -> i32 {
        self.min_t
    }

    pub fn max_turn(&self) -> i32 {
        self.max_t
    }

    fn min_active_tl(&self) -> i32 {
        -self.max_tl - 1
    }

    fn max_active_tl(&self) -> i32 {
        -self.min_tl + 1
    }

    /// A timeline is active while it is within one step of the bounds in the
    /// direction away from where it was created; only active timelines count
    /// towards the Present.
    pub fn timeline_active(&self, l: i32) -> bool {
        (self.min_active_tl()..=self.max_active_tl()).contains(&l)
    }

    /// Whether creating one more timeline would still leave it active.
    pub fn can_active_travel(&self, colour: Colour) -> bool {
        match colour {
            Colour::White => self.max_active_tl() > self.max_tl,
            Colour::Black => self.min_active_tl() < self.min_tl,
            Colour::None => self.min_active_tl() < self.min_tl && self.max_active_tl() > self.max_tl,
        }
    }

    pub(crate) fn recalc_bounds(&mut self) {
        self.min_tl = i32::MAX;
        self.max_tl = i32::MIN;
        self.min_t = i32::MAX;
        self.max_t = i32::MIN;
        for id in self.boards.keys() {
            self.min_tl = self.min_tl.min(id.l);
            self.max_tl = self.max_tl.max(id.l);
            self.min_t = self.min_t.min(id.t);
            self.max_t = self.max_t.max(id.t);
        }
    }

    // *** The Present ***

    /// All boards `colour` may still move on. `Colour::None` selects every
    /// playable board. Sorted by identity so callers see a stable order.
    pub fn moveable_boards(&self, colour: Colour) -> Vec<&Board> {
        let mut boards: Vec<&Board> = self
            .boards
            .values()
            .filter(|b| self.board_playable(b.id()) && b.id().colour != colour.other())
            .collect();
        boards.sort_unstable_by_key(|b| (b.id().l, b.id().t, b.id().colour.is_black()));
        boards
    }

    /// The minimum visual ply among playable boards in active timelines.
    pub fn present_ply(&self) -> i32 {
        self.moveable_boards(Colour::None)
            .iter()
            .filter(|b| self.timeline_active(b.id().l))
            .map(|b| b.id().vis_ply())
            .min()
            .unwrap_or(i32::MAX)
    }

    pub fn present_colour(&self) -> Colour {
        if self.present_ply() % 2 == 0 {
            Colour::White
        } else {
            Colour::Black
        }
    }

    pub fn present_turn(&self) -> i32 {
        self.present_ply() / 2
    }

    // *** Move application ***

    /// Validates and applies a caller-supplied move: the caller must hold
    /// rights for the moving colour, the colour must be active, and the move
    /// must match a generated pseudo-legal move by endpoints. Returns whether
    /// it took effect; rejected input is a silent no-op.
    pub fn apply_move(&mut self, mv: Move, rights: ColourSet) -> bool {
        if !rights.contains(mv.colour()) || mv.colour() != self.active {
            return false;
        }
        if !self.legal_moves(Some(mv.colour())).iter().any(|m| m.same_endpoints(mv)) {
            return false;
        }
        self.apply(mv).is_ok()
    }

    /// Advances one playable board a half-turn without moving a piece.
    pub fn force_skip(&mut self, board: BoardId, rights: ColourSet) -> bool {
        if !rights.contains(self.active) || board.colour != self.active {
            return false;
        }
        if !self.board_exists(board) || !self.board_playable(board) {
            return false;
        }
        self.apply(Move::forced_pass(board)).is_ok()
    }

    /// Applies a pseudo-legal move without rights checks. Validation happens
    /// before any board is constructed, so a rejected move mutates nothing.
    pub fn apply(&mut self, mv: Move) -> Result<(), EngineError> {
        let origin_id = mv.origin.board();
        let target_id = mv.target.board();
        self.require_board(origin_id)?;
        self.require_board(target_id)?;
        if !self.board_playable(origin_id) {
            return Err(EngineError::FrozenBoardMove(origin_id));
        }

        let same_board = origin_id == target_id;
        // the only mutation of the timeline bounds in the whole engine
        let new_l = if !same_board && !self.board_playable(target_id) {
            Some(if mv.colour().is_white() {
                self.max_tl += 1;
                self.max_tl
            } else {
                self.min_tl -= 1;
                self.min_tl
            })
        } else {
            None
        };

        let origin_piece = self.boards[&origin_id].piece(mv.origin.xy());
        let target_occupant = self.boards[&target_id].piece(mv.target.xy());
        let move_piece = match (origin_piece, mv.kind.promotion()) {
            (Some(p), Some(promo)) => Some(Piece::new(p.colour, promo.kind())),
            (p, _) => p,
        };

        let mut captured = None;
        let mut capture_square = None;
        // where the capture actually lands: one square behind the target when
        // a pawn takes the en-passant square
        let mut record_capture = |target_board: &Board| {
            let mut at = mv.target.xy();
            if let Some(p) = move_piece {
                if target_board.ep_target() == Some(at) && p.kind.is_pawnlike() {
                    at += Vec2::new(0, p.colour.sign());
                }
            }
            capture_square = Some(at);
            captured = target_board.piece(at);
        };

        let (mut from_child, mut to_child) = if same_board {
            let board = &self.boards[&origin_id];
            let (from, to) = if mv.kind == MoveKind::ForcedPass {
                (None, None)
            } else {
                (Some(mv.origin.xy()), Some(mv.target.xy()))
            };
            let mut child = board.child(None, move_piece, from, to);
            if mv.kind != MoveKind::ForcedPass {
                record_capture(board);
            }
            // don't highlight anything for a forced pass
            if mv.origin.xy() != mv.target.xy() {
                child.set_move_highlight(mv.origin.xy(), mv.target.xy());
            }
            if let Some(zone) = mv.kind.castle_zone() {
                let rook_from = zone.rook_origin(&self.settings);
                let rook_to = zone.rook_target(&self.settings);
                if let Some(rook) = child.piece(rook_from) {
                    child.remove_piece(rook_from);
                    child.place_piece(rook, rook_to);
                }
            } else if mv.kind == MoveKind::DoublePush {
                let midpoint = mv.origin.xy() + mv.target.xy();
                child.set_ep_target(Vec2::new(midpoint.x / 2, midpoint.y / 2));
            } else if mv.kind == MoveKind::EnPassant {
                if let Some(p) = move_piece {
                    child.remove_piece(mv.target.xy() + Vec2::new(0, p.colour.sign()));
                }
            }
            (child, None)
        } else {
            let from_board = &self.boards[&origin_id];
            let to_board = &self.boards[&target_id];
            let mut vacated = from_board.child(None, None, Some(mv.origin.xy()), None);
            let mut arrived = to_board.child(new_l, move_piece, None, Some(mv.target.xy()));
            record_capture(to_board);
            vacated.set_travel_mark(mv.origin.xy());
            arrived.set_travel_mark(mv.target.xy());
            if mv.kind == MoveKind::EnPassant {
                if let Some(p) = move_piece {
                    arrived.remove_piece(mv.target.xy() + Vec2::new(0, p.colour.sign()));
                }
            }
            (vacated, Some(arrived))
        };

        // a king or rook leaving home costs the origin side its rights
        if let Some(p) = origin_piece {
            if p.kind.is_kingly() && mv.origin.xy() == self.settings.king_home(p.colour) {
                from_child.clear_castle_colour(p.colour);
            }
            if p.kind == PieceKind::Rook {
                for zone in CastleZone::iter() {
                    if mv.origin.xy() == zone.rook_origin(&self.settings) {
                        from_child.clear_castle_zone(zone);
                    }
                }
            }
        }
        // a king or rook captured at home costs the target side its rights,
        // and a captured royal records the loss on the board holding it
        {
            let target_side: &mut Board = match to_child.as_mut() {
                Some(b) => b,
                None => &mut from_child,
            };
            if let Some(occ) = target_occupant {
                if occ.kind.is_kingly() && mv.target.xy() == self.settings.king_home(occ.colour) {
                    target_side.clear_castle_colour(occ.colour);
                }
                if occ.kind == PieceKind::Rook {
                    for zone in CastleZone::iter() {
                        if mv.target.xy() == zone.rook_origin(&self.settings) {
                            target_side.clear_castle_zone(zone);
                        }
                    }
                }
                if occ.is_royal() {
                    target_side.mark_loss(occ.colour);
                }
            }
        }

        let origin_child = from_child.id();
        let target_child = to_child.as_ref().map_or(origin_child, |b| b.id());
        self.max_t = self.max_t.max(origin_child.t).max(target_child.t);

        self.boards.insert(from_child.id(), from_child);
        if let Some(arrived) = to_child {
            self.boards.insert(arrived.id(), arrived);
        }
        self.history.push(AppliedMove { mv, origin_child, target_child, captured, capture_square });
        self.loss_buf = self.compute_losses();
        Ok(())
    }

    fn compute_losses(&self) -> ColourSet {
        self.moveable_boards(Colour::None)
            .iter()
            .fold(ColourSet::NONE, |acc, b| acc | b.has_lost())
    }

    // *** The turn protocol ***

    /// Submission is possible once the Present belongs to the other colour.
    pub fn can_submit(&self, rights: ColourSet) -> bool {
        self.present_colour() != self.active && rights.contains(self.active)
    }

    /// Commits every move made since the last submission and hands the turn
    /// to the colour now at the Present. No-op when the Present hasn't
    /// flipped yet or the caller lacks rights.
    pub fn submit(&mut self, rights: ColourSet) -> bool {
        if !self.can_submit(rights) {
            return false;
        }
        self.active = self.present_colour();
        self.has_lost = self.loss_buf;
        if let Some(clock) = &mut self.clock {
            if self.has_lost.is_empty() {
                clock.set_turn(self.active);
            } else {
                clock.stop();
            }
        }
        true
    }

    /// The newest applied moves that belong to the active colour, newest
    /// first; these are the ones submission would commit.
    pub fn unsubmitted_moves(&self) -> Vec<AppliedMove> {
        self.history.iter().rev().take_while(|m| m.colour() == self.active).copied().collect()
    }

    /// Undo is only allowed while the newest move is the acting colour's own
    /// unsubmitted move.
    pub fn can_undo(&self, rights: ColourSet) -> bool {
        self.history.last().is_some_and(|m| m.colour() == self.active) && rights.contains(self.active)
    }

    pub fn undo(&mut self, rights: ColourSet) -> bool {
        if !self.can_undo(rights) {
            return false;
        }
        self.unmake();
        true
    }

    /// UI convenience: when the current colour has nothing left to take back,
    /// flips the active colour back first and then undoes.
    pub fn gui_undo(&mut self) -> bool {
        if self.can_undo(ColourSet::BOTH) {
            self.unmake();
            true
        } else if !self.history.is_empty() {
            self.active = self.active.other();
            self.unmake();
            true
        } else {
            false
        }
    }

    fn unmake(&mut self) {
        let Some(applied) = self.history.pop() else {
            return;
        };
        if applied.branched() {
            if applied.colour().is_white() {
                self.max_tl -= 1;
            } else {
                self.min_tl += 1;
            }
        }
        self.boards.remove(&applied.origin_child);
        self.boards.remove(&applied.target_child);
        self.loss_buf = self.compute_losses();
    }

    // *** Clock integration ***

    /// Advances the running clock; flag fall counts as a loss for the
    /// timed-out colour, exactly like a captured royal.
    pub fn tick_clock(&mut self, elapsed_us: i64) {
        let Some(clock) = &mut self.clock else {
            return;
        };
        if let Some(flagged) = clock.tick(elapsed_us) {
            clock.stop();
            self.loss_buf |= ColourSet::single(flagged);
            self.has_lost |= ColourSet::single(flagged);
        }
    }
}
