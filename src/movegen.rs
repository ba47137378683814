use strum::IntoEnumIterator;

use crate::castling::CastleZone;
use crate::coords::{BoardId, Square, Vec2, Vec4};
use crate::moves::{Move, MoveKind};
use crate::pieces::{colour_of, Colour, Piece, PieceKind, SliderAxis};
use crate::state::GameState;
use crate::steps::StepTables;

impl GameState {
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board(sq.board())?.piece(sq.xy())
    }

    pub fn colour_on(&self, sq: Square) -> Colour {
        colour_of(self.piece_on(sq))
    }

    /// Within the grid *and* on a board that exists. A step that leaves the
    /// multiverse is simply not a move.
    pub fn is_on_board(&self, sq: Square) -> bool {
        self.settings().in_bounds(sq.xy()) && self.board_exists(sq.board())
    }

    /// All pseudo-legal moves of the piece at `pos`; empty for empty squares.
    /// No check detection anywhere: losing happens by actual royal capture.
    pub fn piece_moves(&self, pos: Square) -> Vec<Move> {
        let Some(piece) = self.piece_on(pos) else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        match piece.kind {
            k if k.is_pawnlike() => self.pawn_moves(pos, piece, &mut moves),
            PieceKind::Knight => self.knight_moves(pos, piece, &mut moves),
            PieceKind::King | PieceKind::CommonKing => self.king_moves(pos, piece, &mut moves),
            _ => self.sliding_moves(pos, piece, &mut moves),
        }
        moves
    }

    /// Walks every step direction the piece's capability set allows, stopping
    /// at board edges, missing boards, own pieces, and after the first
    /// capture. Sliders never jump.
    fn sliding_moves(&self, pos: Square, piece: Piece, moves: &mut Vec<Move>) {
        let tables = StepTables::get();
        let axes = piece.kind.slider_axes();
        for axis in SliderAxis::iter() {
            if !axes.contains(axis) {
                continue;
            }
            for &step in tables.slider(axis) {
                for i in 1.. {
                    let sq = pos + step * i;
                    if !self.is_on_board(sq) || self.colour_on(sq) == piece.colour {
                        break;
                    }
                    moves.push(Move::new(pos, sq));
                    if !self.colour_on(sq).is_none() {
                        break;
                    }
                }
            }
        }
    }

    fn king_moves(&self, pos: Square, piece: Piece, moves: &mut Vec<Move>) {
        for x in -1..=1 {
            for y in -1..=1 {
                for t in -1..=1 {
                    for l in -1..=1 {
                        let step = Vec4::new(x, y, t, l);
                        if step == Vec4::ZERO {
                            continue;
                        }
                        let sq = pos + step;
                        if self.is_on_board(sq) && self.colour_on(sq) != piece.colour {
                            moves.push(Move::new(pos, sq));
                        }
                    }
                }
            }
        }

        // castling never crosses timelines; every check is against this board
        let Some(board) = self.board(pos.board()) else {
            return;
        };
        for zone in CastleZone::iter() {
            if !board.castle_rights().contains(zone) || zone.colour() != piece.colour {
                continue;
            }
            let target = Square::from_parts(zone.king_target(self.settings()), pos.board());
            // the intervening squares sit at fixed offsets around the target,
            // which is itself two files from the configured king home
            const KINGSIDE_BETWEEN: [Vec4; 2] = [Vec4::new(-1, 0, 0, 0), Vec4::ZERO];
            const QUEENSIDE_BETWEEN: [Vec4; 3] = [Vec4::new(1, 0, 0, 0), Vec4::ZERO, Vec4::new(-1, 0, 0, 0)];
            let (between, rook_at): (&[Vec4], Vec4) = if zone.is_kingside() {
                (&KINGSIDE_BETWEEN, Vec4::new(1, 0, 0, 0))
            } else {
                (&QUEENSIDE_BETWEEN, Vec4::new(-2, 0, 0, 0))
            };
            if between.iter().any(|&off| self.piece_on(target + off).is_some()) {
                continue;
            }
            let rook_there = self
                .piece_on(target + rook_at)
                .is_some_and(|p| p.kind == PieceKind::Rook && p.colour == piece.colour);
            if rook_there {
                moves.push(Move::with_kind(pos, target, MoveKind::Castles(zone)));
            }
        }
    }

    fn pawn_moves(&self, pos: Square, piece: Piece, moves: &mut Vec<Move>) {
        let offset = -piece.colour.sign();
        let height = self.settings().size.y;
        // on its own second rank; the colour sign picks which end of the board
        let first_step = pos.y == height + offset || pos.y == 1 + offset;
        let mut list = Vec::new();

        // non-capturing pushes: forward along Y, and sideways along the
        // timeline axis into the pawn's own past-adjacent timeline
        for off in [Vec4::new(0, offset, 0, 0), Vec4::new(0, 0, 0, offset)] {
            let tgt = pos + off;
            if self.is_on_board(tgt) && self.colour_on(tgt).is_none() {
                list.push(Move::new(pos, tgt));
                if first_step {
                    let tgt = tgt + off;
                    if self.is_on_board(tgt) && self.colour_on(tgt).is_none() {
                        list.push(Move::with_kind(pos, tgt, MoveKind::DoublePush));
                    }
                }
            }
        }

        // two-axis diagonal captures, each recognizing either an opponent
        // piece or the target board's en-passant square
        let mut capture_steps = vec![
            Vec4::new(1, offset, 0, 0),
            Vec4::new(-1, offset, 0, 0),
            Vec4::new(0, 0, 1, offset),
            Vec4::new(0, 0, -1, offset),
        ];
        if piece.kind == PieceKind::Brawn {
            capture_steps.extend([
                Vec4::new(1, 0, 0, offset),
                Vec4::new(-1, 0, 0, offset),
                Vec4::new(0, offset, 1, 0),
                Vec4::new(0, offset, -1, 0),
            ]);
        }
        for off in capture_steps {
            let tgt = pos + off;
            if !self.is_on_board(tgt) {
                continue;
            }
            let ep = self.board(tgt.board()).and_then(|b| b.ep_target()) == Some(tgt.xy());
            if self.colour_on(tgt) == piece.colour.other() || ep {
                let kind = if ep { MoveKind::EnPassant } else { MoveKind::Normal };
                list.push(Move::with_kind(pos, tgt, kind));
            }
        }

        // about to reach the back rank: every candidate becomes one move per
        // allowed promotion target instead
        if pos.y + offset == 1 || pos.y + offset == height {
            let allowed = self.settings().promotions(piece.colour);
            for mv in list {
                for &promo in allowed {
                    moves.push(Move::with_kind(mv.origin, mv.target, MoveKind::Promotion(promo)));
                }
            }
        } else {
            moves.extend(list);
        }
    }

    fn knight_moves(&self, pos: Square, piece: Piece, moves: &mut Vec<Move>) {
        for &step in &StepTables::get().knight {
            let sq = pos + step;
            if self.is_on_board(sq) && self.colour_on(sq) != piece.colour {
                moves.push(Move::new(pos, sq));
            }
        }
    }

    /// Every move of the pieces matching the board's colour to move.
    pub fn board_moves(&self, id: BoardId) -> Vec<Move> {
        let size = self.settings().size;
        let mut moves = Vec::new();
        for x in 1..=size.x {
            for y in 1..=size.y {
                let sq = Square::from_parts(Vec2::new(x, y), id);
                if self.colour_on(sq) == id.colour {
                    moves.extend(self.piece_moves(sq));
                }
            }
        }
        moves
    }

    /// The full pseudo-legal move list for a colour, across every board that
    /// colour may still move on. Defaults to the active colour.
    pub fn legal_moves(&self, colour: Option<Colour>) -> Vec<Move> {
        let colour = colour.unwrap_or_else(|| self.active_colour());
        let mut moves = Vec::new();
        for board in self.moveable_boards(colour) {
            moves.extend(self.board_moves(board.id()));
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, GameSettings, STARTPOS};
    use crate::moves::Promotion;
    use crate::pieces::ColourSet;
    use crate::state::GameState;

    use super::*;

    /// Builds a state directly from (id, fen) records, bypassing notation.
    fn state_from(records: &[(BoardId, &str)]) -> GameState {
        let settings = GameSettings::default();
        let mut state = GameState::empty(settings);
        for &(id, fen) in records {
            let board = Board::from_fen(state.settings(), id, fen).unwrap();
            state.boards.insert(id, board);
        }
        state.recalc_bounds();
        state.active = state.present_colour();
        state
    }

    fn white_start() -> BoardId {
        BoardId::new(1, 0, Colour::White)
    }

    #[test]
    fn twenty_opening_moves() {
        let state = state_from(&[(white_start(), STARTPOS)]);
        let moves = state.legal_moves(Some(Colour::White));
        // 16 pawn moves and 4 knight moves; every 4-D step leaves the
        // one-board multiverse and generates nothing
        assert_eq!(moves.len(), 20);
        assert!(state.legal_moves(Some(Colour::Black)).is_empty(), "black has no moveable board yet");
    }

    #[test]
    fn sliders_stop_at_the_first_capture() {
        // a lone white rook on a1 against a black pawn on a5
        let state = state_from(&[(white_start(), "8/8/8/p7/8/8/8/R7 w - - 0 1")]);
        let rook = Square::new(1, 8, 1, 0, Colour::White);
        let moves = state.piece_moves(rook);
        // up the file until the pawn (4 squares incl. capture) + 7 along the rank
        assert_eq!(moves.len(), 11);
        let captures: Vec<_> = moves.iter().filter(|m| state.piece_on(m.target).is_some()).collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].target.xy(), Vec2::new(1, 4));
        assert!(
            !moves.iter().any(|m| m.target.xy() == Vec2::new(1, 3)),
            "the square behind the pawn is unreachable"
        );
    }

    #[test]
    fn knight_uses_the_step_table() {
        let state = state_from(&[(white_start(), "8/8/8/8/3N4/8/8/8 w - - 0 1")]);
        let knight = Square::new(4, 5, 1, 0, Colour::White);
        let moves = state.piece_moves(knight);
        // all 8 in-board leaps; the 4-D leaps leave the multiverse
        assert_eq!(moves.len(), 8);
    }

    #[test]
    fn pawn_first_step_detection_respects_board_height() {
        let state = state_from(&[(white_start(), "8/8/8/8/8/8/P7/8 w - - 0 1")]);
        let pawn = Square::new(1, 7, 1, 0, Colour::White);
        let moves = state.piece_moves(pawn);
        assert_eq!(moves.len(), 2, "single and double push from the second rank");
        assert!(moves.iter().any(|m| m.kind == MoveKind::DoublePush));

        // one rank further up there is no double push
        let state = state_from(&[(white_start(), "8/8/8/8/8/P7/8/8 w - - 0 1")]);
        let pawn = Square::new(1, 6, 1, 0, Colour::White);
        let moves = state.piece_moves(pawn);
        assert_eq!(moves.len(), 1);
        assert!(moves.iter().all(|m| m.kind == MoveKind::Normal));

        // the white second rank moves with the board height
        let mut settings = GameSettings::default();
        settings.size = Vec2::new(8, 10);
        let mut state = GameState::empty(settings);
        let board =
            Board::from_fen(state.settings(), white_start(), "8/8/8/8/8/8/8/8/P7/8 w - - 0 1").unwrap();
        state.boards.insert(white_start(), board);
        state.recalc_bounds();
        state.active = Colour::White;
        let pawn = Square::new(1, 9, 1, 0, Colour::White);
        let moves = state.piece_moves(pawn);
        assert_eq!(moves.len(), 2, "a 10-rank board still allows the double push");
    }

    #[test]
    fn pawn_promotion_fans_out_per_allowed_target() {
        let state = state_from(&[(white_start(), "8/P7/8/8/8/8/8/8 w - - 0 1")]);
        let pawn = Square::new(1, 2, 1, 0, Colour::White);
        let moves = state.piece_moves(pawn);
        // one push, expanded over all seven default promotion targets
        assert_eq!(moves.len(), 7);
        for mv in &moves {
            assert!(matches!(mv.kind, MoveKind::Promotion(_)));
        }

        let mut state = state_from(&[(white_start(), "8/P7/8/8/8/8/8/8 w - - 0 1")]);
        state.settings.set_promotions(Colour::White, vec![Promotion::Queen, Promotion::Knight]);
        let moves = state.piece_moves(pawn);
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn castle_requires_rights_empty_path_and_own_rook() {
        let state = state_from(&[(white_start(), "8/8/8/8/8/8/8/R3K2R w KQ - 0 1")]);
        let king = Square::new(5, 8, 1, 0, Colour::White);
        let moves = state.piece_moves(king);
        let castles: Vec<_> = moves.iter().filter_map(|m| m.kind.castle_zone()).collect();
        assert!(castles.contains(&CastleZone::WhiteKingside));
        assert!(castles.contains(&CastleZone::WhiteQueenside));

        // no rights, no castle
        let state = state_from(&[(white_start(), "8/8/8/8/8/8/8/R3K2R w - - 0 1")]);
        let moves = state.piece_moves(king);
        assert!(moves.iter().all(|m| m.kind.castle_zone().is_none()));

        // a blocked path kills only that side
        let state = state_from(&[(white_start(), "8/8/8/8/8/8/8/R2QK2R w KQ - 0 1")]);
        let moves = state.piece_moves(king);
        let castles: Vec<_> = moves.iter().filter_map(|m| m.kind.castle_zone()).collect();
        assert_eq!(castles, vec![CastleZone::WhiteKingside]);

        // an enemy rook on the home square does not count
        let state = state_from(&[(white_start(), "8/8/8/8/8/8/8/R3K2r w KQ - 0 1")]);
        let moves = state.piece_moves(king);
        let castles: Vec<_> = moves.iter().filter_map(|m| m.kind.castle_zone()).collect();
        assert_eq!(castles, vec![CastleZone::WhiteQueenside]);
    }

    #[test]
    fn brawn_has_extra_capture_directions() {
        // same single board: only the X-Y captures can land anywhere, but the
        // brawn's move list must not contain *fewer* entries than the pawn's
        let pawn_state = state_from(&[(white_start(), "8/8/8/2p1p3/3P4/8/8/8 w - - 0 1")]);
        let brawn_state = state_from(&[(white_start(), "8/8/8/2p1p3/3W4/8/8/8 w - - 0 1")]);
        let sq = Square::new(4, 5, 1, 0, Colour::White);
        let pawn_moves = pawn_state.piece_moves(sq);
        let brawn_moves = brawn_state.piece_moves(sq);
        // push + two diagonal captures each
        assert_eq!(pawn_moves.len(), 3);
        assert_eq!(brawn_moves.len(), 3);
    }

    #[test]
    fn aggregation_skips_frozen_and_waiting_boards() {
        let start = white_start();
        let mut state = state_from(&[(start, STARTPOS)]);
        let e2 = Square::new(5, 7, 1, 0, Colour::White);
        let e4 = Square::new(5, 5, 1, 0, Colour::White);
        assert!(state.apply_move(Move::with_kind(e2, e4, MoveKind::DoublePush), ColourSet::WHITE));
        // the origin board is frozen now; white has nothing left to move
        assert!(!state.board_playable(start));
        assert!(state.moveable_boards(Colour::White).is_empty());
        assert_eq!(state.moveable_boards(Colour::Black).len(), 1);
    }
}
