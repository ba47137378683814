//! Import and export of the 5D-PGN dialect: a bracketed metadata block
//! (mode, size, king home squares, promotion allow-lists, per-board position
//! records, time controls) followed by numbered move pairs
//! `N.<white moves>/<black moves>`. A single `>` marks non-branching time
//! travel, `>>` branching travel, `x` a capture, `=<letter>` a promotion, and
//! `O-O`/`O-O-O` replace the square pair for castling.

use crate::board::{Board, GameSettings};
use crate::castling::CastleZone;
use crate::clock::Clock;
use crate::common::{parse_int_from_str, split_unquoted_whitespace, unknown_name_error, unquote};
use crate::coords::{BoardId, Ply, Square, Vec2};
use crate::moves::{AppliedMove, Move, MoveKind, Promotion};
use crate::pieces::Colour;
use crate::state::GameState;
use crate::{EngineError, Res};

/// The standard two-player starting document.
pub const STANDARD: &str = "\
[Mode \"5D\"]
[Size \"8x8\"]
[Variant \"Standard\"]
[ID \"standard\"]
[KingPos \"e1\" \"e8\"]
[rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR:0:1:w:KQkq]";

/// Maps variant ids to their starting documents. An explicit object instead
/// of a process-wide cache: callers that load variant files register them on
/// their own instance.
#[derive(Debug, Clone)]
pub struct VariantRegistry {
    entries: Vec<Variant>,
}

#[derive(Debug, Clone)]
struct Variant {
    id: String,
    name: String,
    document: String,
}

impl VariantRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self { entries: Vec::new() };
        registry.register(STANDARD).expect("the built-in standard variant is well-formed");
        registry
    }

    /// Reads the `[Variant]` and `[ID]` tags off a document's metadata block
    /// and files it under that id.
    pub fn register(&mut self, document: &str) -> Res<()> {
        let mut name = "Unknown".to_string();
        let mut id = None;
        for line in document.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }
            if !line.starts_with('[') {
                break;
            }
            let words = split_unquoted_whitespace(line.trim_start_matches('[').trim_end_matches(']'));
            match words[0].as_str() {
                "Variant" => {
                    if let Some(value) = words.get(1) {
                        name = unquote(value).to_string();
                    }
                }
                "ID" => id = words.get(1).map(|value| unquote(value).to_string()),
                _ => {}
            }
        }
        let Some(id) = id else {
            anyhow::bail!("variant document has no [ID] tag");
        };
        self.entries.push(Variant { id, name, document: document.to_string() });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Res<&str> {
        self.entries
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.document.as_str())
            .ok_or_else(|| unknown_name_error(id, self.entries.iter().map(|v| v.id.as_str()), "variant"))
    }

    pub fn variants(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|v| (v.id.as_str(), v.name.as_str()))
    }
}

fn malformed(msg: impl Into<String>) -> EngineError {
    EngineError::MalformedNotation(msg.into())
}

fn tag_value<'a>(words: &'a [String], i: usize, line: &str) -> Result<&'a str, EngineError> {
    words
        .get(i)
        .map(|w| unquote(w))
        .ok_or_else(|| malformed(format!("'{line}' is missing a value")))
}

fn bad<T>(res: Res<T>) -> Result<T, EngineError> {
    res.map_err(|e| malformed(format!("{e:#}")))
}

pub(crate) fn parse(doc: &str) -> Result<GameState, EngineError> {
    let mut settings = GameSettings::default();
    let mut metadata: Vec<&str> = Vec::new();
    let mut records: Vec<(BoardId, String)> = Vec::new();
    let mut active_tag = None;
    let mut clock = None;
    let mut state: Option<GameState> = None;
    let mut move_pair = 0u32;

    'lines: for raw in doc.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('[') {
            let inner = line.trim_start_matches('[').trim_end_matches(']');
            let words = split_unquoted_whitespace(inner);
            match words[0].as_str() {
                "Mode" => {
                    let mode = tag_value(&words, 1, line)?;
                    if mode != "5D" {
                        return Err(EngineError::UnsupportedMode(mode.to_string()));
                    }
                    metadata.push(line);
                }
                // tags that are carried through but don't drive the engine
                "Result" | "Date" | "Time" | "White" | "Black" | "ID" | "Board" | "Variant" => {
                    metadata.push(line);
                }
                "Active" => {
                    active_tag = Some(match tag_value(&words, 1, line)? {
                        "WHITE" => Colour::White,
                        "BLACK" => Colour::Black,
                        _ => Colour::None,
                    });
                }
                "TimeControls" => {
                    let control = tag_value(&words, 1, line)?;
                    let (minutes, inc) = control
                        .split_once('+')
                        .ok_or_else(|| malformed(format!("time control '{control}' is not 'minutes+increment'")))?;
                    let minutes: i64 = bad(parse_int_from_str(minutes, "time budget"))?;
                    let inc: i64 = bad(parse_int_from_str(inc, "time increment"))?;
                    clock = Some(Clock::new(minutes * 60_000_000, inc * 1_000_000));
                    metadata.push(line);
                }
                "TimeClocks" => {
                    let mut parts = tag_value(&words, 1, line)?.split(',');
                    let mut next =
                        || -> Result<i64, EngineError> { bad(parse_int_from_str(parts.next().unwrap_or(""), "clock state")) };
                    let (white, black, started) = (next()?, next()?, next()?);
                    let Some(clock) = clock.as_mut() else {
                        return Err(malformed("[TimeClocks] without a preceding [TimeControls]".to_string()));
                    };
                    clock.restore(white, black, started);
                }
                "Size" => {
                    let size = tag_value(&words, 1, line)?;
                    let (w, h) = size
                        .split_once('x')
                        .ok_or_else(|| malformed(format!("size '{size}' is not 'WxH'")))?;
                    settings.size = Vec2::new(
                        bad(parse_int_from_str(w, "board width"))?,
                        bad(parse_int_from_str(h, "board height"))?,
                    );
                    metadata.push(line);
                }
                "KingPos" | "CastlePos" | "CastlerPos" => {
                    let white = bad(settings.square_from_alg(tag_value(&words, 1, line)?))?;
                    let black = bad(settings.square_from_alg(tag_value(&words, 2, line)?))?;
                    settings.set_king_home(white, black);
                    metadata.push(line);
                }
                "Promotions" => {
                    let white = parse_promotions(tag_value(&words, 1, line)?)?;
                    let black = match words.get(2) {
                        Some(word) => parse_promotions(unquote(word))?,
                        None => white.clone(),
                    };
                    settings.set_promotions(Colour::White, white);
                    settings.set_promotions(Colour::Black, black);
                    metadata.push(line);
                }
                _ => {
                    // anything else is a board record: placement:L:T:colour:castling
                    let cleaned = inner.replace('*', "");
                    let parts: Vec<&str> = cleaned.split(':').collect();
                    if parts.len() < 5 {
                        return Err(malformed(format!("'{line}' is neither a known tag nor a board record")));
                    }
                    let l = bad(parse_int_from_str(parts[1], "timeline"))?;
                    let t = bad(parse_int_from_str(parts[2], "turn"))?;
                    let colour = match parts[3] {
                        "w" => Colour::White,
                        "b" => Colour::Black,
                        c => return Err(malformed(format!("'{c}' is not a colour (expected 'w' or 'b')"))),
                    };
                    let id = BoardId::new(t, l, colour);
                    let fen = format!("{} {} {} - 0 1", parts[0], parts[3], parts[4]);
                    records.push((id, fen));
                    metadata.push(line);
                }
            }
        } else {
            if state.is_none() {
                state = Some(setup(settings.clone(), &records)?);
            }
            let Some(st) = state.as_mut() else {
                continue;
            };
            let Some((number, rest)) = line.split_once('.') else {
                return Err(malformed(format!("move line '{line}' has no move-pair number")));
            };
            if rest.trim().is_empty() {
                break 'lines;
            }
            let number: u32 = bad(parse_int_from_str(number, "move-pair number"))?;
            move_pair += 1;
            if number != move_pair {
                return Err(EngineError::MovesOutOfOrder { expected: move_pair, got: number });
            }
            let (white_part, black_part) = match rest.split_once('/') {
                Some((w, b)) => (w, Some(b)),
                None => (rest, None),
            };
            for token in strip_comments(white_part).split_ascii_whitespace() {
                apply_move_text(st, token, Colour::White)?;
            }
            if let Some(black_part) = black_part {
                for token in strip_comments(black_part).split_ascii_whitespace() {
                    apply_move_text(st, token, Colour::Black)?;
                }
            }
        }
    }

    let mut state = match state {
        Some(state) => state,
        None => setup(settings, &records)?,
    };
    state.metadata = metadata.join("\n");
    state.clock = clock;
    state.recalc_bounds();
    state.active = active_tag.unwrap_or_else(|| state.present_colour());
    Ok(state)
}

fn parse_promotions(letters: &str) -> Result<Vec<Promotion>, EngineError> {
    if letters == "-" {
        return Ok(Vec::new());
    }
    letters
        .chars()
        .map(|c| {
            Promotion::from_ascii_char(c).ok_or_else(|| malformed(format!("'{c}' is not a promotion target")))
        })
        .collect()
}

/// Builds the initial multiverse. A record whose predecessor identity is also
/// listed continues it (turn-zero setups); all other records are roots.
fn setup(settings: GameSettings, records: &[(BoardId, String)]) -> Result<GameState, EngineError> {
    let mut state = GameState::empty(settings);
    for (id, fen) in records {
        if state.boards.contains_key(id) {
            return Err(malformed(format!("duplicate board record for {id}")));
        }
        let prev = BoardId::new(id.t - 1, id.l, id.colour).next_turn();
        let board = match state.boards.get(&prev) {
            Some(parent) => bad(Board::from_fen_with_parent(parent, fen))?,
            None => bad(Board::from_fen(&state.settings, *id, fen))?,
        };
        state.boards.insert(board.id(), board);
    }
    if state.boards.is_empty() {
        return Err(malformed("the document establishes no starting board".to_string()));
    }
    Ok(state)
}

fn strip_comments(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_comment = false;
    for c in s.chars() {
        match c {
            '{' => in_comment = true,
            '}' => in_comment = false,
            _ if !in_comment => out.push(c),
            _ => {}
        }
    }
    out
}

/// "LTT" as printed inside parentheses: timeline first, then the turn.
fn parse_tl(s: &str, colour: Colour) -> Result<BoardId, EngineError> {
    let Some((l, t)) = s.split_once('T') else {
        return Err(malformed(format!("'{s}' is not a board coordinate (expected '<L>T<T>')")));
    };
    Ok(BoardId::new(
        bad(parse_int_from_str(t, "turn"))?,
        bad(parse_int_from_str(l, "timeline"))?,
        colour,
    ))
}

fn apply_move_text(state: &mut GameState, text: &str, colour: Colour) -> Result<(), EngineError> {
    let text = text.trim_end_matches(['+', '!', '?', '#']);
    let (Some(open), Some(close)) = (text.find('('), text.find(')')) else {
        return Err(malformed(format!("move '{text}' has no board coordinate")));
    };
    if close < open {
        return Err(malformed(format!("move '{text}' has mismatched parentheses")));
    }
    let origin_board = parse_tl(&text[open + 1..close], colour)?;
    let rest = &text[close + 1..];

    // the explicit pass: no piece, no squares
    if rest == "-" {
        return state.apply(Move::forced_pass(origin_board));
    }

    if rest == "O-O" || rest == "O-O-O" {
        let zone = CastleZone::new(colour, rest == "O-O");
        let origin = Square::from_parts(zone.king_origin(state.settings()), origin_board);
        let target = Square::from_parts(zone.king_target(state.settings()), origin_board);
        return state.apply(Move::with_kind(origin, target, MoveKind::Castles(zone)));
    }

    // origin square, with an optional piece letter in front
    let token_len = if rest.starts_with(|c: char| c.is_ascii_uppercase()) { 3 } else { 2 };
    if rest.len() < token_len || !rest.is_char_boundary(token_len) {
        return Err(malformed(format!("move '{text}' is missing its origin square")));
    }
    let from_xy = bad(state.settings().square_from_alg(&rest[..token_len]))?;
    let mut tail = &rest[token_len..];

    let mut promotion_char = None;
    if let Some(eq) = tail.rfind('=') {
        promotion_char = tail[eq + 1..].chars().next();
        tail = &tail[..eq];
    }

    let (target_board, to_token) = if tail.starts_with('>') {
        let travel = tail.trim_start_matches('>');
        let travel = travel.strip_prefix('x').unwrap_or(travel);
        let (Some(open), Some(close)) = (travel.find('('), travel.find(')')) else {
            return Err(malformed(format!("travel move '{text}' has no target board coordinate")));
        };
        if close < open {
            return Err(malformed(format!("travel move '{text}' has mismatched parentheses")));
        }
        (parse_tl(&travel[open + 1..close], colour)?, &travel[close + 1..])
    } else {
        (origin_board, tail.strip_prefix('x').unwrap_or(tail))
    };
    let to_xy = bad(state.settings().square_from_alg(to_token))?;

    let origin = Square::from_parts(from_xy, origin_board);
    let target = Square::from_parts(to_xy, target_board);

    // recover the kind tag the text doesn't spell out
    let moved = state
        .board(origin_board)
        .ok_or(EngineError::ReferencedBoardMissing(origin_board))?
        .piece(from_xy);
    let target_ep = state
        .board(target_board)
        .ok_or(EngineError::ReferencedBoardMissing(target_board))?
        .ep_target();
    let pawnlike = moved.is_some_and(|p| p.kind.is_pawnlike());
    let kind = if pawnlike && (target.y - origin.y).abs() == 2 {
        MoveKind::DoublePush
    } else if pawnlike && target_ep == Some(to_xy) {
        MoveKind::EnPassant
    } else if pawnlike && (target.y == 1 || target.y == state.settings().size.y) {
        let Some(c) = promotion_char else {
            return Err(malformed(format!("'{text}' reaches the back rank but names no promotion")));
        };
        let Some(promotion) = Promotion::from_ascii_char(c) else {
            return Err(malformed(format!("'{c}' is not a promotion target")));
        };
        MoveKind::Promotion(promotion)
    } else {
        MoveKind::Normal
    };

    state.apply(Move::with_kind(origin, target, kind))
}

pub(crate) fn write(state: &GameState) -> String {
    let mut out = String::new();
    for line in state.metadata.lines() {
        out += line;
        out.push('\n');
    }
    if let Some(clock) = state.clock() {
        out += &format!(
            "\n[TimeClocks {},{},{}]",
            clock.remaining(Colour::White),
            clock.remaining(Colour::Black),
            clock.turn_started()
        );
    }
    out += &format!("\n[Active {}]", state.active_colour());

    let mut ply = Ply::new(1, Colour::White);
    let mut compound = String::new();
    let mut flush = |out: &mut String, ply: Ply, compound: &mut String| {
        if ply.colour.is_white() {
            *out += &format!("\n{}.{compound}", ply.turn);
        } else {
            *out += &format!(" /{compound}");
        }
        compound.clear();
    };
    for applied in state.history() {
        if ply.colour != applied.colour() {
            flush(&mut out, ply, &mut compound);
            ply = ply.next();
        }
        compound.push(' ');
        compound += &move_text(state, applied);
    }
    flush(&mut out, ply, &mut compound);
    out
}

fn move_text(state: &GameState, applied: &AppliedMove) -> String {
    let mv = applied.mv;
    let (l, t) = (mv.origin.l, mv.origin.t);
    if mv.kind == MoveKind::ForcedPass {
        return format!("({l}T{t})-");
    }
    if let Some(zone) = mv.kind.castle_zone() {
        let castle = if zone.is_kingside() { "O-O" } else { "O-O-O" };
        return format!("({l}T{t}){castle}");
    }
    // the historical origin board is still in the arena, so the moved piece
    // can be read back without replaying
    let letter = state
        .board(mv.origin.board())
        .and_then(|b| b.piece(mv.origin.xy()))
        .and_then(|p| p.kind.pgn_char())
        .map(String::from)
        .unwrap_or_default();
    let from = state.settings().square_to_alg(mv.origin.xy());
    let to = state.settings().square_to_alg(mv.target.xy());
    let capture = if applied.captured.is_some() { "x" } else { "" };
    let promo = match mv.kind.promotion() {
        Some(p) => format!("={}", p.letter()),
        None => String::new(),
    };
    if !mv.is_travel() {
        format!("({l}T{t}){letter}{from}{capture}{to}{promo}")
    } else {
        let marker = if applied.branched() { ">>" } else { ">" };
        format!("({l}T{t}){letter}{from}{marker}{capture}({}T{}){to}{promo}", mv.target.l, mv.target.t)
    }
}

#[cfg(test)]
mod tests {
    use crate::pieces::{ColourSet, Piece, PieceKind};

    use super::*;

    /// Two independent timelines, both waiting on White's first move.
    const TWO_TIMELINES: &str = "\
[Mode \"5D\"]
[Size \"8x8\"]
[Variant \"Twin\"]
[ID \"twin\"]
[KingPos \"e1\" \"e8\"]
[rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR:0:1:w:KQkq]
[rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR:1:1:w:KQkq]";

    #[test]
    fn parses_the_standard_document() {
        let state = parse(STANDARD).unwrap();
        assert_eq!(state.active_colour(), Colour::White);
        assert_eq!(state.boards.len(), 1);
        let board = state.board(BoardId::new(1, 0, Colour::White)).unwrap();
        assert_eq!(board.piece(Vec2::new(5, 8)), Some(Piece::new(Colour::White, PieceKind::King)));
        assert_eq!(state.min_timeline(), 0);
        assert_eq!(state.max_timeline(), 0);
        assert_eq!(state.present_colour(), Colour::White);
    }

    #[test]
    fn the_registry_knows_standard_and_suggests_near_misses() {
        let registry = VariantRegistry::builtin();
        assert!(registry.get("standard").is_ok());
        let err = registry.get("standrad").unwrap_err().to_string();
        assert!(err.contains("standard"), "{err}");
        assert_eq!(registry.variants().count(), 1);
    }

    #[test]
    fn export_is_stable_from_the_first_write() {
        let state = parse(STANDARD).unwrap();
        let doc = write(&state);
        assert!(doc.contains("[Active WHITE]"));
        assert!(doc.ends_with("\n1."));
        let reparsed = parse(&doc).unwrap();
        assert_eq!(write(&reparsed), doc, "round trip must be byte-identical");
    }

    #[test]
    fn moves_survive_the_round_trip() {
        let mut state = parse(STANDARD).unwrap();
        let e2 = Square::new(5, 7, 1, 0, Colour::White);
        let e4 = Square::new(5, 5, 1, 0, Colour::White);
        assert!(state.apply_move(Move::with_kind(e2, e4, MoveKind::DoublePush), ColourSet::BOTH));
        assert!(state.submit(ColourSet::BOTH));
        let e7 = Square::new(5, 2, 1, 0, Colour::Black);
        let e5 = Square::new(5, 4, 1, 0, Colour::Black);
        assert!(state.apply_move(Move::with_kind(e7, e5, MoveKind::DoublePush), ColourSet::BOTH));
        assert!(state.submit(ColourSet::BOTH));

        let doc = write(&state);
        assert!(doc.contains("1. (0T1)e2e4 / (0T1)e7e5"), "got:\n{doc}");
        let reparsed = parse(&doc).unwrap();
        assert_eq!(reparsed.history().len(), 2);
        assert_eq!(reparsed.active_colour(), Colour::White);
        assert_eq!(write(&reparsed), doc);
        // the en-passant targets match move for move
        for (a, b) in state.history().iter().zip(reparsed.history()) {
            assert_eq!(a.mv, b.mv);
        }
    }

    #[test]
    fn travel_markers_distinguish_branching() {
        // white moves a knight from timeline 0 into timeline 1's playable
        // head: plain `>`
        let mut state = parse(TWO_TIMELINES).unwrap();
        let b1 = Square::new(2, 8, 1, 0, Colour::White);
        let b3_on_l1 = Square::new(2, 6, 1, 1, Colour::White);
        state.apply(Move::new(b1, b3_on_l1)).unwrap();
        let doc = write(&state);
        assert!(doc.contains("(0T1)Nb1>(1T1)b3"), "got:\n{doc}");
        assert!(!doc.contains(">>"));

        let reparsed = parse(&doc).unwrap();
        assert_eq!(reparsed.max_timeline(), 1, "no timeline was created");
        assert_eq!(write(&reparsed), doc);

        // the same jump into a frozen board must branch and print `>>`
        let mut state = parse(TWO_TIMELINES).unwrap();
        let e2 = Square::new(5, 7, 1, 1, Colour::White);
        let e3 = Square::new(5, 6, 1, 1, Colour::White);
        state.apply(Move::new(e2, e3)).unwrap();
        let frozen_target = Square::new(2, 6, 1, 1, Colour::White);
        state.apply(Move::new(b1, frozen_target)).unwrap();
        let doc = write(&state);
        assert!(doc.contains("(0T1)Nb1>>(1T1)b3"), "got:\n{doc}");
        let reparsed = parse(&doc).unwrap();
        assert_eq!(reparsed.max_timeline(), 2, "the branch was replayed");
        assert_eq!(write(&reparsed), doc);
    }

    #[test]
    fn forced_pass_round_trips() {
        let mut state = parse(TWO_TIMELINES).unwrap();
        let e2 = Square::new(5, 7, 1, 0, Colour::White);
        let e3 = Square::new(5, 6, 1, 0, Colour::White);
        state.apply(Move::new(e2, e3)).unwrap();
        assert!(state.force_skip(BoardId::new(1, 1, Colour::White), ColourSet::BOTH));
        let doc = write(&state);
        assert!(doc.contains("(1T1)-"), "got:\n{doc}");
        let reparsed = parse(&doc).unwrap();
        assert_eq!(reparsed.history().len(), 2);
        assert_eq!(reparsed.history()[1].mv.kind, MoveKind::ForcedPass);
        assert_eq!(write(&reparsed), doc);
    }

    #[test]
    fn castling_and_promotion_notation() {
        let doc = "\
[Mode \"5D\"]
[Size \"8x8\"]
[KingPos \"e1\" \"e8\"]
[8/P3k3/8/8/8/8/8/R3K2R:0:1:w:KQ]";
        let mut state = parse(doc).unwrap();
        let castle = Move::with_kind(
            Square::new(5, 8, 1, 0, Colour::White),
            Square::new(7, 8, 1, 0, Colour::White),
            MoveKind::Castles(CastleZone::WhiteKingside),
        );
        assert!(state.apply_move(castle, ColourSet::BOTH));
        let exported = write(&state);
        assert!(exported.contains("(0T1)O-O"), "got:\n{exported}");
        let reparsed = parse(&exported).unwrap();
        let head = reparsed.board(BoardId::new(1, 0, Colour::Black)).unwrap();
        assert_eq!(head.piece(Vec2::new(7, 8)).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(head.piece(Vec2::new(6, 8)).map(|p| p.kind), Some(PieceKind::Rook), "the rook came along");
        assert_eq!(write(&reparsed), exported);

        // promotion: the a7 pawn queens
        let mut state = parse(doc).unwrap();
        let push = Move::with_kind(
            Square::new(1, 2, 1, 0, Colour::White),
            Square::new(1, 1, 1, 0, Colour::White),
            MoveKind::Promotion(Promotion::Queen),
        );
        assert!(state.apply_move(push, ColourSet::BOTH));
        let exported = write(&state);
        assert!(exported.contains("(0T1)a7a8=Q"), "got:\n{exported}");
        let reparsed = parse(&exported).unwrap();
        let head = reparsed.board(BoardId::new(1, 0, Colour::Black)).unwrap();
        assert_eq!(head.piece(Vec2::new(1, 1)), Some(Piece::new(Colour::White, PieceKind::Queen)));
        assert_eq!(write(&reparsed), exported);
    }

    #[test]
    fn clock_state_round_trips() {
        let doc = format!("{STANDARD}\n[TimeControls \"5+3\"]");
        let state = parse(&doc).unwrap();
        let clock = state.clock().unwrap();
        assert_eq!(clock.remaining(Colour::White), 300_000_000);
        assert_eq!(clock.increment(), 3_000_000);

        let exported = write(&state);
        assert!(exported.contains("[TimeClocks 300000000,300000000,0]"), "got:\n{exported}");
        let reparsed = parse(&exported).unwrap();
        assert_eq!(reparsed.clock(), state.clock());
        assert_eq!(write(&reparsed), exported);
    }

    #[test]
    fn promotion_allow_lists_are_per_colour() {
        let doc = "\
[Mode \"5D\"]
[Size \"8x8\"]
[Promotions \"QN\" \"Q\"]
[rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR:0:1:w:KQkq]";
        let state = parse(doc).unwrap();
        assert_eq!(state.settings().promotions(Colour::White), &[Promotion::Queen, Promotion::Knight]);
        assert_eq!(state.settings().promotions(Colour::Black), &[Promotion::Queen]);

        let doc = doc.replace("[Promotions \"QN\" \"Q\"]", "[Promotions \"-\"]");
        let state = parse(&doc).unwrap();
        assert!(state.settings().promotions(Colour::White).is_empty());
        assert!(state.settings().promotions(Colour::Black).is_empty());
    }

    #[test]
    fn grammar_failures_are_typed() {
        assert_eq!(
            parse("[Mode \"4D\"]").unwrap_err(),
            EngineError::UnsupportedMode("4D".to_string())
        );
        let doc = format!("{STANDARD}\n1. (0T1)e2e3\n3. (0T1)d2d3");
        assert_eq!(
            parse(&doc).unwrap_err(),
            EngineError::MovesOutOfOrder { expected: 2, got: 3 }
        );
        assert!(matches!(parse("[Mode \"5D\"]"), Err(EngineError::MalformedNotation(_))));
        assert!(matches!(
            parse(&format!("{STANDARD}\n1. e4")),
            Err(EngineError::MalformedNotation(_))
        ));
    }

    #[test]
    fn turn_zero_records_chain_as_parents() {
        // the black board at T0 precedes the white board at T1
        let doc = "\
[Mode \"5D\"]
[Size \"8x8\"]
[rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR:0:0:b:KQkq]
[rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR:0:1:w:KQkq]";
        let state = parse(doc).unwrap();
        let root = state.board(BoardId::new(0, 0, Colour::Black)).unwrap();
        let head = state.board(BoardId::new(1, 0, Colour::White)).unwrap();
        assert_eq!(root.parent(), None);
        assert_eq!(head.parent(), Some(root.id()));
        // only the head is playable
        assert_eq!(state.moveable_boards(Colour::None).len(), 1);
    }
}
