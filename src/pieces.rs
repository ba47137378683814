use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

use strum_macros::EnumIter;

/// Player colour. The numeric sign doubles as the move direction along the Y
/// axis and as the timeline-growth direction, which is why `None` (empty
/// squares, stopped clocks) is part of the type rather than an `Option`.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(i8)]
#[must_use]
pub enum Colour {
    #[default]
    None = 0,
    White = 1,
    Black = -1,
}

impl Colour {
    pub fn sign(self) -> i32 {
        self as i8 as i32
    }

    pub fn is_white(self) -> bool {
        self == Colour::White
    }

    pub fn is_black(self) -> bool {
        self == Colour::Black
    }

    pub fn is_none(self) -> bool {
        self == Colour::None
    }

    /// Swaps White and Black; `None` stays `None`.
    pub fn other(self) -> Self {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
            Colour::None => Colour::None,
        }
    }

    pub fn players() -> impl Iterator<Item = Colour> {
        [Colour::White, Colour::Black].into_iter()
    }

    /// Index into per-player arrays. Must not be called for `None`.
    pub fn player_index(self) -> usize {
        debug_assert!(!self.is_none());
        usize::from(self.is_black())
    }

    pub fn letter(self) -> char {
        match self {
            Colour::White => 'w',
            Colour::Black => 'b',
            Colour::None => '-',
        }
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colour::White => "WHITE",
            Colour::Black => "BLACK",
            Colour::None => "NONE",
        };
        write!(f, "{name}")
    }
}

/// A set of player colours: move rights, loss flags.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct ColourSet(u8);

impl ColourSet {
    pub const NONE: Self = Self(0);
    pub const WHITE: Self = Self(1);
    pub const BLACK: Self = Self(2);
    pub const BOTH: Self = Self(3);

    pub fn single(colour: Colour) -> Self {
        match colour {
            Colour::White => Self::WHITE,
            Colour::Black => Self::BLACK,
            Colour::None => Self::NONE,
        }
    }

    /// `false` for `Colour::None`: nobody holds rights for "no colour".
    pub fn contains(self, colour: Colour) -> bool {
        !colour.is_none() && self.0 & Self::single(colour).0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ColourSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ColourSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The four sliding directions a piece can be capable of, named after the
/// pure piece that moves that way alone.
#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumIter)]
#[must_use]
pub enum SliderAxis {
    /// Rook-like: one nonzero component.
    Orthogonal,
    /// Bishop-like: two nonzero components.
    Diagonal,
    /// Unicorn-like: three nonzero components.
    Triagonal,
    /// Dragon-like: all four components nonzero.
    Quadragonal,
}

impl SliderAxis {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A small set of [`SliderAxis`] values. Compound pieces are unions: the
/// princess is rook + bishop, the queen all four axes.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct AxisSet(u8);

impl AxisSet {
    pub const EMPTY: Self = Self(0);

    pub const fn with(self, axis: SliderAxis) -> Self {
        Self(self.0 | axis.bit())
    }

    pub fn contains(self, axis: SliderAxis) -> bool {
        self.0 & axis.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// The closed piece vocabulary. Royalty is part of the kind: capturing a
/// [`King`](PieceKind::King) or [`RoyalQueen`](PieceKind::RoyalQueen) records
/// a loss, while [`CommonKing`](PieceKind::CommonKing) moves like a king but
/// can be captured freely.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter)]
#[must_use]
pub enum PieceKind {
    Pawn,
    /// Extended pawn with two additional capture directions.
    Brawn,
    Knight,
    King,
    CommonKing,
    Rook,
    Bishop,
    /// Slides triagonally (three axes at once).
    Unicorn,
    /// Slides quadragonally (all four axes at once).
    Dragon,
    Princess,
    Queen,
    RoyalQueen,
}

impl PieceKind {
    /// The union of sliding capabilities; empty for the walker kinds
    /// (pawn, brawn, knight, king). A kind either slides or walks, never both.
    pub fn slider_axes(self) -> AxisSet {
        use SliderAxis::*;
        match self {
            PieceKind::Rook => AxisSet::EMPTY.with(Orthogonal),
            PieceKind::Bishop => AxisSet::EMPTY.with(Diagonal),
            PieceKind::Unicorn => AxisSet::EMPTY.with(Triagonal),
            PieceKind::Dragon => AxisSet::EMPTY.with(Quadragonal),
            PieceKind::Princess => AxisSet::EMPTY.with(Orthogonal).with(Diagonal),
            PieceKind::Queen | PieceKind::RoyalQueen => {
                AxisSet::EMPTY.with(Orthogonal).with(Diagonal).with(Triagonal).with(Quadragonal)
            }
            _ => AxisSet::EMPTY,
        }
    }

    pub fn is_royal(self) -> bool {
        matches!(self, PieceKind::King | PieceKind::RoyalQueen)
    }

    pub fn is_kingly(self) -> bool {
        matches!(self, PieceKind::King | PieceKind::CommonKing)
    }

    pub fn is_pawnlike(self) -> bool {
        matches!(self, PieceKind::Pawn | PieceKind::Brawn)
    }

    pub fn to_ascii_char(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Brawn => 'W',
            PieceKind::Knight => 'N',
            PieceKind::King => 'K',
            PieceKind::CommonKing => 'C',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Unicorn => 'U',
            PieceKind::Dragon => 'D',
            PieceKind::Princess => 'S',
            PieceKind::Queen => 'Q',
            PieceKind::RoyalQueen => 'Y',
        }
    }

    pub fn from_ascii_char(c: char) -> Option<Self> {
        Some(match c.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'W' => PieceKind::Brawn,
            'N' => PieceKind::Knight,
            'K' => PieceKind::King,
            'C' => PieceKind::CommonKing,
            'R' => PieceKind::Rook,
            'B' => PieceKind::Bishop,
            'U' => PieceKind::Unicorn,
            'D' => PieceKind::Dragon,
            'S' => PieceKind::Princess,
            'Q' => PieceKind::Queen,
            'Y' => PieceKind::RoyalQueen,
            _ => return None,
        })
    }

    /// The letter prefixed to a square in move notation; pawns get none.
    pub fn pgn_char(self) -> Option<char> {
        if self == PieceKind::Pawn {
            None
        } else {
            Some(self.to_ascii_char())
        }
    }
}

/// One occupant of a grid cell. Empty cells are `Option::<Piece>::None`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}

impl Piece {
    pub const fn new(colour: Colour, kind: PieceKind) -> Self {
        Self { kind, colour }
    }

    /// Parses the FEN letter vocabulary: uppercase white, lowercase black.
    pub fn from_ascii_char(c: char) -> Option<Self> {
        let kind = PieceKind::from_ascii_char(c)?;
        let colour = if c.is_ascii_uppercase() { Colour::White } else { Colour::Black };
        Some(Self::new(colour, kind))
    }

    pub fn to_ascii_char(self) -> char {
        let c = self.kind.to_ascii_char();
        if self.colour.is_black() {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }

    pub fn is_royal(self) -> bool {
        self.kind.is_royal()
    }
}

/// The colour of an optional occupant; `Colour::None` for empty cells.
/// Keeps the movegen comparisons close to arithmetic on signs.
pub fn colour_of(cell: Option<Piece>) -> Colour {
    cell.map_or(Colour::None, |p| p.colour)
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_char())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn ascii_letters_roundtrip() {
        for kind in PieceKind::iter() {
            for colour in Colour::players() {
                let piece = Piece::new(colour, kind);
                assert_eq!(Piece::from_ascii_char(piece.to_ascii_char()), Some(piece));
            }
        }
        assert_eq!(Piece::from_ascii_char('x'), None);
    }

    #[test]
    fn slider_axes_and_walkers_are_exclusive() {
        for kind in PieceKind::iter() {
            let walks = matches!(
                kind,
                PieceKind::Pawn | PieceKind::Brawn | PieceKind::Knight | PieceKind::King | PieceKind::CommonKing
            );
            assert_eq!(kind.slider_axes().is_empty(), walks, "{kind:?}");
        }
    }

    #[test]
    fn compound_pieces_are_unions() {
        let princess = PieceKind::Princess.slider_axes();
        assert!(princess.contains(SliderAxis::Orthogonal));
        assert!(princess.contains(SliderAxis::Diagonal));
        assert!(!princess.contains(SliderAxis::Triagonal));
        for axis in SliderAxis::iter() {
            assert!(PieceKind::Queen.slider_axes().contains(axis));
            assert!(PieceKind::RoyalQueen.slider_axes().contains(axis));
        }
    }

    #[test]
    fn royalty() {
        assert!(PieceKind::King.is_royal());
        assert!(PieceKind::RoyalQueen.is_royal());
        assert!(!PieceKind::CommonKing.is_royal());
        assert!(!PieceKind::Queen.is_royal());
    }

    #[test]
    fn rights_sets() {
        let mut rights = ColourSet::WHITE;
        assert!(rights.contains(Colour::White));
        assert!(!rights.contains(Colour::Black));
        assert!(!rights.contains(Colour::None));
        rights |= ColourSet::BLACK;
        assert_eq!(rights, ColourSet::BOTH);
        assert!(ColourSet::NONE.is_empty());
    }
}
