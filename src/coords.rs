use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Sub};

use crate::pieces::Colour;

/// 2-D integer vector. Doubles as an in-board step and as a 1-indexed grid
/// position; `(0, 0)` marks "no square" in the latter role.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Neg,
)]
#[must_use]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0, 0);
    pub const AXIS_X: Self = Self::new(1, 0);
    pub const AXIS_Y: Self = Self::new(0, 1);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn min(self, o: Self) -> Self {
        Self::new(self.x.min(o.x), self.y.min(o.y))
    }

    pub fn max(self, o: Self) -> Self {
        Self::new(self.x.max(o.x), self.y.max(o.y))
    }
}

impl Mul<i32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// 4-D integer step: board axes X/Y plus the turn (T) and timeline (L) axes.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Neg,
)]
#[must_use]
pub struct Vec4 {
    pub x: i32,
    pub y: i32,
    pub t: i32,
    pub l: i32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, t: i32, l: i32) -> Self {
        Self { x, y, t, l }
    }

    /// Every component in `{-1, 0, 1}`.
    pub fn is_unit(self) -> bool {
        [self.x, self.y, self.t, self.l].into_iter().all(|c| (-1..=1).contains(&c))
    }

    /// Exactly one nonzero component.
    pub fn is_orthogonal(self) -> bool {
        [self.x, self.y, self.t, self.l].into_iter().filter(|&c| c != 0).count() == 1
    }

    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.t.abs(), self.l.abs())
    }
}

impl Mul<i32> for Vec4 {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.t * rhs, self.l * rhs)
    }
}

/// A half-turn: a turn number tagged with the colour to move. Used for
/// ordering applied moves into `N.<white>/<black>` pairs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct Ply {
    pub turn: i32,
    pub colour: Colour,
}

impl Ply {
    pub const fn new(turn: i32, colour: Colour) -> Self {
        Self { turn, colour }
    }

    /// White hands over to Black within the same turn; Black hands over to
    /// White of the next turn.
    pub fn next(self) -> Self {
        if self.colour.is_white() {
            Self::new(self.turn, Colour::Black)
        } else {
            Self::new(self.turn + 1, Colour::White)
        }
    }

    /// Single increasing index for display ordering and Present computation.
    pub fn index(self) -> i32 {
        vis_ply(self.turn, self.colour)
    }
}

pub fn vis_ply(turn: i32, colour: Colour) -> i32 {
    2 * turn + i32::from(colour.is_black())
}

/// Identity of one board snapshot: which turn, which timeline, whose move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct BoardId {
    pub t: i32,
    pub l: i32,
    pub colour: Colour,
}

impl BoardId {
    pub const fn new(t: i32, l: i32, colour: Colour) -> Self {
        Self { t, l, colour }
    }

    pub fn next_turn(self) -> Self {
        if self.colour.is_white() {
            Self::new(self.t, self.l, Colour::Black)
        } else {
            Self::new(self.t + 1, self.l, Colour::White)
        }
    }

    pub fn ply(self) -> Ply {
        Ply::new(self.t, self.colour)
    }

    pub fn vis_ply(self) -> i32 {
        vis_ply(self.t, self.colour)
    }
}

impl Display for BoardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({lt}T{t}){c}", lt = self.l, t = self.t, c = self.colour.letter())
    }
}

/// A fully absolute square: a board identity plus a 1-indexed grid position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct Square {
    pub x: i32,
    pub y: i32,
    pub t: i32,
    pub l: i32,
    pub colour: Colour,
}

impl Square {
    pub const fn new(x: i32, y: i32, t: i32, l: i32, colour: Colour) -> Self {
        Self { x, y, t, l, colour }
    }

    pub fn from_parts(xy: Vec2, board: BoardId) -> Self {
        Self::new(xy.x, xy.y, board.t, board.l, board.colour)
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn board(self) -> BoardId {
        BoardId::new(self.t, self.l, self.colour)
    }

    pub fn next_turn(self) -> Self {
        Self::from_parts(self.xy(), self.board().next_turn())
    }
}

impl Add<Vec4> for Square {
    type Output = Self;

    fn add(self, rhs: Vec4) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.t + rhs.t, self.l + rhs.l, self.colour)
    }
}

impl Sub<Vec4> for Square {
    type Output = Self;

    fn sub(self, rhs: Vec4) -> Self {
        self + -rhs
    }
}

/// The difference of two absolute squares is a relative step; there is
/// deliberately no `Mul` on absolute positions.
impl Sub for Square {
    type Output = Vec4;

    fn sub(self, rhs: Self) -> Vec4 {
        debug_assert_eq!(self.colour, rhs.colour, "difference between different-colour squares is not a step");
        Vec4::new(self.x - rhs.x, self.y - rhs.y, self.t - rhs.t, self.l - rhs.l)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}, {}>", self.board(), self.x, self.y)
    }
}
