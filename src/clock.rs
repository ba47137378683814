use crate::pieces::Colour;

/// Countdown clock with a per-turn increment, in microseconds. The engine
/// only drives it at submission and undo boundaries; actual timekeeping is
/// the caller's job via [`tick`](Clock::tick). Flag fall is reported as a
/// value and treated by the state exactly like a captured royal.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Clock {
    us_white: i64,
    us_black: i64,
    us_turn_started: i64,
    us_increment: i64,
    turn: Colour,
}

impl Clock {
    pub fn new(us_budget: i64, us_increment: i64) -> Self {
        Self {
            us_white: us_budget,
            us_black: us_budget,
            us_turn_started: 0,
            us_increment,
            turn: Colour::None,
        }
    }

    /// Hands the clock to `colour`, crediting the increment to whoever just
    /// submitted. The very first handover to Black is ignored so the clock
    /// only starts running once White has submitted a move.
    pub fn set_turn(&mut self, colour: Colour) {
        if self.turn.is_none() && colour.is_black() {
            return;
        }
        match self.turn {
            Colour::White => self.us_white += self.us_increment,
            Colour::Black => self.us_black += self.us_increment,
            Colour::None => {}
        }
        self.turn = colour;
        self.us_turn_started = self.remaining(colour);
    }

    /// Subtracts elapsed time from the running colour's budget and reports
    /// the colour whose flag fell, if any.
    #[must_use]
    pub fn tick(&mut self, elapsed_us: i64) -> Option<Colour> {
        match self.turn {
            Colour::White => {
                self.us_white -= elapsed_us;
                (self.us_white <= 0).then_some(Colour::White)
            }
            Colour::Black => {
                self.us_black -= elapsed_us;
                (self.us_black <= 0).then_some(Colour::Black)
            }
            Colour::None => None,
        }
    }

    pub fn stop(&mut self) {
        self.turn = Colour::None;
    }

    pub fn turn(&self) -> Colour {
        self.turn
    }

    pub fn remaining(&self, colour: Colour) -> i64 {
        if colour.is_black() {
            self.us_black
        } else {
            self.us_white
        }
    }

    pub fn increment(&self) -> i64 {
        self.us_increment
    }

    /// How long the running colour has thought this turn.
    pub fn taken(&self) -> i64 {
        self.us_turn_started - self.remaining(self.turn)
    }

    pub(crate) fn turn_started(&self) -> i64 {
        self.us_turn_started
    }

    pub(crate) fn restore(&mut self, us_white: i64, us_black: i64, us_turn_started: i64) {
        self.us_white = us_white;
        self.us_black = us_black;
        self.us_turn_started = us_turn_started;
    }

    /// Display form for UIs: `h:mm:ss` above an hour, `m:ss` above a minute,
    /// `0:ss.d` with tenths below.
    pub fn format(&self, colour: Colour) -> String {
        let us = self.remaining(colour);
        if us <= 0 {
            return "0:00.0".to_string();
        }
        let total_seconds = us / 1_000_000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if minutes >= 60 {
            format!("{}:{:02}:{:02}", minutes / 60, minutes % 60, seconds)
        } else if minutes < 1 {
            format!("0:{seconds:02}.{}", (us / 100_000) % 10)
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}
