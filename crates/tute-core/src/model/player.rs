use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Seat index, 0-based. Displayed 1-based as `Player n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(u8);

impl Seat {
    /// Indices past `u8::MAX` saturate, so they stay out of range for any
    /// table instead of wrapping onto a real seat.
    pub const fn new(index: usize) -> Self {
        if index > u8::MAX as usize {
            Self(u8::MAX)
        } else {
            Self(index as u8)
        }
    }

    /// Checked constructor for `players`.
    pub fn try_new(index: usize, players: PlayerCount) -> Option<Self> {
        (index < players.get()).then(|| Self(index as u8))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn next(self, players: PlayerCount) -> Seat {
        Seat(((self.0 as usize + 1) % players.get()) as u8)
    }

    /// Seat `offset` places to the left of this one.
    pub const fn offset(self, offset: usize, players: PlayerCount) -> Seat {
        Seat(((self.0 as usize + offset) % players.get()) as u8)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Number of players at the table, always within 2..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "usize", from = "usize")]
pub struct PlayerCount(u8);

impl PlayerCount {
    pub const TWO: PlayerCount = PlayerCount(2);
    pub const THREE: PlayerCount = PlayerCount(3);
    pub const FOUR: PlayerCount = PlayerCount(4);

    /// Out-of-range counts are clamped, never rejected.
    pub const fn clamped(count: usize) -> Self {
        let count = if count < MIN_PLAYERS {
            MIN_PLAYERS
        } else if count > MAX_PLAYERS {
            MAX_PLAYERS
        } else {
            count
        };
        Self(count as u8)
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Hand size dealt at the start of a round.
    pub const fn default_cards_per_player(self) -> usize {
        match self.0 {
            3 => 10,
            _ => 8,
        }
    }

    pub fn contains(self, seat: Seat) -> bool {
        seat.index() < self.get()
    }

    pub fn seats(self) -> impl Iterator<Item = Seat> {
        (0..self.get()).map(Seat::new)
    }
}

impl From<usize> for PlayerCount {
    fn from(count: usize) -> Self {
        Self::clamped(count)
    }
}

impl From<PlayerCount> for usize {
    fn from(count: PlayerCount) -> Self {
        count.get()
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} players", self.0)
    }
}
