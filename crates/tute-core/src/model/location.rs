use crate::model::card::CardId;
use crate::model::player::{PlayerCount, Seat};
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// Every place a card can be during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seat", rename_all = "snake_case")]
pub enum Location {
    Unknown,
    Pile,
    Trump,
    Hand(Seat),
    Tricks(Seat),
    FaceUp(Seat),
}

impl Location {
    /// Number of distinct codes for a table of `players`.
    pub const fn code_count(players: PlayerCount) -> usize {
        3 + 3 * players.get()
    }

    /// Stable integer code, suitable for one-hot encoding.
    pub const fn code(self) -> usize {
        match self {
            Location::Unknown => 0,
            Location::Pile => 1,
            Location::Trump => 2,
            Location::Hand(seat) => 3 * seat.index() + 3,
            Location::Tricks(seat) => 3 * seat.index() + 4,
            Location::FaceUp(seat) => 3 * seat.index() + 5,
        }
    }

    pub const fn from_code(code: usize) -> Self {
        match code {
            0 => Location::Unknown,
            1 => Location::Pile,
            2 => Location::Trump,
            _ => {
                let seat = Seat::new((code - 3) / 3);
                match (code - 3) % 3 {
                    0 => Location::Hand(seat),
                    1 => Location::Tricks(seat),
                    _ => Location::FaceUp(seat),
                }
            }
        }
    }

    pub const fn seat(self) -> Option<Seat> {
        match self {
            Location::Hand(seat) | Location::Tricks(seat) | Location::FaceUp(seat) => Some(seat),
            Location::Unknown | Location::Pile | Location::Trump => None,
        }
    }

    pub const fn is_hand(self) -> bool {
        matches!(self, Location::Hand(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => f.write_str("unknown"),
            Location::Pile => f.write_str("pile"),
            Location::Trump => f.write_str("trump"),
            Location::Hand(seat) => write!(f, "{seat} hand"),
            Location::Tricks(seat) => write!(f, "{seat} tricks"),
            Location::FaceUp(seat) => write!(f, "{seat} face up"),
        }
    }
}

/// Card-to-location map with a reverse index from location to cards.
///
/// Each card sits in exactly one location. The reverse index keeps the
/// order in which cards arrived, so the pile preserves the shuffled order
/// and hands keep the order they were dealt in.
#[derive(Debug, Clone)]
pub struct LocationIndex {
    by_card: Vec<Location>,
    slots: Vec<Vec<CardId>>,
}

impl LocationIndex {
    /// Every card starts on the pile, in id order.
    pub fn new(players: PlayerCount, card_count: usize) -> Self {
        let mut slots = vec![Vec::new(); Location::code_count(players)];
        slots[Location::Pile.code()] = (0..card_count).map(|id| CardId(id as u8)).collect();
        Self {
            by_card: vec![Location::Pile; card_count],
            slots,
        }
    }

    pub fn card_count(&self) -> usize {
        self.by_card.len()
    }

    pub fn location_of(&self, id: CardId) -> Location {
        self.by_card[id.index()]
    }

    pub fn cards_in(&self, location: Location) -> &[CardId] {
        self.slots
            .get(location.code())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count_in(&self, location: Location) -> usize {
        self.cards_in(location).len()
    }

    /// Move a card, returning where it came from.
    pub fn move_card(&mut self, id: CardId, to: Location) -> Location {
        let from = self.by_card[id.index()];
        if from == to {
            return from;
        }

        let origin = &mut self.slots[from.code()];
        if let Some(position) = origin.iter().position(|&card| card == id) {
            origin.remove(position);
        }
        self.slots[to.code()].push(id);
        self.by_card[id.index()] = to;

        event!(
            target: "tute_core::move",
            Level::TRACE,
            card = id.0,
            from = %from,
            to = %to,
        );
        from
    }

    /// Put every card back on the pile in the given order.
    pub fn reset(&mut self, order: &[CardId]) {
        debug_assert_eq!(order.len(), self.by_card.len());
        for slot in &mut self.slots {
            slot.clear();
        }
        for location in &mut self.by_card {
            *location = Location::Pile;
        }
        self.slots[Location::Pile.code()].extend_from_slice(order);
    }

    /// Copy of the id-to-location map, indexed by card id.
    pub fn snapshot(&self) -> Vec<Location> {
        self.by_card.clone()
    }
}
