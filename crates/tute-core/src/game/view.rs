use crate::model::card::CardId;
use crate::model::location::Location;
use crate::model::player::{PlayerCount, Seat};
use crate::model::round::RoundState;
use crate::model::suit::{Suit, SuitTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What one seat is allowed to know about the table.
///
/// The pile is hidden, and so are opponents' hand cards unless they were
/// shown by a swap, a cante or the exhausted-deck deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: Seat,
    pub players: PlayerCount,
    pub led_suit: Option<Suit>,
    pub trump_suit: Option<Suit>,
    pub follow_suit: bool,
    pub shown: BTreeSet<CardId>,
    pub cantes: SuitTable<Option<Seat>>,
    /// Location of every card, indexed by card id.
    pub locations: Vec<Location>,
}

impl PlayerView {
    pub(crate) fn build(
        seat: Seat,
        players: PlayerCount,
        snapshot: Vec<Location>,
        round: &RoundState,
        follow_suit: bool,
    ) -> Self {
        let locations = snapshot
            .into_iter()
            .enumerate()
            .map(|(index, location)| {
                let id = CardId(index as u8);
                match location {
                    Location::Pile => Location::Unknown,
                    Location::Hand(owner) if owner != seat && !round.is_shown(id) => {
                        Location::Unknown
                    }
                    visible => visible,
                }
            })
            .collect();

        Self {
            seat,
            players,
            led_suit: round.led_suit(),
            trump_suit: round.trump_suit(),
            follow_suit,
            shown: round.shown().clone(),
            cantes: *round.cantes(),
            locations,
        }
    }

    pub fn location_of(&self, id: CardId) -> Option<Location> {
        self.locations.get(id.index()).copied()
    }

    /// Integer location codes, one per card, for one-hot encoders.
    pub fn location_codes(&self) -> Vec<usize> {
        self.locations.iter().map(|location| location.code()).collect()
    }

    pub fn unknown_count(&self) -> usize {
        self.locations
            .iter()
            .filter(|&&location| location == Location::Unknown)
            .count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
