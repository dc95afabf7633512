use crate::model::card::CardId;
use crate::model::player::Seat;
use crate::model::suit::Suit;
use crate::rules::declarations::{Cante, TrumpSwap};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Notable things that happened since the caller last drained events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoundEvent {
    Dealt {
        dealer: Seat,
        trump_suit: Suit,
        trump_card: Option<CardId>,
    },
    TrumpSwapped(TrumpSwap),
    Cante(Cante),
    TrickWon {
        winner: Seat,
        points: u32,
    },
}

impl fmt::Display for RoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundEvent::Dealt {
                dealer, trump_suit, ..
            } => write!(f, "{dealer} dealt, trumps are {trump_suit}"),
            RoundEvent::TrumpSwapped(swap) => write!(
                f,
                "{} swapped {} for {}",
                swap.seat, swap.old_trump, swap.new_trump
            ),
            RoundEvent::Cante(cante) => write!(f, "{} canta {}", cante.seat, cante.suit),
            RoundEvent::TrickWon { winner, points } => {
                write!(f, "{winner} won trick ({points} points)")
            }
        }
    }
}
