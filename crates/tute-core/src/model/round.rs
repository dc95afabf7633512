use crate::model::card::CardId;
use crate::model::player::Seat;
use crate::model::suit::{Suit, SuitTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-round bookkeeping that does not live in card locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    led_suit: Option<Suit>,
    trump_suit: Option<Suit>,
    shown: BTreeSet<CardId>,
    cantes: SuitTable<Option<Seat>>,
    last_trick_winner: Option<Seat>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything a deal starts from scratch. The trump suit is kept
    /// until the dealer assigns the new one.
    pub fn reset(&mut self) {
        self.led_suit = None;
        self.shown.clear();
        self.cantes = SuitTable::default();
        self.last_trick_winner = None;
    }

    pub fn led_suit(&self) -> Option<Suit> {
        self.led_suit
    }

    pub fn set_led_suit(&mut self, suit: Option<Suit>) {
        self.led_suit = suit;
    }

    pub fn trump_suit(&self) -> Option<Suit> {
        self.trump_suit
    }

    pub fn set_trump_suit(&mut self, suit: Suit) {
        self.trump_suit = Some(suit);
    }

    pub fn shown(&self) -> &BTreeSet<CardId> {
        &self.shown
    }

    pub fn is_shown(&self, id: CardId) -> bool {
        self.shown.contains(&id)
    }

    pub fn show(&mut self, id: CardId) {
        self.shown.insert(id);
    }

    pub fn cantes(&self) -> &SuitTable<Option<Seat>> {
        &self.cantes
    }

    pub fn cante(&self, suit: Suit) -> Option<Seat> {
        self.cantes[suit]
    }

    pub fn has_any_cante(&self) -> bool {
        self.cantes.iter().any(|(_, seat)| seat.is_some())
    }

    /// Record a declaration. A suit can only be declared once per round;
    /// returns `false` when it already was.
    pub fn declare(&mut self, suit: Suit, seat: Seat) -> bool {
        if self.cantes[suit].is_some() {
            return false;
        }
        self.cantes[suit] = Some(seat);
        true
    }

    pub fn declared_by(&self, seat: Seat) -> impl Iterator<Item = Suit> + '_ {
        self.cantes
            .iter()
            .filter(move |(_, declarer)| **declarer == Some(seat))
            .map(|(suit, _)| suit)
    }

    pub fn last_trick_winner(&self) -> Option<Seat> {
        self.last_trick_winner
    }

    pub fn set_last_trick_winner(&mut self, seat: Seat) {
        self.last_trick_winner = Some(seat);
    }
}
