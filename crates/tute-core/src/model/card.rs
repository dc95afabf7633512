use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable identifier of a card within one engine's deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u8);

impl CardId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(id: CardId, rank: Rank, suit: Suit) -> Self {
        Self { id, suit, rank }
    }

    pub const fn trick_ranking(self) -> u8 {
        self.rank.trick_ranking()
    }

    pub const fn points(self) -> u32 {
        self.rank.points()
    }

    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    /// Lower trick-ranking wins when both cards share a suit.
    pub const fn outranks(self, other: Card) -> bool {
        self.trick_ranking() < other.trick_ranking()
    }

    pub fn description(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} de {}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardId, Rank, Suit};

    #[test]
    fn description_names_rank_and_suit() {
        let card = Card::new(CardId(0), Rank::As, Suit::Oros);
        assert_eq!(card.description(), "el as de oros");
        let card = Card::new(CardId(9), Rank::Sota, Suit::Bastos);
        assert_eq!(card.to_string(), "la sota de bastos");
    }

    #[test]
    fn three_outranks_king_but_not_ace() {
        let ace = Card::new(CardId(0), Rank::As, Suit::Copas);
        let three = Card::new(CardId(1), Rank::Tres, Suit::Copas);
        let king = Card::new(CardId(2), Rank::Rey, Suit::Copas);
        assert!(three.outranks(king));
        assert!(!three.outranks(ace));
        assert!(ace.outranks(three));
    }

    #[test]
    fn points_follow_rank() {
        let card = Card::new(CardId(3), Rank::Caballo, Suit::Espadas);
        assert_eq!(card.points(), 3);
        assert_eq!(card.value(), 11);
    }
}
