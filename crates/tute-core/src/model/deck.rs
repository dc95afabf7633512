use crate::model::card::{Card, CardId};
use crate::model::player::PlayerCount;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::Rng;
use rand::seq::SliceRandom;

/// Ranks removed from every deck.
const ALWAYS_EXCLUDED: [Rank; 2] = [Rank::Ocho, Rank::Nueve];

/// The card set of one engine. Built once, reshuffled by every deal.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 40 cards for two or four players, 36 for three (the twos are dropped).
    pub fn for_players(players: PlayerCount) -> Self {
        let mut cards = Vec::with_capacity(40);
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                if is_excluded(rank, players) {
                    continue;
                }
                let id = CardId(cards.len() as u8);
                cards.push(Card::new(id, rank, suit));
            }
        }
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Card ids are dense, so every id handed out by this deck resolves.
    pub fn card(&self, id: CardId) -> Card {
        self.cards[id.index()]
    }

    pub fn find(&self, suit: Suit, rank: Rank) -> Option<Card> {
        self.cards
            .iter()
            .copied()
            .find(|card| card.suit == suit && card.rank == rank)
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|card| card.id)
    }

    /// A uniformly random ordering of every card id.
    pub fn shuffled_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<CardId> {
        let mut order: Vec<CardId> = self.ids().collect();
        order.shuffle(rng);
        order
    }
}

fn is_excluded(rank: Rank, players: PlayerCount) -> bool {
    ALWAYS_EXCLUDED.contains(&rank) || (players == PlayerCount::THREE && rank == Rank::Dos)
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::player::PlayerCount;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn deck_sizes_depend_on_player_count() {
        assert_eq!(Deck::for_players(PlayerCount::TWO).len(), 40);
        assert_eq!(Deck::for_players(PlayerCount::THREE).len(), 36);
        assert_eq!(Deck::for_players(PlayerCount::FOUR).len(), 40);
    }

    #[test]
    fn descriptions_are_unique() {
        for players in [PlayerCount::TWO, PlayerCount::THREE, PlayerCount::FOUR] {
            let deck = Deck::for_players(players);
            let descriptions: HashSet<String> =
                deck.cards().iter().map(|card| card.description()).collect();
            assert_eq!(descriptions.len(), deck.len());
        }
    }

    #[test]
    fn ids_are_dense_and_match_positions() {
        let deck = Deck::for_players(PlayerCount::FOUR);
        for (index, card) in deck.cards().iter().enumerate() {
            assert_eq!(card.id.index(), index);
            assert_eq!(deck.card(card.id), *card);
        }
    }

    #[test]
    fn excluded_ranks_are_missing() {
        let deck = Deck::for_players(PlayerCount::THREE);
        for suit in Suit::ALL {
            assert!(deck.find(suit, Rank::Ocho).is_none());
            assert!(deck.find(suit, Rank::Nueve).is_none());
            assert!(deck.find(suit, Rank::Dos).is_none());
            assert!(deck.find(suit, Rank::Siete).is_some());
        }
        let deck = Deck::for_players(PlayerCount::TWO);
        assert!(deck.find(Suit::Copas, Rank::Dos).is_some());
    }

    #[test]
    fn shuffled_order_is_a_permutation() {
        let deck = Deck::for_players(PlayerCount::TWO);
        let mut rng = StdRng::seed_from_u64(7);
        let mut order = deck.shuffled_order(&mut rng);
        assert_eq!(order.len(), deck.len());
        order.sort();
        assert_eq!(order, deck.ids().collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck = Deck::for_players(PlayerCount::TWO);
        let a = deck.shuffled_order(&mut StdRng::seed_from_u64(42));
        let b = deck.shuffled_order(&mut StdRng::seed_from_u64(42));
        let c = deck.shuffled_order(&mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
