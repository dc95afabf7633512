//! Scripted automatic declarations: trump-card swap and cantar.

use crate::model::card::{Card, CardId};
use crate::model::deck::Deck;
use crate::model::location::{Location, LocationIndex};
use crate::model::player::{PlayerCount, Seat};
use crate::model::rank::Rank;
use crate::model::round::RoundState;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Rank values from this one up (sota, caballo, rey) are exchanged for the 7.
const HIGH_TRUMP_VALUE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrumpSwap {
    pub seat: Seat,
    /// Card that left the trump slot for the seat's hand.
    pub old_trump: Card,
    /// Card that left the hand for the trump slot.
    pub new_trump: Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cante {
    pub seat: Seat,
    pub suit: Suit,
    pub caballo: CardId,
    pub rey: CardId,
}

/// Exchange the face-up trump card with the 7 or the 2 of trumps.
///
/// A sota, caballo or rey in the trump slot is taken by whoever holds the 7;
/// then, looking at whatever card is in the slot now, anything below the
/// sota (the as included) is taken by whoever holds the 2. Both exchanges
/// can happen in one call. The old trump card becomes shown.
pub fn swap_trump(deck: &Deck, locations: &mut LocationIndex, round: &mut RoundState) -> Vec<TrumpSwap> {
    let mut swaps = Vec::new();
    let Some(trump_suit) = round.trump_suit() else {
        return swaps;
    };

    if let Some(trump) =
        current_trump(deck, locations).filter(|card| card.value() >= HIGH_TRUMP_VALUE)
    {
        swaps.extend(exchange(deck, locations, round, trump, trump_suit, Rank::Siete));
    }

    if let Some(trump) =
        current_trump(deck, locations).filter(|card| card.value() < HIGH_TRUMP_VALUE)
    {
        swaps.extend(exchange(deck, locations, round, trump, trump_suit, Rank::Dos));
    }

    swaps
}

fn current_trump(deck: &Deck, locations: &LocationIndex) -> Option<Card> {
    locations
        .cards_in(Location::Trump)
        .first()
        .map(|&id| deck.card(id))
}

fn exchange(
    deck: &Deck,
    locations: &mut LocationIndex,
    round: &mut RoundState,
    trump: Card,
    trump_suit: Suit,
    rank: Rank,
) -> Option<TrumpSwap> {
    // The 2 does not exist in the three-player deck.
    let replacement = deck.find(trump_suit, rank)?;
    let Location::Hand(seat) = locations.location_of(replacement.id) else {
        return None;
    };

    locations.move_card(replacement.id, Location::Trump);
    locations.move_card(trump.id, Location::Hand(seat));
    round.show(trump.id);

    Some(TrumpSwap {
        seat,
        old_trump: trump,
        new_trump: replacement,
    })
}

/// Two players with nothing left to draw no longer declare.
pub fn cantar_skipped(players: PlayerCount, locations: &LocationIndex) -> bool {
    players == PlayerCount::TWO
        && locations.count_in(Location::Pile) == 0
        && locations.count_in(Location::Trump) == 0
}

/// Greedy declaration for the winner of a trick.
///
/// The trump suit can only be declared while nothing has been declared yet;
/// otherwise the remaining suits are scanned in `Suit::ALL` order and the
/// first undeclared one whose caballo and rey are both in hand is taken.
/// At most one declaration per call.
pub fn cantar(seat: Seat, deck: &Deck, locations: &LocationIndex, round: &mut RoundState) -> Option<Cante> {
    let trump_suit = round.trump_suit()?;
    let hand = Location::Hand(seat);

    let pair_in_hand = |suit: Suit| -> Option<(CardId, CardId)> {
        let caballo = deck.find(suit, Rank::Caballo)?;
        let rey = deck.find(suit, Rank::Rey)?;
        (locations.location_of(caballo.id) == hand && locations.location_of(rey.id) == hand)
            .then_some((caballo.id, rey.id))
    };

    let trump_pair = if round.has_any_cante() {
        None
    } else {
        pair_in_hand(trump_suit).map(|pair| (trump_suit, pair))
    };
    let suit_and_pair = trump_pair.or_else(|| {
        Suit::ALL
            .into_iter()
            .filter(|&suit| suit != trump_suit && round.cante(suit).is_none())
            .find_map(|suit| pair_in_hand(suit).map(|pair| (suit, pair)))
    });

    let (suit, (caballo, rey)) = suit_and_pair?;
    round.declare(suit, seat);
    round.show(caballo);
    round.show(rey);

    Some(Cante {
        seat,
        suit,
        caballo,
        rey,
    })
}

#[cfg(test)]
mod tests {
    use super::{cantar, cantar_skipped, swap_trump};
    use crate::model::deck::Deck;
    use crate::model::location::{Location, LocationIndex};
    use crate::model::player::{PlayerCount, Seat};
    use crate::model::rank::Rank;
    use crate::model::round::RoundState;
    use crate::model::suit::Suit;

    struct Table {
        deck: Deck,
        locations: LocationIndex,
        round: RoundState,
    }

    impl Table {
        fn new(players: PlayerCount, trump_suit: Suit) -> Self {
            let deck = Deck::for_players(players);
            let locations = LocationIndex::new(players, deck.len());
            let mut round = RoundState::new();
            round.set_trump_suit(trump_suit);
            Self {
                deck,
                locations,
                round,
            }
        }

        fn place(&mut self, suit: Suit, rank: Rank, location: Location) {
            let card = self.deck.find(suit, rank).unwrap();
            self.locations.move_card(card.id, location);
        }

        fn location(&self, suit: Suit, rank: Rank) -> Location {
            self.locations.location_of(self.deck.find(suit, rank).unwrap().id)
        }

        fn swap(&mut self) -> usize {
            swap_trump(&self.deck, &mut self.locations, &mut self.round).len()
        }
    }

    #[test]
    fn seven_replaces_face_card_trump() {
        let mut table = Table::new(PlayerCount::TWO, Suit::Bastos);
        let hand = Location::Hand(Seat::new(1));
        table.place(Suit::Bastos, Rank::Rey, Location::Trump);
        table.place(Suit::Bastos, Rank::Siete, hand);

        assert_eq!(table.swap(), 1);
        assert_eq!(table.location(Suit::Bastos, Rank::Siete), Location::Trump);
        assert_eq!(table.location(Suit::Bastos, Rank::Rey), hand);
        let rey = table.deck.find(Suit::Bastos, Rank::Rey).unwrap();
        assert!(table.round.is_shown(rey.id));
    }

    #[test]
    fn two_replaces_low_trump() {
        let mut table = Table::new(PlayerCount::FOUR, Suit::Oros);
        let hand = Location::Hand(Seat::new(3));
        table.place(Suit::Oros, Rank::As, Location::Trump);
        table.place(Suit::Oros, Rank::Dos, hand);

        assert_eq!(table.swap(), 1);
        assert_eq!(table.location(Suit::Oros, Rank::Dos), Location::Trump);
        assert_eq!(table.location(Suit::Oros, Rank::As), hand);
    }

    #[test]
    fn both_swaps_can_fire_in_one_call() {
        let mut table = Table::new(PlayerCount::TWO, Suit::Copas);
        table.place(Suit::Copas, Rank::Caballo, Location::Trump);
        table.place(Suit::Copas, Rank::Siete, Location::Hand(Seat::new(0)));
        table.place(Suit::Copas, Rank::Dos, Location::Hand(Seat::new(1)));

        assert_eq!(table.swap(), 2);
        assert_eq!(table.location(Suit::Copas, Rank::Dos), Location::Trump);
        assert_eq!(table.location(Suit::Copas, Rank::Caballo), Location::Hand(Seat::new(0)));
        assert_eq!(table.location(Suit::Copas, Rank::Siete), Location::Hand(Seat::new(1)));
    }

    #[test]
    fn no_swap_when_card_is_not_in_a_hand() {
        let mut table = Table::new(PlayerCount::TWO, Suit::Copas);
        table.place(Suit::Copas, Rank::Sota, Location::Trump);
        table.place(Suit::Copas, Rank::Siete, Location::Tricks(Seat::new(0)));
        // The 2 is still on the pile.
        assert_eq!(table.swap(), 0);
        assert_eq!(table.location(Suit::Copas, Rank::Sota), Location::Trump);
    }

    #[test]
    fn no_swap_without_trump_card() {
        let mut table = Table::new(PlayerCount::TWO, Suit::Copas);
        table.place(Suit::Copas, Rank::Siete, Location::Hand(Seat::new(0)));
        assert_eq!(table.swap(), 0);
    }

    #[test]
    fn three_player_deck_has_no_two_to_swap() {
        let mut table = Table::new(PlayerCount::THREE, Suit::Espadas);
        table.place(Suit::Espadas, Rank::Cuatro, Location::Trump);
        assert_eq!(table.swap(), 0);
    }

    #[test]
    fn trump_pair_is_declared_first() {
        let mut table = Table::new(PlayerCount::TWO, Suit::Espadas);
        let seat = Seat::new(0);
        for suit in [Suit::Oros, Suit::Espadas] {
            table.place(suit, Rank::Caballo, Location::Hand(seat));
            table.place(suit, Rank::Rey, Location::Hand(seat));
        }

        let cante = cantar(seat, &table.deck, &table.locations, &mut table.round).unwrap();
        assert_eq!(cante.suit, Suit::Espadas);
        assert_eq!(table.round.cante(Suit::Espadas), Some(seat));
        assert!(table.round.is_shown(cante.caballo));
        assert!(table.round.is_shown(cante.rey));
        assert_eq!(table.round.cante(Suit::Oros), None);

        let second = cantar(seat, &table.deck, &table.locations, &mut table.round).unwrap();
        assert_eq!(second.suit, Suit::Oros);
        assert!(cantar(seat, &table.deck, &table.locations, &mut table.round).is_none());
    }

    #[test]
    fn trump_pair_is_lost_once_anything_was_declared() {
        let mut table = Table::new(PlayerCount::TWO, Suit::Espadas);
        table.round.declare(Suit::Copas, Seat::new(1));
        let seat = Seat::new(0);
        table.place(Suit::Espadas, Rank::Caballo, Location::Hand(seat));
        table.place(Suit::Espadas, Rank::Rey, Location::Hand(seat));

        assert!(cantar(seat, &table.deck, &table.locations, &mut table.round).is_none());
        assert_eq!(table.round.cante(Suit::Espadas), None);
    }

    #[test]
    fn plain_suits_scan_in_fixed_order() {
        let mut table = Table::new(PlayerCount::FOUR, Suit::Oros);
        let seat = Seat::new(2);
        for suit in [Suit::Bastos, Suit::Copas] {
            table.place(suit, Rank::Caballo, Location::Hand(seat));
            table.place(suit, Rank::Rey, Location::Hand(seat));
        }
        let cante = cantar(seat, &table.deck, &table.locations, &mut table.round).unwrap();
        assert_eq!(cante.suit, Suit::Copas);
    }

    #[test]
    fn half_pair_is_not_declared() {
        let mut table = Table::new(PlayerCount::TWO, Suit::Oros);
        let seat = Seat::new(0);
        table.place(Suit::Copas, Rank::Caballo, Location::Hand(seat));
        table.place(Suit::Copas, Rank::Rey, Location::Tricks(seat));
        assert!(cantar(seat, &table.deck, &table.locations, &mut table.round).is_none());
    }

    #[test]
    fn skip_only_for_two_players_with_nothing_to_draw() {
        let players = PlayerCount::TWO;
        let deck = Deck::for_players(players);
        let mut locations = LocationIndex::new(players, deck.len());
        assert!(!cantar_skipped(players, &locations));

        for id in deck.ids() {
            locations.move_card(id, Location::Tricks(Seat::new(0)));
        }
        assert!(cantar_skipped(players, &locations));

        let deck = Deck::for_players(PlayerCount::THREE);
        let mut locations = LocationIndex::new(PlayerCount::THREE, deck.len());
        for id in deck.ids() {
            locations.move_card(id, Location::Tricks(Seat::new(0)));
        }
        assert!(!cantar_skipped(PlayerCount::THREE, &locations));
    }
}
