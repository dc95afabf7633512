use crate::model::deck::Deck;
use crate::model::location::{Location, LocationIndex};
use crate::model::player::{PlayerCount, Seat};
use crate::model::round::RoundState;
use serde::{Deserialize, Serialize};

pub const LAST_TRICK_BONUS: u32 = 10;
pub const TRUMP_CANTE_BONUS: u32 = 40;
pub const PLAIN_CANTE_BONUS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub card_points: u32,
    pub last_trick_bonus: u32,
    pub cante_bonus: u32,
}

impl ScoreBreakdown {
    pub fn for_seat(seat: Seat, deck: &Deck, locations: &LocationIndex, round: &RoundState) -> Self {
        let card_points = locations
            .cards_in(Location::Tricks(seat))
            .iter()
            .map(|&id| deck.card(id).points())
            .sum();

        let last_trick_bonus = if round.last_trick_winner() == Some(seat) {
            LAST_TRICK_BONUS
        } else {
            0
        };

        let cante_bonus = round
            .declared_by(seat)
            .map(|suit| {
                if round.trump_suit() == Some(suit) {
                    TRUMP_CANTE_BONUS
                } else {
                    PLAIN_CANTE_BONUS
                }
            })
            .sum();

        Self {
            card_points,
            last_trick_bonus,
            cante_bonus,
        }
    }

    pub fn total(&self) -> u32 {
        self.card_points + self.last_trick_bonus + self.cante_bonus
    }
}

/// Breakdown of every seat at one point of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScores {
    seats: Vec<ScoreBreakdown>,
}

impl RoundScores {
    pub fn collect(
        players: PlayerCount,
        deck: &Deck,
        locations: &LocationIndex,
        round: &RoundState,
    ) -> Self {
        let seats = players
            .seats()
            .map(|seat| ScoreBreakdown::for_seat(seat, deck, locations, round))
            .collect();
        Self { seats }
    }

    pub fn breakdown(&self, seat: Seat) -> Option<&ScoreBreakdown> {
        self.seats.get(seat.index())
    }

    pub fn score(&self, seat: Seat) -> u32 {
        self.breakdown(seat).map(ScoreBreakdown::total).unwrap_or(0)
    }

    pub fn totals(&self) -> Vec<u32> {
        self.seats.iter().map(ScoreBreakdown::total).collect()
    }

    /// Highest total wins; ties go to the lowest seat.
    pub fn leading_player(&self) -> Seat {
        let mut best = Seat::new(0);
        let mut best_total = None;
        for (index, breakdown) in self.seats.iter().enumerate() {
            let total = breakdown.total();
            if best_total.is_none_or(|current| total > current) {
                best = Seat::new(index);
                best_total = Some(total);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundScores, ScoreBreakdown};
    use crate::model::deck::Deck;
    use crate::model::location::{Location, LocationIndex};
    use crate::model::player::{PlayerCount, Seat};
    use crate::model::rank::Rank;
    use crate::model::round::RoundState;
    use crate::model::suit::Suit;

    fn table() -> (Deck, LocationIndex, RoundState) {
        let deck = Deck::for_players(PlayerCount::TWO);
        let locations = LocationIndex::new(PlayerCount::TWO, deck.len());
        let mut round = RoundState::new();
        round.set_trump_suit(Suit::Oros);
        (deck, locations, round)
    }

    #[test]
    fn card_points_come_from_trick_pile() {
        let (deck, mut locations, round) = table();
        let seat = Seat::new(0);
        for rank in [Rank::As, Rank::Tres, Rank::Sota] {
            let card = deck.find(Suit::Copas, rank).unwrap();
            locations.move_card(card.id, Location::Tricks(seat));
        }
        let hand_card = deck.find(Suit::Copas, Rank::Rey).unwrap();
        locations.move_card(hand_card.id, Location::Hand(seat));

        let breakdown = ScoreBreakdown::for_seat(seat, &deck, &locations, &round);
        assert_eq!(breakdown.card_points, 23);
        assert_eq!(breakdown.total(), 23);
    }

    #[test]
    fn bonuses_for_last_trick_and_cantes() {
        let (deck, locations, mut round) = table();
        let seat = Seat::new(1);
        round.declare(Suit::Oros, seat);
        round.declare(Suit::Espadas, seat);
        round.declare(Suit::Copas, Seat::new(0));
        round.set_last_trick_winner(seat);

        let breakdown = ScoreBreakdown::for_seat(seat, &deck, &locations, &round);
        assert_eq!(breakdown.cante_bonus, 60);
        assert_eq!(breakdown.last_trick_bonus, 10);
        assert_eq!(breakdown.total(), 70);

        let other = ScoreBreakdown::for_seat(Seat::new(0), &deck, &locations, &round);
        assert_eq!(other.total(), 20);
    }

    #[test]
    fn leading_player_prefers_lowest_seat_on_ties() {
        let (deck, locations, mut round) = table();
        round.declare(Suit::Copas, Seat::new(0));
        round.declare(Suit::Espadas, Seat::new(1));
        let scores = RoundScores::collect(PlayerCount::TWO, &deck, &locations, &round);
        assert_eq!(scores.totals(), vec![20, 20]);
        assert_eq!(scores.leading_player(), Seat::new(0));
        assert_eq!(scores.score(Seat::new(5)), 0);
    }
}
