use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::suit::Suit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

impl Play {
    pub const fn new(seat: Seat, card: Card) -> Self {
        Self { seat, card }
    }
}

/// Winner of a complete trick.
///
/// Any trump beats every non-trump card; among trumps, and failing that
/// among cards of the led suit, the lowest trick-ranking wins. Cards of any
/// other suit never win. Returns `None` only when `plays` is empty.
pub fn resolve_trick(plays: &[Play], led_suit: Suit, trump_suit: Suit) -> Option<Seat> {
    let mut best_led: Option<Play> = None;
    let mut best_trump: Option<Play> = None;

    for play in plays {
        if play.card.suit == trump_suit {
            if best_trump.is_none_or(|best| play.card.outranks(best.card)) {
                best_trump = Some(*play);
            }
        } else if play.card.suit == led_suit
            && best_led.is_none_or(|best| play.card.outranks(best.card))
        {
            best_led = Some(*play);
        }
    }

    best_trump.or(best_led).map(|play| play.seat)
}

/// Total points on the table.
pub fn points_in(plays: &[Play]) -> u32 {
    plays.iter().map(|play| play.card.points()).sum()
}

#[cfg(test)]
mod tests {
    use super::{Play, points_in, resolve_trick};
    use crate::model::card::{Card, CardId};
    use crate::model::player::Seat;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn play(seat: usize, rank: Rank, suit: Suit) -> Play {
        Play::new(Seat::new(seat), Card::new(CardId(seat as u8), rank, suit))
    }

    #[test]
    fn highest_led_card_wins_without_trumps() {
        let plays = [
            play(0, Rank::Rey, Suit::Oros),
            play(1, Rank::Tres, Suit::Oros),
            play(2, Rank::As, Suit::Copas),
        ];
        assert_eq!(resolve_trick(&plays, Suit::Oros, Suit::Bastos), Some(Seat::new(1)));
    }

    #[test]
    fn any_trump_beats_best_led_card() {
        let plays = [
            play(0, Rank::Tres, Suit::Oros),
            play(1, Rank::Dos, Suit::Bastos),
        ];
        assert_eq!(resolve_trick(&plays, Suit::Oros, Suit::Bastos), Some(Seat::new(1)));
    }

    #[test]
    fn trump_played_before_led_card_in_seat_order_still_wins() {
        // Seat 1 led oros, seat 0 trumped with bastos.
        let plays = [
            play(0, Rank::Cuatro, Suit::Bastos),
            play(1, Rank::As, Suit::Oros),
            play(2, Rank::Tres, Suit::Oros),
        ];
        assert_eq!(resolve_trick(&plays, Suit::Oros, Suit::Bastos), Some(Seat::new(0)));
    }

    #[test]
    fn best_trump_wins_among_trumps() {
        let plays = [
            play(0, Rank::As, Suit::Oros),
            play(1, Rank::Sota, Suit::Bastos),
            play(2, Rank::Caballo, Suit::Bastos),
            play(3, Rank::Siete, Suit::Bastos),
        ];
        assert_eq!(resolve_trick(&plays, Suit::Oros, Suit::Bastos), Some(Seat::new(2)));
    }

    #[test]
    fn led_suit_equal_to_trump_suit() {
        let plays = [
            play(0, Rank::Siete, Suit::Espadas),
            play(1, Rank::Rey, Suit::Espadas),
        ];
        assert_eq!(resolve_trick(&plays, Suit::Espadas, Suit::Espadas), Some(Seat::new(1)));
    }

    #[test]
    fn off_suit_cards_never_win() {
        let plays = [
            play(0, Rank::Dos, Suit::Copas),
            play(1, Rank::As, Suit::Espadas),
        ];
        assert_eq!(resolve_trick(&plays, Suit::Copas, Suit::Oros), Some(Seat::new(0)));
        assert_eq!(resolve_trick(&[], Suit::Copas, Suit::Oros), None);
    }

    #[test]
    fn points_sum_cards_on_table() {
        let plays = [
            play(0, Rank::As, Suit::Oros),
            play(1, Rank::Rey, Suit::Oros),
        ];
        assert_eq!(points_in(&plays), 15);
    }
}
