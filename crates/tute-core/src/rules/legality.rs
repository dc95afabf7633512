//! Which cards of a hand may be played onto the current trick.

use crate::model::card::Card;
use crate::model::player::PlayerCount;
use crate::model::suit::Suit;

/// Whether players must follow suit right now.
///
/// Plain Tute always requires it. Habanero only does once fewer cards are
/// left to draw (pile plus the trump slot) than there are players, i.e. once
/// hands are no longer replenished.
pub fn follow_suit_required(habanero: bool, draw_remaining: usize, players: PlayerCount) -> bool {
    !habanero || draw_remaining < players.get()
}

/// Indices into `hand` that may legally be played.
///
/// When suit must be followed and a card has been led, the first non-empty
/// tier wins:
/// 1. led-suit cards that beat the best led-suit card on the table,
/// 2. any led-suit card,
/// 3. trumps that beat the best trump on the table,
/// 4. any trump,
/// 5. anything.
///
/// The result is never empty for a non-empty hand.
pub fn legal_cards(
    face_up: &[Card],
    hand: &[Card],
    led_suit: Option<Suit>,
    trump_suit: Suit,
    follow_suit: bool,
) -> Vec<usize> {
    let everything = || (0..hand.len()).collect::<Vec<_>>();

    let led_suit = match led_suit {
        Some(suit) if follow_suit && !face_up.is_empty() => suit,
        _ => return everything(),
    };

    let best_led = best_ranking(face_up, led_suit);
    let best_trump = best_ranking(face_up, trump_suit);
    let tiers: [&dyn Fn(&Card) -> bool; 4] = [
        &|card: &Card| card.suit == led_suit && beats(card, best_led),
        &|card: &Card| card.suit == led_suit,
        &|card: &Card| card.suit == trump_suit && beats(card, best_trump),
        &|card: &Card| card.suit == trump_suit,
    ];

    for tier in tiers {
        let matching = select(hand, tier);
        if !matching.is_empty() {
            return matching;
        }
    }

    everything()
}

/// Lowest trick-ranking among face-up cards of `suit`.
fn best_ranking(face_up: &[Card], suit: Suit) -> Option<u8> {
    face_up
        .iter()
        .filter(|card| card.suit == suit)
        .map(|card| card.trick_ranking())
        .min()
}

/// With nothing of the suit on the table, any card of it beats the table.
fn beats(card: &Card, best: Option<u8>) -> bool {
    best.is_none_or(|ranking| card.trick_ranking() < ranking)
}

fn select(hand: &[Card], predicate: &dyn Fn(&Card) -> bool) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, card)| predicate(card))
        .map(|(index, _)| index)
        .collect()
}
