use crate::game::engine::TuteEngine;
use crate::model::card::Card;
use crate::model::player::Seat;

/// Everything a chooser sees when asked for a card.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceContext<'a> {
    pub engine: &'a TuteEngine,
    pub seat: Seat,
    /// The seat's hand in dealt order.
    pub hand: &'a [Card],
    /// Indices into `hand` that may be played.
    pub legal: &'a [usize],
}

impl<'a> ChoiceContext<'a> {
    pub fn legal_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.legal.iter().filter_map(|&index| self.hand.get(index).copied())
    }

    pub fn is_legal(&self, card: Card) -> bool {
        self.legal_cards().any(|legal| legal.id == card.id)
    }
}

/// Picks the card a seat plays. Returning a card outside the legal set is
/// rejected by the engine.
pub trait CardChooser {
    fn choose_card(&mut self, ctx: &ChoiceContext<'_>) -> Card;
}

impl<F> CardChooser for F
where
    F: FnMut(&ChoiceContext<'_>) -> Card,
{
    fn choose_card(&mut self, ctx: &ChoiceContext<'_>) -> Card {
        self(ctx)
    }
}
