use super::{PolicyKind, log_play_decision};
use tute_core::model::card::Card;
use tute_core::{CardChooser, ChoiceContext};

/// Always plays the earliest legal card in hand order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalPolicy;

impl CardChooser for FirstLegalPolicy {
    fn choose_card(&mut self, ctx: &ChoiceContext<'_>) -> Card {
        let chosen = ctx.legal_cards().next().or_else(|| ctx.hand.first().copied());
        match chosen {
            Some(card) => {
                log_play_decision(ctx, PolicyKind::FirstLegal, card);
                card
            }
            None => unreachable!("engine asked for a card from an empty hand"),
        }
    }
}
