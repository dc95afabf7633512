use super::{PolicyKind, log_play_decision};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tute_core::model::card::Card;
use tute_core::{CardChooser, ChoiceContext};

/// Uniform pick among the legal cards, reproducible from its seed.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CardChooser for RandomPolicy {
    fn choose_card(&mut self, ctx: &ChoiceContext<'_>) -> Card {
        // The engine never offers an empty legal set; fall back to the first
        // card in hand so the engine reports the problem instead of us.
        let chosen = ctx
            .legal
            .choose(&mut self.rng)
            .and_then(|&index| ctx.hand.get(index))
            .or_else(|| ctx.hand.first())
            .copied();
        match chosen {
            Some(card) => {
                log_play_decision(ctx, PolicyKind::Random, card);
                card
            }
            None => unreachable!("engine asked for a card from an empty hand"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RandomPolicy;
    use tute_core::model::card::CardId;
    use tute_core::model::player::Seat;
    use tute_core::{CardChooser, ChoiceContext, EngineConfig, TuteEngine};

    fn picks(seed: u64, engine: &mut TuteEngine) -> Vec<CardId> {
        let seat = Seat::new(1);
        let legal = engine.pre_move(seat).unwrap();
        let hand = engine.hand(seat);
        let ctx = ChoiceContext {
            engine,
            seat,
            hand: &hand,
            legal: &legal,
        };
        let mut policy = RandomPolicy::with_seed(seed);
        (0..10).map(|_| policy.choose_card(&ctx).id).collect()
    }

    #[test]
    fn same_seed_same_choices() {
        let mut engine = TuteEngine::with_seed(&EngineConfig::new(2, true), 3).unwrap();
        engine.deal(Seat::new(0)).unwrap();
        assert_eq!(picks(9, &mut engine), picks(9, &mut engine));
    }

    #[test]
    fn choices_stay_legal() {
        let mut engine = TuteEngine::with_seed(&EngineConfig::new(2, true), 3).unwrap();
        engine.deal(Seat::new(0)).unwrap();
        // Settle any trump swap before looking at the hand.
        engine.pre_move(Seat::new(1)).unwrap();
        let hand = engine.hand(Seat::new(1));
        for id in picks(1, &mut engine) {
            assert!(hand.iter().any(|card| card.id == id));
        }
    }
}
