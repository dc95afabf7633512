mod first_legal;
mod random;

pub use first_legal::FirstLegalPolicy;
pub use random::RandomPolicy;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{Level, event};
use tute_core::model::card::Card;
use tute_core::{CardChooser, ChoiceContext};

/// Choosers a table can be seated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    FirstLegal,
}

impl PolicyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::FirstLegal => "first_legal",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boxed chooser for `kind`. `seed` only matters for the random policy.
pub fn build_policy(kind: PolicyKind, seed: u64) -> Box<dyn CardChooser + Send> {
    match kind {
        PolicyKind::Random => Box::new(RandomPolicy::with_seed(seed)),
        PolicyKind::FirstLegal => Box::new(FirstLegalPolicy),
    }
}

fn log_play_decision(ctx: &ChoiceContext<'_>, kind: PolicyKind, chosen: Card) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let legal_preview = if ctx.legal.len() <= 6 {
        ctx.legal_cards()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", ctx.legal.len())
    };

    event!(
        target: "tute_bot::play",
        Level::INFO,
        seat = %ctx.seat,
        policy = %kind,
        hand_size = ctx.hand.len(),
        legal_count = ctx.legal.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        follow_suit = ctx.engine.follow_suit(),
        trick_cards = ctx.engine.face_up().len(),
    );
}
