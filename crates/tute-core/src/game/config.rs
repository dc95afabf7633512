use crate::error::EngineError;
use crate::model::deck::Deck;
use crate::model::player::{MAX_PLAYERS, MIN_PLAYERS, PlayerCount};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// User-facing engine settings. Every field has a default, so an empty
/// document deserializes to a two-player Habanero table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub player_count: usize,
    pub habanero: bool,
    /// Overrides the hand size dealt for the player count.
    pub cards_per_player: Option<usize>,
    /// Fixed RNG seed; a random one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            habanero: true,
            cards_per_player: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new(player_count: usize, habanero: bool) -> Self {
        Self {
            player_count,
            habanero,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_cards_per_player(mut self, cards: usize) -> Self {
        self.cards_per_player = Some(cards);
        self
    }

    /// Resolve into concrete rules. Player counts outside 2..=4 are clamped;
    /// an impossible hand size is rejected.
    pub fn rules(&self) -> Result<Rules, EngineError> {
        let players = PlayerCount::clamped(self.player_count);
        if players.get() != self.player_count {
            warn!(
                requested = self.player_count,
                clamped = players.get(),
                "player count outside {MIN_PLAYERS}..={MAX_PLAYERS}, clamping"
            );
        }

        let deck_size = Deck::for_players(players).len();
        let cards_per_player = self
            .cards_per_player
            .unwrap_or_else(|| players.default_cards_per_player());

        if cards_per_player == 0 {
            return Err(EngineError::InvalidConfiguration(
                "cards_per_player must be greater than zero".to_string(),
            ));
        }

        if cards_per_player * players.get() > deck_size {
            return Err(EngineError::InvalidConfiguration(format!(
                "{cards_per_player} cards for each of {players} exceeds the {deck_size}-card deck"
            )));
        }

        Ok(Rules {
            players,
            habanero: self.habanero,
            cards_per_player,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Validated rules an engine runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub players: PlayerCount,
    pub habanero: bool,
    pub cards_per_player: usize,
}
