#![deny(warnings)]
pub mod error;
pub mod game;
pub mod model;
pub mod rules;

pub use error::EngineError;
pub use game::chooser::{CardChooser, ChoiceContext};
pub use game::config::{EngineConfig, Rules};
pub use game::engine::TuteEngine;
pub use game::events::RoundEvent;
pub use game::view::PlayerView;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "tute"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
