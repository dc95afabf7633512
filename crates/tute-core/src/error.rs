use crate::model::card::CardId;
use crate::model::player::Seat;
use thiserror::Error;

/// Contract violations surfaced by the engine. Operations that fail leave
/// the round untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("seat index {seat} is out of range for {player_count} players")]
    InvalidSeat { seat: usize, player_count: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no round has been dealt yet")]
    NotDealt,
    #[error("card {card} is not in the hand of {seat}")]
    CardNotInHand { seat: Seat, card: CardId },
    #[error("card {card} is not a legal play for {seat}")]
    IllegalCard { seat: Seat, card: CardId },
    #[error("{seat} has already played to this trick")]
    AlreadyPlayed { seat: Seat },
    #[error("{seat} must move but has no legal cards")]
    NoLegalCards { seat: Seat },
    #[error("trick needs {required} face-up cards but only {face_up} are on the table")]
    IncompleteTrick { face_up: usize, required: usize },
}
