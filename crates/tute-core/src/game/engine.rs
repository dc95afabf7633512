use crate::error::EngineError;
use crate::game::chooser::{CardChooser, ChoiceContext};
use crate::game::config::{EngineConfig, Rules};
use crate::game::events::RoundEvent;
use crate::game::view::PlayerView;
use crate::model::card::{Card, CardId};
use crate::model::deck::Deck;
use crate::model::location::{Location, LocationIndex};
use crate::model::player::{PlayerCount, Seat};
use crate::model::round::RoundState;
use crate::model::score::{RoundScores, ScoreBreakdown};
use crate::model::suit::Suit;
use crate::model::trick::{Play, points_in, resolve_trick};
use crate::rules::declarations::{cantar, cantar_skipped, swap_trump};
use crate::rules::legality::{follow_suit_required, legal_cards};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::mem;
use tracing::{Level, debug, event, info};

/// Turn controller for one table. Owns the deck, card locations, round
/// bookkeeping and the shuffling RNG.
#[derive(Debug, Clone)]
pub struct TuteEngine {
    rules: Rules,
    deck: Deck,
    locations: LocationIndex,
    round: RoundState,
    rng: StdRng,
    seed: u64,
    events: Vec<RoundEvent>,
    current: Option<Seat>,
}

impl TuteEngine {
    /// Build an engine from config, drawing a random seed unless one is set.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: &EngineConfig, seed: u64) -> Result<Self, EngineError> {
        let rules = config.rules()?;
        let deck = Deck::for_players(rules.players);
        let locations = LocationIndex::new(rules.players, deck.len());
        debug!(
            players = rules.players.get(),
            habanero = rules.habanero,
            cards_per_player = rules.cards_per_player,
            deck = deck.len(),
            seed,
            "engine created"
        );
        Ok(Self {
            rules,
            deck,
            locations,
            round: RoundState::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            events: Vec::new(),
            current: None,
        })
    }

    /// Shuffle and deal a new round. Dealing starts left of `dealer`, who
    /// also leads the first trick.
    pub fn deal(&mut self, dealer: Seat) -> Result<(), EngineError> {
        self.check_seat(dealer)?;
        let players = self.rules.players;
        let order = self.deck.shuffled_order(&mut self.rng);

        self.locations.reset(&order);
        self.round.reset();
        self.events.clear();

        let first = dealer.next(players);
        let dealt = self.rules.cards_per_player * players.get();
        for (index, &id) in order.iter().take(dealt).enumerate() {
            self.locations
                .move_card(id, Location::Hand(first.offset(index, players)));
        }

        let trump_card = order.get(dealt).copied();
        let trump_suit = match trump_card {
            Some(id) => {
                self.locations.move_card(id, Location::Trump);
                self.deck.card(id).suit
            }
            None => {
                // Nothing left to turn up: the last card dealt names trumps.
                let id = order[dealt - 1];
                self.round.show(id);
                self.deck.card(id).suit
            }
        };
        self.round.set_trump_suit(trump_suit);
        self.current = Some(first);

        info!(
            target: "tute_core::round",
            dealer = %dealer,
            trump = %trump_suit,
            trump_card = ?trump_card.map(|id| self.deck.card(id).description()),
            pile = self.locations.count_in(Location::Pile),
            "round dealt"
        );
        self.events.push(RoundEvent::Dealt {
            dealer,
            trump_suit,
            trump_card,
        });
        Ok(())
    }

    /// Prepare `seat` to move: run the trump swap under Habanero and return
    /// the legal indices into the seat's hand.
    pub fn pre_move(&mut self, seat: Seat) -> Result<Vec<usize>, EngineError> {
        self.ensure_dealt()?;
        self.check_seat(seat)?;
        if self.locations.count_in(Location::Hand(seat)) == 0 {
            return Err(EngineError::NoLegalCards { seat });
        }

        if self.rules.habanero {
            for swap in swap_trump(&self.deck, &mut self.locations, &mut self.round) {
                info!(
                    target: "tute_core::round",
                    seat = %swap.seat,
                    gave = %swap.new_trump,
                    took = %swap.old_trump,
                    "trump swapped"
                );
                self.events.push(RoundEvent::TrumpSwapped(swap));
            }
        }

        self.legal_indices(seat)
    }

    /// Put `card` face up for `seat`. Returns the winner once the trick is
    /// complete.
    pub fn apply_move(&mut self, seat: Seat, card: CardId) -> Result<Option<Seat>, EngineError> {
        self.ensure_dealt()?;
        self.check_seat(seat)?;

        let hand = self.locations.cards_in(Location::Hand(seat));
        let Some(position) = hand.iter().position(|&id| id == card) else {
            return Err(EngineError::CardNotInHand { seat, card });
        };
        if self.locations.count_in(Location::FaceUp(seat)) > 0 {
            return Err(EngineError::AlreadyPlayed { seat });
        }
        if !self.legal_indices(seat)?.contains(&position) {
            return Err(EngineError::IllegalCard { seat, card });
        }

        let leads = self.face_up_count() == 0;
        self.locations.move_card(card, Location::FaceUp(seat));
        if leads {
            self.round.set_led_suit(Some(self.deck.card(card).suit));
        }

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "tute_core::round",
                Level::DEBUG,
                seat = %seat,
                card = %self.deck.card(card),
                leads,
                "card played"
            );
        }

        if self.face_up_count() < self.rules.players.get() {
            self.current = Some(seat.next(self.rules.players));
            return Ok(None);
        }

        self.complete_trick().map(Some)
    }

    /// One full turn: prepare, ask the chooser, apply.
    pub fn play_turn<C>(&mut self, seat: Seat, chooser: &mut C) -> Result<Option<Seat>, EngineError>
    where
        C: CardChooser + ?Sized,
    {
        let legal = self.pre_move(seat)?;
        let hand = self.hand(seat);
        let choice = {
            let ctx = ChoiceContext {
                engine: self,
                seat,
                hand: &hand,
                legal: &legal,
            };
            let choice = chooser.choose_card(&ctx);
            if !ctx.is_legal(choice) {
                return Err(EngineError::IllegalCard {
                    seat,
                    card: choice.id,
                });
            }
            choice
        };
        self.apply_move(seat, choice.id)
    }

    fn complete_trick(&mut self) -> Result<Seat, EngineError> {
        let players = self.rules.players;
        let plays = self.face_up();
        let incomplete = EngineError::IncompleteTrick {
            face_up: plays.len(),
            required: players.get(),
        };
        if plays.len() < players.get() {
            return Err(incomplete);
        }

        let winner = self
            .round
            .led_suit()
            .zip(self.round.trump_suit())
            .and_then(|(led, trump)| resolve_trick(&plays, led, trump))
            .ok_or(incomplete)?;
        let points = points_in(&plays);

        for play in &plays {
            self.locations.move_card(play.card.id, Location::Tricks(winner));
        }
        self.round.set_led_suit(None);
        info!(target: "tute_core::round", winner = %winner, points, "trick won");
        self.events.push(RoundEvent::TrickWon { winner, points });

        if !cantar_skipped(players, &self.locations)
            && let Some(cante) = cantar(winner, &self.deck, &self.locations, &mut self.round)
        {
            info!(target: "tute_core::round", seat = %winner, suit = %cante.suit, "cante");
            self.events.push(RoundEvent::Cante(cante));
        }

        self.replenish(winner);

        if self.locations.count_in(Location::Hand(winner)) == 0 {
            self.round.set_last_trick_winner(winner);
            info!(target: "tute_core::round", winner = %winner, "last trick taken");
        }
        self.current = Some(winner);
        Ok(winner)
    }

    /// Deal one card to each seat from the winner on, pile first and the
    /// trump card last, but only while there is a card for everyone.
    fn replenish(&mut self, winner: Seat) {
        let players = self.rules.players;
        let draw: Vec<CardId> = self
            .locations
            .cards_in(Location::Pile)
            .iter()
            .chain(self.locations.cards_in(Location::Trump))
            .copied()
            .take(players.get())
            .collect();
        if draw.len() < players.get() {
            return;
        }

        for (offset, id) in draw.into_iter().enumerate() {
            self.locations
                .move_card(id, Location::Hand(winner.offset(offset, players)));
        }
    }

    fn legal_indices(&self, seat: Seat) -> Result<Vec<usize>, EngineError> {
        let trump_suit = self.round.trump_suit().ok_or(EngineError::NotDealt)?;
        let face_up: Vec<Card> = self.face_up().into_iter().map(|play| play.card).collect();
        let hand = self.hand(seat);
        Ok(legal_cards(
            &face_up,
            &hand,
            self.round.led_suit(),
            trump_suit,
            self.follow_suit(),
        ))
    }

    fn ensure_dealt(&self) -> Result<(), EngineError> {
        if self.current.is_some() {
            Ok(())
        } else {
            Err(EngineError::NotDealt)
        }
    }

    /// Seat for a raw index, rejected unless it sits at this table.
    pub fn seat(&self, index: usize) -> Result<Seat, EngineError> {
        Seat::try_new(index, self.rules.players).ok_or(EngineError::InvalidSeat {
            seat: index,
            player_count: self.rules.players.get(),
        })
    }

    fn check_seat(&self, seat: Seat) -> Result<(), EngineError> {
        if self.rules.players.contains(seat) {
            Ok(())
        } else {
            Err(EngineError::InvalidSeat {
                seat: seat.index(),
                player_count: self.rules.players.get(),
            })
        }
    }

    fn face_up_count(&self) -> usize {
        self.rules
            .players
            .seats()
            .map(|seat| self.locations.count_in(Location::FaceUp(seat)))
            .sum()
    }

    pub fn cards_in(&self, location: Location) -> Vec<Card> {
        self.locations
            .cards_in(location)
            .iter()
            .map(|&id| self.deck.card(id))
            .collect()
    }

    /// Hand of `seat` in the order the cards arrived. Empty for seats that
    /// are not at the table.
    pub fn hand(&self, seat: Seat) -> Vec<Card> {
        self.cards_in(Location::Hand(seat))
    }

    pub fn trump_card(&self) -> Option<Card> {
        self.locations
            .cards_in(Location::Trump)
            .first()
            .map(|&id| self.deck.card(id))
    }

    pub fn trump_suit(&self) -> Option<Suit> {
        self.round.trump_suit()
    }

    /// Cards on the table, in seat order.
    pub fn face_up(&self) -> Vec<Play> {
        self.rules
            .players
            .seats()
            .filter_map(|seat| {
                self.locations
                    .cards_in(Location::FaceUp(seat))
                    .first()
                    .map(|&id| Play::new(seat, self.deck.card(id)))
            })
            .collect()
    }

    /// Cards still to draw: the pile plus the face-up trump card.
    pub fn draw_remaining(&self) -> usize {
        self.locations.count_in(Location::Pile) + self.locations.count_in(Location::Trump)
    }

    pub fn follow_suit(&self) -> bool {
        follow_suit_required(self.rules.habanero, self.draw_remaining(), self.rules.players)
    }

    /// Read-only view for `seat`; the engine is not touched.
    pub fn player_view(&self, seat: Seat) -> Result<PlayerView, EngineError> {
        self.check_seat(seat)?;
        Ok(PlayerView::build(
            seat,
            self.rules.players,
            self.locations.snapshot(),
            &self.round,
            self.follow_suit(),
        ))
    }

    pub fn score_breakdown(&self, seat: Seat) -> Result<ScoreBreakdown, EngineError> {
        self.check_seat(seat)?;
        Ok(ScoreBreakdown::for_seat(
            seat,
            &self.deck,
            &self.locations,
            &self.round,
        ))
    }

    pub fn points(&self, seat: Seat) -> Result<u32, EngineError> {
        self.score_breakdown(seat).map(|breakdown| breakdown.total())
    }

    pub fn round_scores(&self) -> RoundScores {
        RoundScores::collect(self.rules.players, &self.deck, &self.locations, &self.round)
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn card(&self, id: CardId) -> Option<Card> {
        self.deck.get(id).copied()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn location_of(&self, id: CardId) -> Option<Location> {
        self.deck.get(id).map(|card| self.locations.location_of(card.id))
    }

    pub fn player_count(&self) -> PlayerCount {
        self.rules.players
    }

    pub fn cards_per_player(&self) -> usize {
        self.rules.cards_per_player
    }

    pub fn habanero(&self) -> bool {
        self.rules.habanero
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        mem::take(&mut self.events)
    }

    /// Seat expected to move next; `None` before the first deal.
    pub fn current_player(&self) -> Option<Seat> {
        self.current
    }

    /// True once the seat to move has nothing left to play.
    pub fn is_round_over(&self) -> bool {
        self.current
            .is_some_and(|seat| self.locations.count_in(Location::Hand(seat)) == 0)
    }
}
