mod permutations;

pub use permutations::SeatPermutations;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use tute_bot::build_policy;
use tute_core::model::player::Seat;
use tute_core::model::score::ScoreBreakdown;
use tute_core::{CardChooser, EngineError, RoundEvent, TuteEngine};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, ResolvedOutputs, SimulationConfig, ValidationError};
use crate::logging::TELEMETRY_FILE;

/// Plays every configured round under every seating and streams results.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    seat_permutations: SeatPermutations,
    logging_enabled: bool,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub rounds_played: usize,
    pub permutations: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let rules = config.rules.rules()?;
        let players = rules.players.get();
        if config.agents.len() != players {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
                players,
            });
        }

        let max = SeatPermutations::max_for(players);
        if config.rounds.permutations > max {
            return Err(RunnerError::PermutationLimit {
                requested: config.rounds.permutations,
                max,
            });
        }

        Ok(Self {
            seat_permutations: SeatPermutations::new(players, config.rounds.permutations),
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        })
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let permutations = self.seat_permutations.as_slice();
        let mut rng = StdRng::seed_from_u64(self.config.rounds.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config)?;
        let mut rows_written = 0usize;

        for round_index in 0..self.config.rounds.count {
            let round_seed = rng.next_u64();
            for (permutation_index, permutation) in permutations.iter().enumerate() {
                let outcome =
                    self.play_round(round_index, permutation_index, round_seed, permutation)?;
                analytics.record_round(&outcome)?;
                rows_written += write_round_rows(&mut writer, &self.config.run_id, &outcome)?;
            }
        }
        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.summary_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            rounds_played: self.config.rounds.count,
            permutations: permutations.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_round(
        &self,
        round_index: usize,
        permutation_index: usize,
        round_seed: u64,
        permutation: &[usize],
    ) -> Result<RoundOutcome, RunnerError> {
        let mut engine = TuteEngine::with_seed(&self.config.rules, round_seed)?;
        let players = engine.player_count();
        let mut seats = build_seat_states(permutation, &self.config.agents, round_seed)?;

        let dealer = Seat::new(round_index % players.get());
        engine.deal(dealer)?;
        let mut cantes = vec![0u32; players.get()];
        let mut swaps = vec![0u32; players.get()];

        while !engine.is_round_over() {
            let seat = engine.current_player().ok_or(EngineError::NotDealt)?;
            let state = seats
                .get_mut(seat.index())
                .ok_or(RunnerError::Engine(EngineError::InvalidSeat {
                    seat: seat.index(),
                    player_count: players.get(),
                }))?;

            let start = Instant::now();
            let result = engine.play_turn(seat, state.policy.as_mut());
            let elapsed_ms = state.metrics.record(start.elapsed());
            let winner = result?;

            for round_event in engine.drain_events() {
                match round_event {
                    RoundEvent::Cante(cante) => cantes[cante.seat.index()] += 1,
                    RoundEvent::TrumpSwapped(swap) => swaps[swap.seat.index()] += 1,
                    RoundEvent::Dealt { .. } | RoundEvent::TrickWon { .. } => {}
                }
            }

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "tute_bench::play",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    round_index = round_index as u32,
                    permutation_index = permutation_index as u32,
                    seat = seat.index() as u32,
                    agent = %state.agent_name,
                    trick_winner = ?winner,
                    elapsed_ms
                );
            }
        }

        let scores = engine.round_scores();
        let leader = scores.leading_player();
        let seating = seats
            .iter()
            .map(|state| SeatSnapshot {
                seat: state.seat.index(),
                agent: state.agent_name.clone(),
            })
            .collect();

        let seat_results = seats
            .into_iter()
            .map(|state| {
                let index = state.seat.index();
                SeatResult {
                    breakdown: scores.breakdown(state.seat).copied().unwrap_or_default(),
                    won: state.seat == leader,
                    cantes: cantes[index],
                    swaps: swaps[index],
                    agent_name: state.agent_name,
                    seat: state.seat,
                    metrics: state.metrics.finalize(),
                }
            })
            .collect();

        Ok(RoundOutcome {
            round_index,
            permutation_index,
            round_seed,
            seating,
            seat_results,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_round_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    outcome: &RoundOutcome,
) -> Result<usize, RunnerError> {
    let round_id = format!(
        "R{:05}_P{:02}",
        outcome.round_index, outcome.permutation_index
    );

    let mut rows_written = 0usize;
    for result in &outcome.seat_results {
        let row = RoundLogRow {
            run_id: run_id.to_string(),
            round_id: round_id.clone(),
            round_index: outcome.round_index,
            permutation_index: outcome.permutation_index,
            round_seed: outcome.round_seed,
            seat: result.seat.index(),
            agent: result.agent_name.clone(),
            seating: outcome.seating.clone(),
            points: result.breakdown.total(),
            card_points: result.breakdown.card_points,
            last_trick_bonus: result.breakdown.last_trick_bonus,
            cante_bonus: result.breakdown.cante_bonus,
            cantes: result.cantes,
            swaps: result.swaps,
            won: result.won,
            decisions: result.metrics.decisions,
            speed_ms_turn: result.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }
    Ok(rows_written)
}

fn build_seat_states(
    permutation: &[usize],
    agents: &[AgentConfig],
    round_seed: u64,
) -> Result<Vec<SeatState>, RunnerError> {
    permutation
        .iter()
        .enumerate()
        .map(|(seat_index, &agent_index)| -> Result<SeatState, RunnerError> {
            let agent = agents.get(agent_index).ok_or(RunnerError::InvalidPermutation {
                index: seat_index,
                agent_index,
            })?;
            let salt = agent.seed_param()?.unwrap_or(agent_index as u64);
            Ok(SeatState {
                seat: Seat::new(seat_index),
                agent_name: agent.name.clone(),
                policy: build_policy(agent.kind, round_seed ^ salt.rotate_left(32)),
                metrics: DecisionMetrics::default(),
            })
        })
        .collect()
}

struct SeatState {
    seat: Seat,
    agent_name: String,
    policy: Box<dyn CardChooser + Send>,
    metrics: DecisionMetrics,
}

pub struct RoundOutcome {
    pub round_index: usize,
    pub permutation_index: usize,
    pub round_seed: u64,
    pub seating: Vec<SeatSnapshot>,
    pub seat_results: Vec<SeatResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: usize,
    pub agent: String,
}

pub struct SeatResult {
    pub agent_name: String,
    pub seat: Seat,
    pub breakdown: ScoreBreakdown,
    pub won: bool,
    pub cantes: u32,
    pub swaps: u32,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let total_ms = self.total.as_secs_f64() * 1000.0;
        let avg_ms_per_decision = if self.decisions == 0 {
            0.0
        } else {
            total_ms / f64::from(self.decisions)
        };
        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision,
            total_ms,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct RoundLogRow {
    run_id: String,
    round_id: String,
    round_index: usize,
    permutation_index: usize,
    round_seed: u64,
    seat: usize,
    agent: String,
    seating: Vec<SeatSnapshot>,
    points: u32,
    card_points: u32,
    last_trick_bonus: u32,
    cante_bonus: u32,
    cantes: u32,
    swaps: u32,
    won: bool,
    decisions: u32,
    speed_ms_turn: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("engine rejected the round: {0}")]
    Engine(#[from] EngineError),
    #[error("invalid agent parameters: {0}")]
    Agent(#[from] ValidationError),
    #[error("{players} players need {players} agents but found {found}")]
    SeatCount { found: usize, players: usize },
    #[error("requested {requested} seat permutations exceeds maximum of {max}")]
    PermutationLimit { requested: usize, max: usize },
    #[error("permutation index {index} references invalid agent index {agent_index}")]
    InvalidPermutation { index: usize, agent_index: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
