use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;
use tute_bot::PolicyKind;
use tute_core::model::player::PlayerCount;

use crate::config::SimulationConfig;
use crate::runner::{DecisionSummary, RoundOutcome};

/// Two-sided confidence level of the reported intervals.
const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("no baseline agent is configured")]
    MissingBaseline,
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("baseline '{0}' missing for round {1}")]
    MissingBaselineRound(String, String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-agent results round by round.
pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, ComparisonAccumulator>,
    agent_order: Vec<String>,
    rules: String,
}

impl AnalyticsCollector {
    pub fn new(config: &SimulationConfig) -> Result<Self, AnalyticsError> {
        let baseline = config
            .baseline()
            .ok_or(AnalyticsError::MissingBaseline)?
            .to_string();

        let agents = config
            .agents
            .iter()
            .map(|agent| {
                (
                    agent.name.clone(),
                    AgentAccumulator::new(agent.name.clone(), agent.kind),
                )
            })
            .collect();
        let agent_order = config.agents.iter().map(|agent| agent.name.clone()).collect();
        let rules = format!(
            "{}, {}",
            PlayerCount::clamped(config.rules.player_count),
            if config.rules.habanero {
                "Habanero"
            } else {
                "plain Tute"
            }
        );

        Ok(Self {
            baseline,
            agents,
            comparisons: HashMap::new(),
            agent_order,
            rules,
        })
    }

    pub fn record_round(&mut self, outcome: &RoundOutcome) -> Result<(), AnalyticsError> {
        let round_id = format!(
            "R{:05}_P{:02}",
            outcome.round_index, outcome.permutation_index
        );

        let baseline_points = outcome
            .seat_results
            .iter()
            .find(|seat| seat.agent_name == self.baseline)
            .map(|seat| f64::from(seat.breakdown.total()))
            .ok_or_else(|| AnalyticsError::MissingBaselineRound(self.baseline.clone(), round_id))?;

        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_round(
                f64::from(seat.breakdown.total()),
                seat.won,
                seat.cantes,
                seat.swaps,
                &seat.metrics,
            );

            if seat.agent_name != self.baseline {
                self.comparisons
                    .entry(seat.agent_name.clone())
                    .or_default()
                    .record(f64::from(seat.breakdown.total()) - baseline_points);
            }
        }

        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let z = confidence_z();
        let mut agents = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                agents.push(acc.into_report(z));
            }
        }

        let comparisons = agents
            .iter()
            .map(|report| {
                let (p_value, sample_size) = if report.name == self.baseline {
                    (1.0, report.rounds)
                } else {
                    self.comparisons
                        .remove(&report.name)
                        .map(ComparisonAccumulator::wilcoxon_signed_rank)
                        .unwrap_or((1.0, 0))
                };
                ComparisonReport {
                    agent: report.name.clone(),
                    p_value,
                    sample_size,
                }
            })
            .collect();

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            rules: self.rules,
            agents,
            comparisons,
        }
        .enrich())
    }
}

struct AgentAccumulator {
    name: String,
    kind: PolicyKind,
    total_points: f64,
    rounds: u32,
    wins: u32,
    cantes: u32,
    swaps: u32,
    per_round_points: Vec<f64>,
    total_latency_ms: f64,
    total_decisions: u64,
}

impl AgentAccumulator {
    fn new(name: String, kind: PolicyKind) -> Self {
        Self {
            name,
            kind,
            total_points: 0.0,
            rounds: 0,
            wins: 0,
            cantes: 0,
            swaps: 0,
            per_round_points: Vec::new(),
            total_latency_ms: 0.0,
            total_decisions: 0,
        }
    }

    fn record_round(
        &mut self,
        points: f64,
        won: bool,
        cantes: u32,
        swaps: u32,
        metrics: &DecisionSummary,
    ) {
        self.total_points += points;
        self.rounds += 1;
        self.per_round_points.push(points);
        if won {
            self.wins += 1;
        }
        self.cantes += cantes;
        self.swaps += swaps;
        self.total_latency_ms += metrics.total_ms;
        self.total_decisions += u64::from(metrics.decisions);
    }

    fn into_report(self, z: f64) -> AgentReport {
        let avg_points = if self.rounds == 0 {
            0.0
        } else {
            self.total_points / f64::from(self.rounds)
        };
        let avg_latency = if self.total_decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.total_decisions as f64
        };

        AgentReport {
            ci95: confidence_interval(&self.per_round_points, z),
            name: self.name,
            kind: self.kind,
            rounds: self.rounds as usize,
            avg_points,
            wins: self.wins as usize,
            cantes: self.cantes as usize,
            swaps: self.swaps as usize,
            average_ms_per_decision: avg_latency,
            delta_vs_baseline: 0.0,
        }
    }
}

#[derive(Clone, Default)]
struct ComparisonAccumulator {
    diffs: Vec<f64>,
}

impl ComparisonAccumulator {
    fn record(&mut self, diff: f64) {
        self.diffs.push(diff);
    }

    /// Two-sided Wilcoxon signed-rank test with the normal approximation.
    fn wilcoxon_signed_rank(self) -> (f64, usize) {
        let mut paired: Vec<(f64, f64)> = self
            .diffs
            .into_iter()
            .filter(|diff| diff.abs() > f64::EPSILON)
            .map(|diff| (diff.abs(), diff.signum()))
            .collect();
        let n = paired.len();
        if n == 0 {
            return (1.0, 0);
        }
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut w_plus = 0.0;
        let mut w_minus = 0.0;
        let mut tie_adjustment = 0.0;
        let mut i = 0;
        while i < n {
            let mut j = i;
            while j + 1 < n && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
                j += 1;
            }
            let rank = (i + j + 2) as f64 / 2.0;
            for &(_, sign) in &paired[i..=j] {
                if sign > 0.0 {
                    w_plus += rank;
                } else {
                    w_minus += rank;
                }
            }
            let ties = (j - i + 1) as f64;
            tie_adjustment += (ties.powi(3) - ties) / 48.0;
            i = j + 1;
        }

        let n_f = n as f64;
        let mean_w = n_f * (n_f + 1.0) / 4.0;
        let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
        let Some(normal) = standard_normal().filter(|_| variance_w > 0.0) else {
            return (1.0, n);
        };

        let w = f64::min(w_plus, w_minus);
        let z = (((w - mean_w).abs() - 0.5) / variance_w.sqrt()).max(0.0);
        let p = 2.0 * (1.0 - normal.cdf(z));
        (p.clamp(0.0, 1.0), n)
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub rules: String,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
}

impl AnalyticsSummary {
    fn enrich(mut self) -> Self {
        let baseline_avg = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.avg_points)
            .unwrap_or(0.0);
        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.avg_points - baseline_avg;
        }
        self
    }

    pub fn agent(&self, name: &str) -> Option<&AgentReport> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Simulation Summary\n\n");
        let _ = writeln!(out, "Rules: {}\n", self.rules);
        let _ = writeln!(out, "Baseline: {}\n", self.baseline);
        out.push_str("| Agent | Kind | Rounds | Avg points | Δ vs baseline | 95% CI | Win % | Cantes | Swaps | Avg ms/decision | p-value |\n");
        out.push_str("|-------|------|--------|------------|---------------|--------|-------|--------|-------|-----------------|---------|\n");

        for agent in &self.agents {
            let p_value = self
                .comparisons
                .iter()
                .find(|c| c.agent == agent.name)
                .map(|c| c.p_value)
                .unwrap_or(1.0);
            let win_rate = if agent.rounds == 0 {
                0.0
            } else {
                agent.wins as f64 / agent.rounds as f64
            };

            let _ = writeln!(
                out,
                "| {name} | {kind} | {rounds} | {avg:.3} | {delta:+.3} | [{ci_low:.3}, {ci_high:.3}] | {win:.1}% | {cantes} | {swaps} | {latency:.3} | {p_value:.3} |",
                name = agent.name,
                kind = agent.kind,
                rounds = agent.rounds,
                avg = agent.avg_points,
                delta = agent.delta_vs_baseline,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                win = win_rate * 100.0,
                cantes = agent.cantes,
                swaps = agent.swaps,
                latency = agent.average_ms_per_decision,
            );
        }
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: PolicyKind,
    pub rounds: usize,
    pub avg_points: f64,
    pub ci95: (f64, f64),
    pub wins: usize,
    pub cantes: usize,
    pub swaps: usize,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub p_value: f64,
    pub sample_size: usize,
}

fn standard_normal() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// Critical value for `CONFIDENCE_LEVEL`, about 1.96.
fn confidence_z() -> f64 {
    standard_normal()
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
        .unwrap_or(1.96)
}

fn confidence_interval(points: &[f64], z: f64) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let mean = points.iter().sum::<f64>() / n;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    let margin = z * (variance / n).sqrt();
    (mean - margin, mean + margin)
}
