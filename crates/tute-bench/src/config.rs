use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use tute_bot::PolicyKind;
use tute_core::EngineConfig;

const DEFAULT_SEAT_PERMUTATIONS: usize = 1;
const NAME_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub run_id: String,
    pub rounds: RoundsConfig,
    #[serde(default)]
    pub rules: EngineConfig,
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ConfigError::Read {
            source,
            path: path.clone(),
        })?;
        let mut cfg: SimulationConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                source,
                path: path.clone(),
            })?;
        cfg.validate()
            .map_err(|source| ConfigError::Invalid { path, source })?;
        Ok(cfg)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Validate without touching the filesystem. Safe to call again after
    /// CLI overrides.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_name("run_id", &self.run_id)?;
        self.rounds.validate()?;
        let rules = self
            .rules
            .rules()
            .map_err(|err| ValidationError::field("rules", err.to_string()))?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_agents(&mut self.agents, rules.players.get())?;
        self.metrics.validate(&self.agents)?;
        Ok(())
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }

    /// Agent the summary compares everyone against; the first one unless set.
    pub fn baseline(&self) -> Option<&str> {
        self.metrics
            .baseline
            .as_deref()
            .or_else(|| self.agents.first().map(|agent| agent.name.as_str()))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoundsConfig {
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default = "default_permutations")]
    pub permutations: usize,
}

impl RoundsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::field(
                "rounds.count",
                "number of rounds must be greater than zero",
            ));
        }
        if self.permutations == 0 {
            return Err(ValidationError::field(
                "rounds.permutations",
                "permutations must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_permutations() -> usize {
    DEFAULT_SEAT_PERMUTATIONS
}

/// One seated chooser.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: PolicyKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

impl AgentConfig {
    /// Optional `seed` param, mixed into the random policy's per-round seed.
    pub fn seed_param(&self) -> Result<Option<u64>, ValidationError> {
        let Some(mapping) = self.params.as_mapping() else {
            return Ok(None);
        };
        let Some(value) = mapping
            .iter()
            .find_map(|(key, value)| (key.as_str() == Some("seed")).then_some(value))
        else {
            return Ok(None);
        };
        value.as_u64().map(Some).ok_or_else(|| {
            ValidationError::field(
                format!("agents[{}].params.seed", self.name),
                "seed must be a non-negative integer",
            )
        })
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::field(label, "path must not be empty"));
            }
            if resolve_template(run_id, value).components().count() == 0 {
                return Err(ValidationError::field(label, "resolved path is invalid"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub baseline: Option<String>,
}

impl MetricsConfig {
    fn validate(&self, agents: &[AgentConfig]) -> Result<(), ValidationError> {
        match self.baseline.as_ref() {
            Some(baseline) if !agents.iter().any(|agent| &agent.name == baseline) => {
                Err(ValidationError::field(
                    "metrics.baseline",
                    format!("baseline agent '{baseline}' is not defined in agents list"),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Structured logs are off unless enabled.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::field(field, "must not be empty"));
    }
    if !value.chars().all(|c| NAME_ALLOWED.contains(c)) {
        return Err(ValidationError::field(
            field,
            "may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }
    Ok(())
}

fn validate_agents(agents: &mut [AgentConfig], seats: usize) -> Result<(), ValidationError> {
    if agents.len() != seats {
        return Err(ValidationError::field(
            "agents",
            format!("{seats} players need {seats} agents but {} are defined", agents.len()),
        ));
    }

    let mut seen = HashSet::new();
    for agent in agents.iter_mut() {
        validate_name("agents.name", &agent.name)?;
        if !seen.insert(agent.name.clone()) {
            return Err(ValidationError::field(
                "agents",
                format!("agent name '{}' defined more than once", agent.name),
            ));
        }
        if agent.params.is_null() {
            agent.params = serde_yaml::Value::Mapping(Default::default());
        }
        agent.seed_param()?;
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Output paths with `{run_id}` substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory holding the summary, telemetry goes next to it.
    pub fn summary_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl ValidationError {
    fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "habanero_smoke"
rounds:
  seed: 123
  count: 16
rules:
  player_count: 3
  habanero: true
agents:
  - name: "first"
    kind: "first_legal"
  - name: "random_a"
    kind: "random"
    params:
      seed: 7
  - name: "random_b"
    kind: "random"
outputs:
  jsonl: "bench/out/{run_id}/rounds.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> SimulationConfig {
        SimulationConfig::from_yaml(yaml).expect("parse yaml")
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.rounds.permutations, DEFAULT_SEAT_PERMUTATIONS);
        assert_eq!(cfg.agents[1].kind, PolicyKind::Random);
        assert_eq!(cfg.agents[1].seed_param().unwrap(), Some(7));
        assert_eq!(cfg.agents[2].seed_param().unwrap(), None);
        assert_eq!(cfg.baseline(), Some("first"));
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/habanero_smoke/rounds.jsonl")
        );
        assert_eq!(outputs.summary_dir(), PathBuf::from("bench/out/habanero_smoke"));
    }

    #[test]
    fn rules_default_to_two_player_habanero() {
        let yaml = BASIC_YAML
            .replace("rules:\n  player_count: 3\n  habanero: true\n", "")
            .replace("  - name: \"random_b\"\n    kind: \"random\"\n", "");
        let mut cfg = parse(&yaml);
        cfg.validate().expect("validate");
        assert_eq!(cfg.rules, EngineConfig::default());
    }

    #[test]
    fn rejects_agent_count_mismatch() {
        let yaml = BASIC_YAML.replace("player_count: 3", "player_count: 4");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("seat mismatch");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "agents"
        ));
    }

    #[test]
    fn rejects_impossible_hand_size() {
        let yaml = BASIC_YAML.replace("habanero: true", "habanero: true\n  cards_per_player: 13");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("hand too large");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "rules"
        ));
    }

    #[test]
    fn rejects_unknown_baseline() {
        let yaml = format!("{BASIC_YAML}metrics:\n  baseline: \"nobody\"\n");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("unknown baseline");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "metrics.baseline"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("habanero_smoke", "habanero smoke");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_non_integer_seed_param() {
        let yaml = BASIC_YAML.replace("seed: 7", "seed: \"seven\"");
        let mut cfg = parse(&yaml);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_agent_kind_fails_to_parse() {
        let yaml = BASIC_YAML.replace("kind: \"first_legal\"", "kind: \"oracle\"");
        assert!(SimulationConfig::from_yaml(&yaml).is_err());
    }
}
