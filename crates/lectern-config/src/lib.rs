//! Configuration system for Lectern.
//!
//! Load scheduling configuration from TOML or YAML to choose the search
//! strategy, tune its parameters and adjust the penalty weight table
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use lectern_config::{HybridMode, ScheduleConfig, StrategyConfig};
//! use std::time::Duration;
//!
//! let config = ScheduleConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [strategy]
//!     type = "hybrid"
//!     mode = "best_of"
//!
//!     [strategy.genetic]
//!     population_size = 80
//!
//!     [penalties]
//!     jabatan = 5000
//!
//!     [termination]
//!     seconds_spent_limit = 30
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.penalties.jabatan, 5000);
//! assert_eq!(config.penalties.wrong_room, 1000);
//! match config.strategy {
//!     StrategyConfig::Hybrid(hybrid) => {
//!         assert_eq!(hybrid.mode, HybridMode::BestOf);
//!         assert_eq!(hybrid.genetic.population_size, 80);
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use lectern_config::ScheduleConfig;
//!
//! let config = ScheduleConfig::load("schedule.toml").unwrap_or_default();
//! assert!(config.validate().is_ok());
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

/// Main scheduling configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Search strategy and its parameters.
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Penalty weight table used by the constraint evaluator.
    #[serde(default)]
    pub penalties: PenaltyWeights,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Result materializer configuration.
    #[serde(default)]
    pub materializer: MaterializerConfig,
}

impl ScheduleConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the penalty weight table.
    pub fn with_penalties(mut self, penalties: PenaltyWeights) -> Self {
        self.penalties = penalties;
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Checks every parameter before a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;
        self.penalties.validate()?;
        Ok(())
    }
}

/// Search strategy selector.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Population-based genetic algorithm.
    Genetic(GeneticConfig),

    /// Single-trajectory simulated annealing.
    Annealing(AnnealingConfig),

    /// Configurable combination of both, with the daily load term enabled.
    Hybrid(HybridConfig),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Genetic(GeneticConfig::default())
    }
}

impl StrategyConfig {
    /// Returns the strategy name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyConfig::Genetic(_) => "genetic",
            StrategyConfig::Annealing(_) => "annealing",
            StrategyConfig::Hybrid(_) => "hybrid",
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyConfig::Genetic(genetic) => genetic.validate(),
            StrategyConfig::Annealing(annealing) => annealing.validate(),
            StrategyConfig::Hybrid(hybrid) => {
                if hybrid.mode.uses_genetic() {
                    hybrid.genetic.validate()?;
                }
                if hybrid.mode.uses_annealing() {
                    hybrid.annealing.validate()?;
                }
                Ok(())
            }
        }
    }
}

/// Parent selection scheme of the genetic algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    /// Best of `tournament_size` random individuals.
    #[default]
    Tournament,

    /// Fitness-proportional on `1 / (1 + score)`.
    Roulette,
}

/// Genetic algorithm configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneticConfig {
    /// Number of individuals.
    pub population_size: usize,

    /// Maximum number of generations.
    pub generations: usize,

    /// Probability that an individual is mutated each generation.
    pub mutation_prob: f64,

    /// Parent selection scheme.
    pub selection: SelectionType,

    /// Individuals sampled per tournament.
    pub tournament_size: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            mutation_prob: 0.1,
            selection: SelectionType::Tournament,
            tournament_size: 3,
        }
    }
}

impl GeneticConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be positive"));
        }
        if self.generations == 0 {
            return Err(invalid("generations must be positive"));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(invalid(format!(
                "mutation_prob must be within [0, 1], got {}",
                self.mutation_prob
            )));
        }
        if self.tournament_size == 0 {
            return Err(invalid("tournament_size must be positive"));
        }
        Ok(())
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnnealingConfig {
    /// Starting temperature. At or below 1 no iteration runs.
    pub initial_temperature: f64,

    /// Multiplicative cooling per temperature step.
    pub cooling_rate: f64,

    /// Neighbours tried at each temperature.
    pub iterations_per_temp: usize,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            iterations_per_temp: 100,
        }
    }
}

impl AnnealingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_temperature.is_finite() {
            return Err(invalid("initial_temperature must be finite"));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(invalid(format!(
                "cooling_rate must be within (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.iterations_per_temp == 0 {
            return Err(invalid("iterations_per_temp must be positive"));
        }
        Ok(())
    }
}

/// How the hybrid strategy combines the two searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HybridMode {
    /// Genetic algorithm only.
    Genetic,

    /// Simulated annealing only.
    Annealing,

    /// Run both independently and keep the lower score.
    BestOf,

    /// Seed simulated annealing with the genetic algorithm's best.
    #[default]
    Pipeline,
}

impl HybridMode {
    /// Returns true if the genetic algorithm runs in this mode.
    pub fn uses_genetic(self) -> bool {
        !matches!(self, HybridMode::Annealing)
    }

    /// Returns true if simulated annealing runs in this mode.
    pub fn uses_annealing(self) -> bool {
        !matches!(self, HybridMode::Genetic)
    }
}

/// Hybrid strategy configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HybridConfig {
    /// Combination mode.
    pub mode: HybridMode,

    /// Genetic algorithm parameters.
    pub genetic: GeneticConfig,

    /// Simulated annealing parameters.
    pub annealing: AnnealingConfig,
}

/// Penalty weight table.
///
/// Conflict weights are summed and multiplied by `conflict_multiplier`;
/// every other weight is added once per violation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PenaltyWeights {
    /// Multiplier applied to the summed conflict term.
    pub conflict_multiplier: i64,

    /// Two sections in one room at one slot.
    pub room_conflict: i64,

    /// One lecturer in two sections at one slot.
    pub lecturer_conflict: i64,

    /// Block id missing from the timeslot table.
    pub invalid_timeslot: i64,

    /// Block id on another day than the block start.
    pub cross_day: i64,

    /// Room type does not match course type.
    pub wrong_room: i64,

    /// Special-needs lecturer outside an accessible room.
    pub special_needs: i64,

    /// High-priority preference violated.
    pub high_priority_preference: i64,

    /// Regular preference violated.
    pub general_preference: i64,

    /// Administrative-duty lecturer teaching on Monday.
    pub jabatan: i64,

    /// Multiplier of the daily load deviation (hybrid only).
    pub daily_load: i64,

    /// Deviation from the lecturer's daily average tolerated before `daily_load` applies.
    pub daily_load_threshold: f64,

    /// Room group codes accepted for special-needs lecturers.
    pub accessible_groups: Vec<String>,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            conflict_multiplier: 1000,
            room_conflict: 1,
            lecturer_conflict: 1,
            invalid_timeslot: 1,
            cross_day: 1,
            wrong_room: 1000,
            special_needs: 1000,
            high_priority_preference: 800,
            general_preference: 200,
            jabatan: 10_000,
            daily_load: 500,
            daily_load_threshold: 2.0,
            accessible_groups: vec!["KHD2".to_string(), "DS2".to_string()],
        }
    }
}

impl PenaltyWeights {
    /// Checks that every weight is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conflict_multiplier <= 0 {
            return Err(invalid("conflict_multiplier must be positive"));
        }
        let named = [
            ("room_conflict", self.room_conflict),
            ("lecturer_conflict", self.lecturer_conflict),
            ("invalid_timeslot", self.invalid_timeslot),
            ("cross_day", self.cross_day),
            ("wrong_room", self.wrong_room),
            ("special_needs", self.special_needs),
            ("high_priority_preference", self.high_priority_preference),
            ("general_preference", self.general_preference),
            ("jabatan", self.jabatan),
            ("daily_load", self.daily_load),
        ];
        if let Some((name, value)) = named.iter().find(|(_, value)| *value < 0) {
            return Err(invalid(format!("{name} must not be negative, got {value}")));
        }
        if self.room_conflict == 0 && self.lecturer_conflict == 0 {
            return Err(invalid(
                "room_conflict and lecturer_conflict cannot both be zero",
            ));
        }
        if !(self.daily_load_threshold.is_finite() && self.daily_load_threshold >= 0.0) {
            return Err(invalid("daily_load_threshold must be a non-negative number"));
        }
        Ok(())
    }

    /// Returns true if `group_code` is an accessible room group.
    pub fn is_accessible_group(&self, group_code: &str) -> bool {
        self.accessible_groups.iter().any(|g| g == group_code)
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

/// Result materializer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MaterializerConfig {
    /// Venue shown on the second line of sections sharing a large lecture.
    pub companion_venue: String,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            companion_venue: "FIK-VCR-KB-1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
