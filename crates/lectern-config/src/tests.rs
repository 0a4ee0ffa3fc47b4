//! Tests for schedule configuration.

use super::*;

#[test]
fn test_defaults_match_legacy_weights() {
    let config = ScheduleConfig::default();
    assert_eq!(config.penalties.conflict_multiplier, 1000);
    assert_eq!(config.penalties.wrong_room, 1000);
    assert_eq!(config.penalties.special_needs, 1000);
    assert_eq!(config.penalties.high_priority_preference, 800);
    assert_eq!(config.penalties.general_preference, 200);
    assert_eq!(config.penalties.jabatan, 10_000);
    assert_eq!(config.materializer.companion_venue, "FIK-VCR-KB-1");
    assert_eq!(config.strategy.name(), "genetic");
    assert!(config.time_limit().is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        random_seed = 42

        [strategy]
        type = "hybrid"
        mode = "pipeline"

        [strategy.genetic]
        population_size = 20
        selection = "roulette"

        [strategy.annealing]
        initial_temperature = 500.0

        [penalties]
        daily_load = 250
        accessible_groups = ["KHD2"]

        [termination]
        minutes_spent_limit = 2

        [materializer]
        companion_venue = "AULA-1"
    "#;

    let config = ScheduleConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(120)));
    assert_eq!(config.penalties.daily_load, 250);
    assert!(config.penalties.is_accessible_group("KHD2"));
    assert!(!config.penalties.is_accessible_group("DS2"));
    assert_eq!(config.materializer.companion_venue, "AULA-1");

    let StrategyConfig::Hybrid(hybrid) = config.strategy else {
        panic!("expected hybrid strategy");
    };
    assert_eq!(hybrid.mode, HybridMode::Pipeline);
    assert_eq!(hybrid.genetic.population_size, 20);
    assert_eq!(hybrid.genetic.generations, 50);
    assert_eq!(hybrid.genetic.selection, SelectionType::Roulette);
    assert_eq!(hybrid.annealing.initial_temperature, 500.0);
    assert_eq!(hybrid.annealing.cooling_rate, 0.95);
}

#[test]
fn test_yaml_parsing() {
    let yaml = "
random_seed: 7
strategy:
  type: annealing
  cooling_rate: 0.9
  iterations_per_temp: 10
penalties:
  jabatan: 20000
";

    let config = ScheduleConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.random_seed, Some(7));
    assert_eq!(config.penalties.jabatan, 20_000);
    assert_eq!(config.penalties.general_preference, 200);
    match config.strategy {
        StrategyConfig::Annealing(annealing) => {
            assert_eq!(annealing.cooling_rate, 0.9);
            assert_eq!(annealing.iterations_per_temp, 10);
            assert_eq!(annealing.initial_temperature, 1000.0);
        }
        other => panic!("expected annealing, got {other:?}"),
    }
}

#[test]
fn test_unknown_strategy_is_rejected() {
    let result = ScheduleConfig::from_toml_str(
        r#"
        [strategy]
        type = "tabu"
    "#,
    );
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_builder() {
    let config = ScheduleConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_strategy(StrategyConfig::Hybrid(HybridConfig {
            mode: HybridMode::BestOf,
            ..HybridConfig::default()
        }));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.strategy.name(), "hybrid");
}

#[test]
fn test_validate_rejects_empty_population() {
    let config = ScheduleConfig::new().with_strategy(StrategyConfig::Genetic(GeneticConfig {
        population_size: 0,
        ..GeneticConfig::default()
    }));
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("population_size"));
}

#[test]
fn test_validate_rejects_bad_mutation_probability() {
    let config = ScheduleConfig::new().with_strategy(StrategyConfig::Genetic(GeneticConfig {
        mutation_prob: 1.5,
        ..GeneticConfig::default()
    }));
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_bad_cooling_rate() {
    for cooling_rate in [0.0, 1.0, -0.5, f64::NAN] {
        let config =
            ScheduleConfig::new().with_strategy(StrategyConfig::Annealing(AnnealingConfig {
                cooling_rate,
                ..AnnealingConfig::default()
            }));
        assert!(config.validate().is_err(), "cooling_rate {cooling_rate}");
    }
}

#[test]
fn test_validate_allows_cold_start_temperature() {
    let config = ScheduleConfig::new().with_strategy(StrategyConfig::Annealing(AnnealingConfig {
        initial_temperature: 0.5,
        ..AnnealingConfig::default()
    }));
    assert!(config.validate().is_ok());

    let config = ScheduleConfig::new().with_strategy(StrategyConfig::Annealing(AnnealingConfig {
        initial_temperature: f64::INFINITY,
        ..AnnealingConfig::default()
    }));
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_hybrid_only_checks_used_parameters() {
    let config = ScheduleConfig::new().with_strategy(StrategyConfig::Hybrid(HybridConfig {
        mode: HybridMode::Annealing,
        genetic: GeneticConfig {
            population_size: 0,
            ..GeneticConfig::default()
        },
        annealing: AnnealingConfig::default(),
    }));
    assert!(config.validate().is_ok());

    let config = ScheduleConfig::new().with_strategy(StrategyConfig::Hybrid(HybridConfig {
        mode: HybridMode::BestOf,
        genetic: GeneticConfig {
            population_size: 0,
            ..GeneticConfig::default()
        },
        annealing: AnnealingConfig::default(),
    }));
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_negative_weight() {
    let penalties = PenaltyWeights {
        general_preference: -1,
        ..PenaltyWeights::default()
    };
    let err = ScheduleConfig::new()
        .with_penalties(penalties)
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("general_preference"));
}

#[test]
fn test_validate_rejects_zero_multiplier() {
    let penalties = PenaltyWeights {
        conflict_multiplier: 0,
        ..PenaltyWeights::default()
    };
    assert!(penalties.validate().is_err());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let result = ScheduleConfig::load("/nonexistent/lectern/schedule.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
