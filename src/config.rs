//! Driver configuration for one evolution run.
//!
//! ```
//! use u_roster::config::EvolutionConfig;
//! use u_roster::ga::{Direction, SelectionType};
//!
//! let config = EvolutionConfig::from_json(r#"{
//!     "population_size": 50,
//!     "direction": "max",
//!     "generations": 20,
//!     "selection": { "type": "tournament", "size": 3 },
//!     "crossover": "single_point",
//!     "mutation": "binary_flip",
//!     "seed": 7
//! }"#).unwrap();
//!
//! assert_eq!(config.direction, Direction::Max);
//! assert_eq!(config.operators().selection, SelectionType::Tournament { size: 3 });
//! ```

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;
use crate::ga::{
    CrossoverType, Direction, EvolutionSettings, GeneticOperators, MutationType, Population,
    Problem, SelectionType,
};
use crate::persistence::FitnessSink;

/// Population size, direction, loop settings, operators and seed.
///
/// Every field has a default, so a partial document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub direction: Direction,
    pub generations: u32,
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    pub elitism: bool,
    pub selection: SelectionType,
    pub crossover: CrossoverType,
    pub mutation: MutationType,
    /// Fixed seed for a reproducible run; OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        let settings = EvolutionSettings::default();
        Self {
            population_size: 100,
            direction: Direction::Max,
            generations: settings.generations,
            crossover_probability: settings.crossover_probability,
            mutation_probability: settings.mutation_probability,
            elitism: settings.elitism,
            selection: SelectionType::Rank,
            crossover: CrossoverType::Uniform,
            mutation: MutationType::Swap,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// [`EvolutionError::UnknownDirection`] for a `direction` other than
    /// `max`/`min`, [`EvolutionError::Config`] for any other malformed input,
    /// [`EvolutionError::InvalidConfig`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, EvolutionError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        if let Some(direction) = document.get("direction").and_then(serde_json::Value::as_str) {
            direction.parse::<Direction>()?;
        }
        let config: Self = serde_json::from_value(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the population size, probabilities and tournament size.
    pub fn validate(&self) -> Result<(), EvolutionError> {
        if self.population_size == 0 {
            return Err(EvolutionError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        self.settings().validate()?;
        self.selection.validate()
    }

    /// Loop settings.
    pub fn settings(&self) -> EvolutionSettings {
        EvolutionSettings {
            generations: self.generations,
            crossover_probability: self.crossover_probability,
            mutation_probability: self.mutation_probability,
            elitism: self.elitism,
        }
    }

    /// Operator bundle for binary representations.
    pub fn operators(&self) -> GeneticOperators<u8> {
        GeneticOperators::new(self.selection, self.crossover, self.mutation)
    }

    /// Random source: seeded if `seed` is set.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Seeds a population for `problem` and runs every configured generation.
    pub fn run<P>(&self, problem: P) -> Result<Population<P>, EvolutionError>
    where
        P: Problem<Gene = u8>,
    {
        self.execute(problem, None)
    }

    /// Like [`run`](Self::run), handing each generation's best fitness to `sink`.
    pub fn run_with_sink<P>(
        &self,
        problem: P,
        sink: &mut dyn FitnessSink,
    ) -> Result<Population<P>, EvolutionError>
    where
        P: Problem<Gene = u8>,
    {
        self.execute(problem, Some(sink))
    }

    fn execute<P>(
        &self,
        problem: P,
        sink: Option<&mut dyn FitnessSink>,
    ) -> Result<Population<P>, EvolutionError>
    where
        P: Problem<Gene = u8>,
    {
        self.validate()?;
        let mut rng = self.rng();
        let mut population = Population::<P>::builder()
            .problem(problem)
            .size(self.population_size)
            .direction(self.direction)
            .build(&mut rng)?;
        population.evolve(&self.settings(), &self.operators(), &mut rng, sink)?;
        Ok(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::CsvFitnessLog;
    use crate::roster::RosterProblem;

    #[test]
    fn test_defaults_follow_driver() {
        let config: EvolutionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvolutionConfig::default());
        assert_eq!(config.population_size, 100);
        assert_eq!(config.generations, 200);
        assert_eq!(config.settings(), EvolutionSettings::default());
        assert_eq!(config.selection, SelectionType::Rank);
        assert_eq!(config.crossover, CrossoverType::Uniform);
        assert_eq!(config.mutation, MutationType::Swap);
        assert!(config.elitism);
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let err = EvolutionConfig::from_json(r#"{"direction": "sideways"}"#).unwrap_err();
        assert!(matches!(err, EvolutionError::UnknownDirection(ref s) if s == "sideways"));
        let err = EvolutionConfig::from_json(r#"{"direction": 3}"#).unwrap_err();
        assert!(matches!(err, EvolutionError::Config(_)));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = EvolutionConfig::from_json(r#"{"mutation_probability": 1.5}"#).unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_population_rejected() {
        let err = EvolutionConfig::from_json(r#"{"population_size": 0}"#).unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_tournament_rejected() {
        let json = r#"{"selection": {"type": "tournament", "size": 0}}"#;
        assert!(EvolutionConfig::from_json(json).is_err());
    }

    #[test]
    fn test_settings_and_operators() {
        let config = EvolutionConfig {
            generations: 3,
            crossover_probability: 1.0,
            selection: SelectionType::Roulette,
            crossover: CrossoverType::Cycle,
            ..Default::default()
        };
        let settings = config.settings();
        assert_eq!(settings.generations, 3);
        assert_eq!(settings.crossover_probability, 1.0);
        let ops = config.operators();
        assert_eq!(ops.selection, SelectionType::Roulette);
        assert_eq!(ops.crossover, CrossoverType::Cycle);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = EvolutionConfig {
            population_size: 8,
            generations: 4,
            seed: Some(42),
            ..Default::default()
        };
        let problem = RosterProblem::uniform(7, 2, 4, 2);
        let a = config.run(problem.clone()).unwrap();
        let b = config.run(problem).unwrap();
        assert_eq!(a.fitness_history(), b.fitness_history());
        assert_eq!(a.fitness_history().len(), 4);
        assert_eq!(a.generation(), 5);
    }

    #[test]
    fn test_run_with_sink_logs_every_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitness.csv");
        let config = EvolutionConfig {
            population_size: 6,
            generations: 3,
            seed: Some(7),
            ..Default::default()
        };
        let mut log = CsvFitnessLog::new(&path, "rank_swap_uniform#0");
        let population = config
            .run_with_sink(RosterProblem::uniform(7, 2, 4, 2), &mut log)
            .unwrap();

        let table = CsvFitnessLog::load(&path).unwrap();
        let expected: Vec<(u32, f64)> = population
            .fitness_history()
            .iter()
            .enumerate()
            .map(|(i, &f)| (i as u32 + 1, f))
            .collect();
        assert_eq!(table.run_history("rank_swap_uniform#0"), expected);
    }
}
