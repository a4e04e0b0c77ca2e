//! Fixed-size population and the generational evolution loop.
//!
//! # Algorithm
//!
//! Each generation:
//! 1. Capture the best candidate (if elitism is on).
//! 2. Breed until the new population is full: two independent selections,
//!    crossover with probability `crossover_probability`, then an
//!    independent mutation coin flip for each offspring.
//! 3. If the elite is strictly better than the worst newcomer, it replaces it.
//! 4. Commit, record the winner's primary fitness, report, and hand the
//!    record to the sink (if any).
//!
//! Step 3 bounds regression: with elitism on, the best fitness tuple never
//! gets worse from one generation to the next.

use std::sync::Arc;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Candidate, Direction, GeneticOperators, Problem};
use crate::error::EvolutionError;
use crate::persistence::FitnessSink;

/// Per-run loop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionSettings {
    /// Number of generations to run.
    pub generations: u32,
    /// Probability of applying crossover to a parent pair (0.0..=1.0).
    pub crossover_probability: f64,
    /// Probability of mutating each offspring (0.0..=1.0).
    pub mutation_probability: f64,
    /// Keep the best candidate across generations.
    pub elitism: bool,
}

impl Default for EvolutionSettings {
    fn default() -> Self {
        Self {
            generations: 200,
            crossover_probability: 0.85,
            mutation_probability: 0.15,
            elitism: true,
        }
    }
}

impl EvolutionSettings {
    /// Sets the generation count.
    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Checks that both probabilities lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), EvolutionError> {
        for (name, p) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EvolutionError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`Population`].
///
/// A problem must be bound before building; without one the build fails
/// with [`EvolutionError::UnboundProblem`].
#[derive(Debug)]
pub struct PopulationBuilder<P> {
    problem: Option<Arc<P>>,
    size: usize,
    direction: Direction,
}

impl<P: Problem> PopulationBuilder<P> {
    /// Binds the problem that generates and evaluates candidates.
    pub fn problem(mut self, problem: impl Into<Arc<P>>) -> Self {
        self.problem = Some(problem.into());
        self
    }

    /// Sets the population size (default: 100).
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the optimization direction (default: max).
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Seeds `size` candidates from the problem's generator.
    pub fn build(self, rng: &mut dyn RngCore) -> Result<Population<P>, EvolutionError> {
        let problem = self.problem.ok_or(EvolutionError::UnboundProblem)?;
        if self.size == 0 {
            return Err(EvolutionError::InvalidConfig(
                "population size must be at least 1".into(),
            ));
        }

        let individuals = (0..self.size)
            .map(|_| Candidate::random(problem.as_ref(), rng))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            size = self.size,
            direction = %self.direction,
            "Initial population generated"
        );

        Ok(Population {
            problem,
            individuals,
            size: self.size,
            direction: self.direction,
            generation: 1,
            fitness_history: Vec::new(),
        })
    }
}

/// Fixed-size ordered collection of candidates for one run.
#[derive(Debug)]
pub struct Population<P: Problem> {
    problem: Arc<P>,
    individuals: Vec<Candidate<P::Gene>>,
    size: usize,
    direction: Direction,
    generation: u32,
    fitness_history: Vec<f64>,
}

impl<P: Problem> Population<P> {
    /// Starts a builder with size 100 and direction max.
    pub fn builder() -> PopulationBuilder<P> {
        PopulationBuilder {
            problem: None,
            size: 100,
            direction: Direction::Max,
        }
    }

    /// Shorthand for `builder().problem(..).size(..).direction(..).build(rng)`.
    pub fn new(
        problem: impl Into<Arc<P>>,
        size: usize,
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Result<Self, EvolutionError> {
        Self::builder()
            .problem(problem)
            .size(size)
            .direction(direction)
            .build(rng)
    }

    /// Current individuals, in their current order.
    pub fn individuals(&self) -> &[Candidate<P::Gene>] {
        &self.individuals
    }

    /// Target population size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of individuals currently held.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Returns `true` if no individuals are held. Never the case after a build.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Optimization direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of the next generation to be produced (starts at 1).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Winner's primary fitness, one entry per completed generation.
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    /// Shared problem.
    pub fn problem(&self) -> &Arc<P> {
        &self.problem
    }

    /// Best candidate under the optimization direction.
    pub fn best(&self) -> &Candidate<P::Gene> {
        let idx = self
            .direction
            .best_index(self.individuals.iter().map(Candidate::fitness))
            .unwrap_or(0);
        &self.individuals[idx]
    }

    /// Worst candidate under the optimization direction.
    pub fn worst(&self) -> &Candidate<P::Gene> {
        let idx = self
            .direction
            .worst_index(self.individuals.iter().map(Candidate::fitness))
            .unwrap_or(0);
        &self.individuals[idx]
    }

    /// Runs `settings.generations` generations.
    ///
    /// On error the population keeps the last committed generation. Sink
    /// failures are logged and never abort the run.
    #[instrument(
        level = "debug",
        skip_all,
        fields(generations = settings.generations, size = self.size, direction = %self.direction)
    )]
    pub fn evolve(
        &mut self,
        settings: &EvolutionSettings,
        operators: &GeneticOperators<P::Gene>,
        rng: &mut dyn RngCore,
        mut sink: Option<&mut dyn FitnessSink>,
    ) -> Result<(), EvolutionError> {
        settings.validate()?;
        operators.validate()?;

        for _ in 0..settings.generations {
            let next = self.breed(settings, operators, rng)?;
            self.commit(next);

            if let Some(sink) = sink.as_deref_mut() {
                let generation = self.generation - 1;
                if let Err(err) = sink.record(generation, self.best().primary()) {
                    tracing::warn!(
                        generation,
                        error = %err,
                        "Failed to persist generation fitness"
                    );
                }
            }
        }
        Ok(())
    }

    /// Produces the next generation without touching the current one.
    fn breed(
        &mut self,
        settings: &EvolutionSettings,
        operators: &GeneticOperators<P::Gene>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Candidate<P::Gene>>, EvolutionError> {
        let elite = settings.elitism.then(|| self.best().clone());
        let mut next = Vec::with_capacity(self.size);

        while next.len() < self.size {
            let i = operators.select(&mut self.individuals, self.direction, rng)?;
            let parent1 = self.individuals[i].representation().to_vec();
            let j = operators.select(&mut self.individuals, self.direction, rng)?;
            let parent2 = self.individuals[j].representation().to_vec();

            let (mut offspring1, mut offspring2) =
                if rng.random::<f64>() < settings.crossover_probability {
                    operators.crossover(&parent1, &parent2, rng)?
                } else {
                    (parent1, parent2)
                };

            if rng.random::<f64>() < settings.mutation_probability {
                offspring1 = operators.mutate(offspring1, rng);
            }
            if rng.random::<f64>() < settings.mutation_probability {
                offspring2 = operators.mutate(offspring2, rng);
            }

            next.push(Candidate::new(self.problem.as_ref(), offspring1)?);
            if next.len() < self.size {
                next.push(Candidate::new(self.problem.as_ref(), offspring2)?);
            }
        }

        if let Some(elite) = elite {
            let worst = self
                .direction
                .worst_index(next.iter().map(Candidate::fitness));
            if let Some(worst) = worst {
                if self.direction.is_better(elite.fitness(), next[worst].fitness()) {
                    tracing::debug!(
                        elite = elite.primary(),
                        replaced = next[worst].primary(),
                        "Elite replaces worst offspring"
                    );
                    next.remove(worst);
                    next.push(elite);
                }
            }
        }

        Ok(next)
    }

    fn commit(&mut self, next: Vec<Candidate<P::Gene>>) {
        self.individuals = next;

        let winner = self.best();
        let primary = winner.primary();
        let breakdown = self.describe(winner);
        tracing::info!(
            generation = self.generation,
            fitness = primary,
            diagnostics = %breakdown,
            "Generation complete"
        );
        tracing::trace!(representation = ?winner.representation(), "Generation winner");

        self.fitness_history.push(primary);
        self.generation += 1;
    }

    /// Renders `label=value` pairs for the diagnostics of `candidate`.
    fn describe(&self, candidate: &Candidate<P::Gene>) -> String {
        let labels = self.problem.diagnostic_labels();
        candidate
            .fitness()
            .diagnostics
            .iter()
            .enumerate()
            .map(|(i, value)| match labels.get(i) {
                Some(label) => format!("{label}={value}"),
                None => format!("d{i}={value}"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::ga::candidate::tests::OneMax;
    use crate::ga::{CrossoverType, MutationType, SelectionType};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn onemax_population(size: usize, direction: Direction, seed: u64) -> Population<OneMax> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Population::new(OneMax { len: 24 }, size, direction, &mut rng).unwrap()
    }

    fn flip_ops(selection: SelectionType) -> GeneticOperators<u8> {
        GeneticOperators::new(selection, CrossoverType::Uniform, MutationType::BinaryFlip)
    }

    #[derive(Default)]
    struct RecordingSink {
        records: Vec<(u32, f64)>,
    }

    impl FitnessSink for RecordingSink {
        fn record(&mut self, generation: u32, fitness: f64) -> Result<(), PersistenceError> {
            self.records.push((generation, fitness));
            Ok(())
        }
    }

    struct BrokenSink;

    impl FitnessSink for BrokenSink {
        fn record(&mut self, _generation: u32, _fitness: f64) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_build_without_problem_fails() {
        let mut rng = SmallRng::seed_from_u64(42);
        let err = Population::<OneMax>::builder().size(5).build(&mut rng).unwrap_err();
        assert!(matches!(err, EvolutionError::UnboundProblem));
    }

    #[test]
    fn test_build_rejects_zero_size() {
        let mut rng = SmallRng::seed_from_u64(42);
        let err = Population::<OneMax>::new(OneMax { len: 4 }, 0, Direction::Max, &mut rng)
            .unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidConfig(_)));
    }

    #[test]
    fn test_initial_population() {
        let pop = onemax_population(10, Direction::Max, 42);
        assert_eq!(pop.len(), 10);
        assert_eq!(pop.generation(), 1);
        assert!(pop.fitness_history().is_empty());
        assert!(pop.individuals().iter().all(|c| c.len() == 24));
    }

    #[test]
    fn test_best_and_worst_follow_direction() {
        let max = onemax_population(20, Direction::Max, 3);
        let min = onemax_population(20, Direction::Min, 3);
        let top = max.individuals().iter().map(Candidate::primary).fold(f64::MIN, f64::max);
        let bottom = max.individuals().iter().map(Candidate::primary).fold(f64::MAX, f64::min);
        assert_eq!(max.best().primary(), top);
        assert_eq!(max.worst().primary(), bottom);
        assert_eq!(min.best().primary(), bottom);
        assert_eq!(min.worst().primary(), top);
    }

    #[test]
    fn test_size_invariant_with_odd_size() {
        let mut pop = onemax_population(7, Direction::Max, 42);
        let mut rng = SmallRng::seed_from_u64(1);
        let settings = EvolutionSettings::default().with_generations(6);
        pop.evolve(&settings, &flip_ops(SelectionType::Roulette), &mut rng, None)
            .unwrap();
        assert_eq!(pop.len(), 7);
        assert_eq!(pop.generation(), 7);
        assert_eq!(pop.fitness_history().len(), 6);
    }

    #[test]
    fn test_elitism_never_regresses_when_maximizing() {
        let mut pop = onemax_population(12, Direction::Max, 42);
        let mut rng = SmallRng::seed_from_u64(9);
        let settings = EvolutionSettings::default()
            .with_generations(30)
            .with_mutation_probability(1.0);
        pop.evolve(&settings, &flip_ops(SelectionType::Rank), &mut rng, None)
            .unwrap();
        let history = pop.fitness_history();
        assert!(history.windows(2).all(|w| w[1] >= w[0]), "{history:?}");
    }

    #[test]
    fn test_elitism_never_regresses_when_minimizing() {
        let mut pop = onemax_population(12, Direction::Min, 42);
        let mut rng = SmallRng::seed_from_u64(9);
        let settings = EvolutionSettings::default()
            .with_generations(30)
            .with_mutation_probability(1.0);
        pop.evolve(&settings, &flip_ops(SelectionType::tournament()), &mut rng, None)
            .unwrap();
        let history = pop.fitness_history();
        assert!(history.windows(2).all(|w| w[1] <= w[0]), "{history:?}");
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut pop = onemax_population(10, Direction::Max, 5);
            let mut rng = SmallRng::seed_from_u64(11);
            let settings = EvolutionSettings::default().with_generations(15);
            pop.evolve(&settings, &flip_ops(SelectionType::Rank), &mut rng, None)
                .unwrap();
            pop.fitness_history().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_invalid_probability_rejected_before_any_generation() {
        let mut pop = onemax_population(4, Direction::Max, 42);
        let mut rng = SmallRng::seed_from_u64(1);
        let settings = EvolutionSettings::default().with_crossover_probability(1.5);
        let err = pop
            .evolve(&settings, &flip_ops(SelectionType::Rank), &mut rng, None)
            .unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidConfig(_)));
        assert_eq!(pop.generation(), 1);
    }

    #[test]
    fn test_length_changing_mutation_is_rejected() {
        let mut pop = onemax_population(4, Direction::Max, 42);
        let before: Vec<Vec<u8>> = pop
            .individuals()
            .iter()
            .map(|c| c.representation().to_vec())
            .collect();
        let mut rng = SmallRng::seed_from_u64(1);
        let ops = flip_ops(SelectionType::Rank).with_mutation(
            |mut genes: Vec<u8>, _rng: &mut dyn RngCore| {
                genes.pop();
                genes
            },
        );
        let settings = EvolutionSettings::default().with_mutation_probability(1.0);
        let err = pop.evolve(&settings, &ops, &mut rng, None).unwrap_err();
        assert!(matches!(err, EvolutionError::LengthMismatch { expected: 24, actual: 23 }));

        // Rank selection may reorder, but the committed generation is unchanged.
        let mut after: Vec<Vec<u8>> = pop
            .individuals()
            .iter()
            .map(|c| c.representation().to_vec())
            .collect();
        let mut before = before;
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(pop.generation(), 1);
    }

    #[test]
    fn test_sink_receives_each_generation() {
        let mut pop = onemax_population(6, Direction::Max, 42);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sink = RecordingSink::default();
        let settings = EvolutionSettings::default().with_generations(4);
        pop.evolve(&settings, &flip_ops(SelectionType::Rank), &mut rng, Some(&mut sink))
            .unwrap();

        let generations: Vec<u32> = sink.records.iter().map(|(g, _)| *g).collect();
        assert_eq!(generations, vec![1, 2, 3, 4]);
        let values: Vec<f64> = sink.records.iter().map(|(_, f)| *f).collect();
        assert_eq!(values, pop.fitness_history());
    }

    #[test]
    fn test_sink_failure_does_not_abort_run() {
        let mut pop = onemax_population(6, Direction::Max, 42);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sink = BrokenSink;
        let settings = EvolutionSettings::default().with_generations(3);
        pop.evolve(&settings, &flip_ops(SelectionType::Rank), &mut rng, Some(&mut sink))
            .unwrap();
        assert_eq!(pop.fitness_history().len(), 3);
        assert_eq!(pop.len(), 6);
    }

    #[test]
    fn test_no_crossover_no_mutation_keeps_gene_pool() {
        // Without variation every offspring is a copy of some parent.
        let mut pop = onemax_population(8, Direction::Max, 42);
        let originals: Vec<Vec<u8>> = pop
            .individuals()
            .iter()
            .map(|c| c.representation().to_vec())
            .collect();
        let mut rng = SmallRng::seed_from_u64(1);
        let settings = EvolutionSettings::default()
            .with_generations(1)
            .with_crossover_probability(0.0)
            .with_mutation_probability(0.0);
        pop.evolve(&settings, &flip_ops(SelectionType::Roulette), &mut rng, None)
            .unwrap();
        assert!(pop
            .individuals()
            .iter()
            .all(|c| originals.iter().any(|o| o.as_slice() == c.representation())));
    }

    #[test]
    fn test_settings_serde_defaults() {
        let s: EvolutionSettings = serde_json::from_str(r#"{"generations": 5}"#).unwrap();
        assert_eq!(s.generations, 5);
        assert_eq!(s.crossover_probability, 0.85);
        assert!(s.elitism);
        assert_eq!(EvolutionSettings::default().generations, 200);
    }
}
