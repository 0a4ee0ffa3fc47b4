//! Genetic algorithm phase.

use std::time::Instant;

use lectern_config::{GeneticConfig, SelectionType};
use lectern_core::{Penalty, Solution};
use rand::seq::index;
use rand::Rng;
use tracing::{debug, info};

use super::SolutionGenerator;
use crate::error::SolverResult;
use crate::heuristic::repairing_relocation;
use crate::scope::SolverScope;
use crate::termination::{BestScoreTermination, Termination};

/// Population-based search.
///
/// Each generation selects parents, crosses consecutive pairs at one
/// random cut point and mutates each child with `mutation_prob`. The best
/// individual ever seen, including the initial population, is kept in the
/// scope. The phase stops after `generations`, when any individual scores
/// zero, or at the scope's time limit.
#[derive(Debug, Clone)]
pub struct GeneticPhase {
    config: GeneticConfig,
    phase_index: usize,
}

impl GeneticPhase {
    pub fn new(config: GeneticConfig) -> Self {
        Self {
            config,
            phase_index: 0,
        }
    }

    pub fn with_phase_index(mut self, phase_index: usize) -> Self {
        self.phase_index = phase_index;
        self
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    /// Runs the phase, leaving the best solution in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Cancelled`](crate::SolverError::Cancelled) if
    /// the terminate flag is raised.
    pub fn solve(&self, scope: &mut SolverScope<'_>) -> SolverResult<()> {
        let started = Instant::now();
        info!(
            event = "phase_start",
            phase = "Genetic Algorithm",
            phase_index = self.phase_index,
            population_size = self.config.population_size,
            generations = self.config.generations,
        );

        let generator = SolutionGenerator::new(scope.snapshot());
        let mut population = generator.population(self.config.population_size, scope.rng());
        let fallbacks: usize = population.iter().map(Solution::fallback_count).sum();
        scope.stats_mut().record_fallbacks(fallbacks as u64);

        let mut scores = scope.calculate_scores(&population);
        track_best(scope, &population, &scores);

        let perfect = BestScoreTermination::perfect();
        let mut generation = 0;
        while generation < self.config.generations && !perfect.is_terminated(scope) {
            if scope.checkpoint()? {
                break;
            }

            let parents = self.select(&population, &scores, scope.rng());
            let mut offspring = crossover(parents, scope.rng());
            self.mutate(&mut offspring, scope);

            scores = scope.calculate_scores(&offspring);
            population = offspring;
            let generation_best = track_best(scope, &population, &scores);

            generation += 1;
            scope.stats_mut().record_generation();
            debug!(
                event = "generation",
                generation = generation,
                score = %generation_best,
                best = %scope.best_score().unwrap_or(generation_best),
            );
        }

        let best = scope
            .best_score()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        info!(
            event = "phase_end",
            phase = "Genetic Algorithm",
            phase_index = self.phase_index,
            duration_ms = started.elapsed().as_millis() as u64,
            steps = generation as u64,
            score = best,
        );
        Ok(())
    }

    fn select<R: Rng + ?Sized>(
        &self,
        population: &[Solution],
        scores: &[Penalty],
        rng: &mut R,
    ) -> Vec<Solution> {
        (0..population.len())
            .map(|_| {
                let winner = match self.config.selection {
                    SelectionType::Tournament => {
                        tournament(scores, self.config.tournament_size, rng)
                    }
                    SelectionType::Roulette => roulette(scores, rng),
                };
                population[winner].clone()
            })
            .collect()
    }

    fn mutate(&self, offspring: &mut [Solution], scope: &mut SolverScope<'_>) {
        let snapshot = scope.snapshot();
        for child in offspring.iter_mut() {
            if scope.rng().random::<f64>() >= self.config.mutation_prob {
                continue;
            }
            let Some(relocation) = repairing_relocation(snapshot, child, scope.rng()) else {
                continue;
            };
            if relocation.assignment.fallback {
                scope.stats_mut().record_fallbacks(1);
            }
            relocation.apply(child);
        }
    }
}

/// Records the generation's best in the scope and returns its score.
fn track_best(scope: &mut SolverScope<'_>, population: &[Solution], scores: &[Penalty]) -> Penalty {
    let best = scores
        .iter()
        .enumerate()
        .min_by_key(|&(_, score)| *score)
        .map(|(index, &score)| (index, score));
    match best {
        Some((index, score)) => {
            scope.update_best(&population[index], score);
            score
        }
        None => Penalty::MAX,
    }
}

/// Index of the lowest score among `size` distinct random individuals.
fn tournament<R: Rng + ?Sized>(scores: &[Penalty], size: usize, rng: &mut R) -> usize {
    if scores.is_empty() {
        return 0;
    }
    let size = size.clamp(1, scores.len());
    index::sample(rng, scores.len(), size)
        .into_iter()
        .min_by_key(|&i| scores[i])
        .unwrap_or(0)
}

/// Index drawn with probability proportional to `1 / (1 + score)`.
fn roulette<R: Rng + ?Sized>(scores: &[Penalty], rng: &mut R) -> usize {
    let weights: Vec<f64> = scores
        .iter()
        .map(|score| 1.0 / (1.0 + score.value() as f64))
        .collect();
    let total: f64 = weights.iter().sum();
    let mut pick = rng.random::<f64>() * total;
    for (index, weight) in weights.iter().enumerate() {
        if pick < *weight {
            return index;
        }
        pick -= weight;
    }
    scores.len().saturating_sub(1)
}

/// One-point crossover of consecutive parent pairs.
///
/// The cut falls in `1..len`, so both children mix genes from both
/// parents. An unpaired last parent, or a pair shorter than two
/// assignments, passes through unchanged.
fn crossover<R: Rng + ?Sized>(parents: Vec<Solution>, rng: &mut R) -> Vec<Solution> {
    let mut offspring = Vec::with_capacity(parents.len());
    let mut parents = parents.into_iter();
    while let Some(first) = parents.next() {
        let Some(second) = parents.next() else {
            offspring.push(first);
            break;
        };
        let len = first.len().min(second.len());
        if len < 2 {
            offspring.push(first);
            offspring.push(second);
            continue;
        }
        let cut = rng.random_range(1..len);
        let (left, right) = first.crossover(&second, cut);
        offspring.push(left);
        offspring.push(right);
    }
    offspring
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_tournament_picks_lowest_of_full_sample() {
        let scores = [Penalty::of(30), Penalty::of(10), Penalty::of(20)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(tournament(&scores, 5, &mut rng), 1);
        }
    }

    #[test]
    fn test_roulette_favours_low_scores() {
        let scores = [Penalty::ZERO, Penalty::of(10_000)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let picks_of_best = (0..1000).filter(|_| roulette(&scores, &mut rng) == 0).count();
        assert!(picks_of_best > 950, "picked best {picks_of_best} times");
    }

    #[test]
    fn test_crossover_keeps_population_size() {
        use lectern_core::{Assignment, RoomId, SectionId, TimeslotId};

        let parent = |room: u32| -> Solution {
            (1..=4)
                .map(|s| Assignment::new(SectionId(s), RoomId(room), TimeslotId(s)))
                .collect()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let offspring = crossover(vec![parent(1), parent(2), parent(3)], &mut rng);

        assert_eq!(offspring.len(), 3);
        assert_eq!(offspring[2], parent(3));
        for child in &offspring[..2] {
            let sections: Vec<u32> = child.iter().map(|a| a.section.get()).collect();
            assert_eq!(sections, vec![1, 2, 3, 4]);
            let rooms: Vec<u32> = child.iter().map(|a| a.room.get()).collect();
            assert!(rooms.contains(&1) && rooms.contains(&2));
        }
    }
}
