//! Genetic Algorithm for the Euclidean TSP.
//!
//! This module drives the time-bounded generational loop:
//! - order-representation chromosomes (always decodable to a permutation)
//! - full ranking selection of the population every generation
//! - symmetric two-point crossover over adjacent ranked pairs
//! - a rare forced reinjection and a rare segment-reset mutation
//! - a best-solution record kept across all generations

use crate::heuristics::codec::Chromosome;
use crate::heuristics::crossover::{forced_reinjection, recombine};
use crate::heuristics::mutation::mutate;
use crate::heuristics::population::Population;
use crate::heuristics::selection::ranking_selection;
use crate::instance::TSPInstance;
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Genetic Algorithm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GAConfig {
    /// Population size
    pub population_size: usize,
    /// Time limit in seconds
    pub time_limit: f64,
    /// Optional cap on the number of generations
    pub max_generations: Option<usize>,
    /// Random seed
    pub seed: u64,
    /// Upper bound (exclusive) of the two per-generation draws
    pub trigger_range: u32,
    /// First draw value that triggers the forced reinjection
    pub reinjection_trigger: u32,
    /// Ranked slot copied by the forced reinjection
    pub reinjection_source: usize,
    /// The reinjection overwrites slot `population_size - reinjection_target_offset`
    pub reinjection_target_offset: usize,
    /// Pin the identity chromosome (natural order route) into slot 0 at start
    pub pin_identity: bool,
    /// Log progress every this many generations (0 disables)
    pub log_interval: usize,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            population_size: 20,
            time_limit: 300.0,
            max_generations: None,
            seed: 42,
            trigger_range: 20,
            reinjection_trigger: 7,
            reinjection_source: 3,
            reinjection_target_offset: 3,
            pin_identity: true,
            log_interval: 100,
        }
    }
}

impl GAConfig {
    /// Slot overwritten by the forced reinjection
    pub fn reinjection_target(&self) -> usize {
        self.population_size.saturating_sub(self.reinjection_target_offset)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 4 {
            return Err(format!("population_size must be at least 4, got {}", self.population_size));
        }
        if self.reinjection_source >= self.population_size {
            return Err(format!(
                "reinjection_source {} is outside the population of {}",
                self.reinjection_source, self.population_size
            ));
        }
        if self.reinjection_target_offset == 0 || self.reinjection_target_offset > self.population_size {
            return Err(format!(
                "reinjection_target_offset must be in [1, {}], got {}",
                self.population_size, self.reinjection_target_offset
            ));
        }
        if self.trigger_range == 0 {
            return Err("trigger_range must be positive".to_string());
        }
        if self.reinjection_trigger >= self.trigger_range {
            return Err(format!(
                "reinjection_trigger {} is outside [0, {})",
                self.reinjection_trigger, self.trigger_range
            ));
        }
        if !self.time_limit.is_finite() || self.time_limit < 0.0 {
            return Err(format!("time_limit must be a non-negative number of seconds, got {}", self.time_limit));
        }
        Ok(())
    }
}

/// Best feasible route seen so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    pub tour: Vec<usize>,
    pub cost: i64,
}

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm {
    config: GAConfig,
    instance: TSPInstance,
    /// Generation being evaluated; receives the offspring
    population: Population,
    /// Ranked copy of the evaluated generation, the crossover parents
    ranked: Population,
    best: Option<BestRecord>,
    initial_tour: Option<Vec<usize>>,
    rng: ChaCha8Rng,
    generation: usize,
    history: Vec<i64>,
}

impl GeneticAlgorithm {
    pub fn new(instance: TSPInstance, config: GAConfig) -> Result<Self, String> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(GeneticAlgorithm {
            config,
            instance,
            population: Population::default(),
            ranked: Population::default(),
            best: None,
            initial_tour: None,
            rng,
            generation: 0,
            history: Vec::new(),
        })
    }

    /// Seed the search with a known tour (possibly partial)
    pub fn with_initial_tour(mut self, tour: Vec<usize>) -> Self {
        self.initial_tour = Some(tour);
        self
    }

    /// Random population, identity pinned at slot 0, given tour at slot 1
    fn initialize_population(&mut self) {
        let n = self.instance.dimension;
        self.population = Population::random(self.config.population_size, n, &mut self.rng);
        self.ranked = Population::default();
        self.best = None;
        self.generation = 0;
        self.history.clear();

        if self.config.pin_identity {
            self.population.pin(0, Chromosome::identity(n));
            let identity = self.instance.identity_tour();
            let cost = self.instance.tour_cost(&identity);
            self.consider(identity, cost);
        }

        if let Some(tour) = self.initial_tour.clone() {
            if self.instance.is_feasible(&tour) {
                let cost = self.instance.tour_cost(&tour);
                self.consider(tour.clone(), cost);
            } else {
                log::warn!("[GA] Initial tour is not feasible; using it only as a seed chromosome");
            }

            match Chromosome::encode(&self.complete_tour(&tour)) {
                Ok(chromosome) => self.population.pin(1, chromosome),
                Err(e) => log::warn!("[GA] Initial tour ignored: {}", e),
            }
        }

        log::info!(
            "[GA] Initialized population: {} chromosomes of length {} (seed {})",
            self.population.len(),
            n,
            self.config.seed
        );
    }

    /// Append the nodes missing from a partial tour, in ascending order,
    /// dropping repeated or out-of-range entries
    fn complete_tour(&self, tour: &[usize]) -> Vec<usize> {
        let n = self.instance.dimension;
        let mut seen = vec![false; n];
        let mut full = Vec::with_capacity(n);

        for &node in tour {
            if node < n && !seen[node] {
                seen[node] = true;
                full.push(node);
            }
        }
        full.extend((0..n).filter(|&node| !seen[node]));
        full
    }

    /// Replace the best record when `tour` is feasible and strictly cheaper
    fn consider(&mut self, tour: Vec<usize>, cost: i64) -> bool {
        if !self.instance.is_feasible(&tour) {
            return false;
        }
        if self.best.as_ref().map_or(false, |best| cost >= best.cost) {
            return false;
        }
        self.best = Some(BestRecord { tour, cost });
        true
    }

    /// Evaluate the current population and update the best record
    fn evaluate(&mut self, start: &Instant) {
        self.population.evaluate(&self.instance);

        if let Some(idx) = self.population.best_index() {
            let cost = self.population.fitness()[idx];
            let improves = self.best.as_ref().map_or(true, |best| cost < best.cost);
            if improves {
                let tour = self.population.chromosome(idx).decode();
                let visited = tour.len();
                if self.consider(tour, cost) {
                    log::info!(
                        "[GA] Gen {}  New best cost {}  Visited {}  Elapsed {:.2}s",
                        self.generation,
                        cost,
                        visited,
                        start.elapsed().as_secs_f64()
                    );
                }
            }
        }
    }

    /// Evaluate, rank, recombine and maybe mutate: one generation
    fn evolve(&mut self, start: &Instant) {
        self.evaluate(start);
        ranking_selection(&self.population, &mut self.ranked);

        let range = self.config.trigger_range;
        let r1 = self.rng.gen_range(0..range);
        let r2 = self.rng.gen_range(0..range);

        if r1 == self.config.reinjection_trigger {
            let (source, target) = (self.config.reinjection_source, self.config.reinjection_target());
            forced_reinjection(&mut self.ranked, source, target);
            log::debug!("[GA] Gen {}  Reinjected slot {} into slot {}", self.generation, source, target);
        }

        recombine(&self.ranked, &mut self.population);

        if r1 == r2 {
            mutate(&mut self.population, &mut self.rng);
        }

        self.generation += 1;
        if let Some(best) = &self.best {
            self.history.push(best.cost);
        }

        if self.config.log_interval > 0 && self.generation % self.config.log_interval == 0 {
            log::debug!(
                "[GA] Gen {}  Best cost {:?}  Generation best {:?}  Elapsed {:.2}s",
                self.generation,
                self.best.as_ref().map(|b| b.cost),
                self.ranked.fitness().first(),
                start.elapsed().as_secs_f64()
            );
        }
    }

    fn should_stop(&self, start: &Instant) -> bool {
        if let Some(max) = self.config.max_generations {
            if self.generation >= max {
                return true;
            }
        }
        start.elapsed().as_secs_f64() >= self.config.time_limit
    }

    /// Run the genetic algorithm
    pub fn run(&mut self) -> Solution {
        let start = Instant::now();

        self.initialize_population();

        while !self.should_stop(&start) {
            self.evolve(&start);
        }

        // the last offspring generation has not been scored yet
        if self.generation > 0 {
            self.evaluate(&start);
            if let (Some(last), Some(best)) = (self.history.last_mut(), &self.best) {
                *last = best.cost;
            }
        }

        let mut solution = self.best_solution().unwrap_or_else(|| {
            log::warn!("[GA] No feasible tour found; returning the natural order route");
            Solution::from_tour(&self.instance, self.instance.identity_tour(), "GeneticAlgorithm")
        });
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = Some(self.generation);

        log::info!(
            "[GA] Finished after {} generations in {:.2}s: cost {}  feasible {}",
            self.generation,
            solution.computation_time,
            solution.cost,
            solution.feasible
        );

        solution
    }

    /// Get current best solution
    pub fn best_solution(&self) -> Option<Solution> {
        self.best.as_ref().map(|best| {
            Solution::from_tour(&self.instance, best.tour.clone(), "GeneticAlgorithm")
        })
    }

    /// Best cost after each generation, the last entry including the
    /// scoring of the final offspring
    pub fn best_cost_history(&self) -> &[i64] {
        &self.history
    }

    /// Get current generation
    pub fn current_generation(&self) -> usize {
        self.generation
    }

    /// The population that the next generation will evaluate
    pub fn population(&self) -> &Population {
        &self.population
    }
}
