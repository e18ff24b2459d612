//! Benchmarking and experimentation module.
//!
//! Runs the genetic algorithm several times per instance with different
//! seeds, collects per-run results and per-instance statistics, and
//! exports them as CSV files and a text report.

use crate::heuristics::genetic::{GAConfig, GeneticAlgorithm};
use crate::instance::TSPInstance;

use indicatif::{ProgressBar, ProgressStyle};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Result of a single run on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Minimum number of nodes per tour
    pub min_node_num: usize,
    /// Run index
    pub run: usize,
    /// Seed used for this run
    pub seed: u64,
    /// Best tour length found
    pub cost: i64,
    /// Whether the best tour is feasible
    pub feasible: bool,
    /// Visited nodes in the best tour
    pub visited: usize,
    /// Computation time in seconds
    pub time: f64,
    /// Generations completed
    pub generations: usize,
}

/// Aggregated statistics over the runs of one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub instance: String,
    pub dimension: usize,
    /// Number of runs
    pub num_runs: usize,
    /// Number of feasible results
    pub num_feasible: usize,
    pub best_cost: i64,
    pub worst_cost: i64,
    pub mean_cost: f64,
    /// Standard deviation of cost (0 with a single run)
    pub std_cost: f64,
    pub mean_time: f64,
    pub mean_generations: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs per instance
    pub num_runs: usize,
    /// Time limit per run in seconds
    pub time_limit: f64,
    /// Population size of every run
    pub population_size: usize,
    /// Optional generation cap per run
    pub max_generations: Option<usize>,
    /// Run the independent runs in parallel
    pub parallel: bool,
    /// Show a progress bar
    pub show_progress: bool,
    /// Run `i` uses seed `base_seed + i`
    pub base_seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            time_limit: 60.0,
            population_size: GAConfig::default().population_size,
            max_generations: None,
            parallel: true,
            show_progress: true,
            base_seed: 0,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    fn ga_config(&self, seed: u64) -> GAConfig {
        GAConfig {
            seed,
            population_size: self.config.population_size,
            time_limit: self.config.time_limit,
            max_generations: self.config.max_generations,
            // runs report through the progress bar
            log_interval: 0,
            ..Default::default()
        }
    }

    fn progress_bar(&self, instance: &TSPInstance) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(self.config.num_runs as u64);
        let style = ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} runs ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(instance.name.clone());
        bar
    }

    /// Run the genetic algorithm `num_runs` times on an instance
    pub fn run_instance(&mut self, instance: &TSPInstance) -> Result<(), String> {
        log::info!(
            "[Benchmark] {} (n={}, min={}): {} runs of {:.1}s",
            instance.name,
            instance.dimension,
            instance.min_node_num,
            self.config.num_runs,
            self.config.time_limit
        );

        let seeds: Vec<(usize, u64)> = (0..self.config.num_runs)
            .map(|run| (run, self.config.base_seed + run as u64))
            .collect();
        // reject a bad configuration before spawning any run
        self.ga_config(self.config.base_seed).validate()?;

        let bar = self.progress_bar(instance);
        let single_run = |&(run, seed): &(usize, u64)| -> Result<RunResult, String> {
            let mut ga = GeneticAlgorithm::new(instance.clone(), self.ga_config(seed))?;
            let solution = ga.run();
            bar.inc(1);

            Ok(RunResult {
                instance: instance.name.clone(),
                dimension: instance.dimension,
                min_node_num: instance.min_node_num,
                run,
                seed,
                cost: solution.cost,
                feasible: solution.feasible,
                visited: solution.visited,
                time: solution.computation_time,
                generations: solution.iterations.unwrap_or(0),
            })
        };

        let runs: Vec<RunResult> = if self.config.parallel {
            seeds.par_iter().map(single_run).collect::<Result<_, _>>()?
        } else {
            seeds.iter().map(single_run).collect::<Result<_, _>>()?
        };
        bar.finish();

        if let Some(best) = runs.iter().filter(|r| r.feasible).min_by_key(|r| r.cost) {
            log::info!("[Benchmark] {} best cost {} (seed {})", instance.name, best.cost, best.seed);
        } else {
            log::warn!("[Benchmark] {} produced no feasible tour", instance.name);
        }

        self.results.extend(runs);
        Ok(())
    }

    /// Run benchmark on multiple instances
    pub fn run_on_instances(&mut self, instances: &[TSPInstance]) -> Result<(), String> {
        for instance in instances {
            self.run_instance(instance)?;
        }
        Ok(())
    }

    /// Compute statistics for each instance, sorted by instance name
    pub fn compute_statistics(&self) -> Vec<RunStatistics> {
        let mut per_instance: BTreeMap<&str, Vec<&RunResult>> = BTreeMap::new();

        for result in &self.results {
            per_instance.entry(result.instance.as_str())
                .or_default()
                .push(result);
        }

        let mut statistics = Vec::new();

        for (name, results) in per_instance {
            let feasible: Vec<&RunResult> = results.iter()
                .copied()
                .filter(|r| r.feasible)
                .collect();

            let costs: Vec<f64> = feasible.iter().map(|r| r.cost as f64).collect();
            let (mean_cost, std_cost) = mean_and_std(&costs);
            let times: Vec<f64> = results.iter().map(|r| r.time).collect();
            let generations: Vec<f64> = results.iter().map(|r| r.generations as f64).collect();

            statistics.push(RunStatistics {
                instance: name.to_string(),
                dimension: results[0].dimension,
                num_runs: results.len(),
                num_feasible: feasible.len(),
                best_cost: feasible.iter().map(|r| r.cost).min().unwrap_or(i64::MAX),
                worst_cost: feasible.iter().map(|r| r.cost).max().unwrap_or(i64::MAX),
                mean_cost,
                std_cost,
                mean_time: mean_and_std(&times).0,
                mean_generations: mean_and_std(&generations).0,
            });
        }

        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> csv::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> csv::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        TSP GA Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!("Generated: {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
        report.push_str(&format!(
            "Runs per instance: {}  Time limit: {:.1}s  Population: {}\n\n",
            self.config.num_runs, self.config.time_limit, self.config.population_size
        ));

        let stats = self.compute_statistics();

        report.push_str("Instance Summary:\n");
        report.push_str("-".repeat(92).as_str());
        report.push('\n');
        report.push_str(&format!("{:<20} {:>6} {:>9} {:>10} {:>12} {:>10} {:>10} {:>10}\n",
            "Instance", "n", "Feasible", "Best", "Mean", "Std", "Avg Time", "Avg Gens"));
        report.push_str("-".repeat(92).as_str());
        report.push('\n');

        for stat in &stats {
            let best = if stat.num_feasible > 0 { stat.best_cost.to_string() } else { "-".to_string() };
            report.push_str(&format!("{:<20} {:>6} {:>9} {:>10} {:>12.2} {:>10.2} {:>10.3} {:>10.0}\n",
                stat.instance,
                stat.dimension,
                format!("{}/{}", stat.num_feasible, stat.num_runs),
                best,
                stat.mean_cost,
                stat.std_cost,
                stat.mean_time,
                stat.mean_generations));
        }

        report.push_str("-".repeat(92).as_str());
        report.push('\n');

        // relative spread: instances where the runs disagree the most first
        let mut spread: Vec<&RunStatistics> = stats.iter()
            .filter(|s| s.num_feasible > 1 && s.mean_cost > 0.0)
            .collect();
        spread.sort_by_key(|s| std::cmp::Reverse(OrderedFloat(s.std_cost / s.mean_cost)));

        if !spread.is_empty() {
            report.push_str("\nRun-to-run variation (std / mean):\n");
            for stat in spread {
                report.push_str(&format!("  {}: {:.2}%\n", stat.instance, 100.0 * stat.std_cost / stat.mean_cost));
            }
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

/// Sample mean and standard deviation; NaN for no sample, zero spread for one
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    use statrs::statistics::Statistics;

    match values.len() {
        0 => (f64::NAN, f64::NAN),
        1 => (values[0], 0.0),
        _ => (values.mean(), values.std_dev()),
    }
}

/// Helper function to load instances from a directory
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<TSPInstance> {
    let mut instances = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "tsp").unwrap_or(false) {
                match TSPInstance::from_file(&path) {
                    Ok(instance) => instances.push(instance),
                    Err(e) => log::warn!("[Benchmark] Skipping {:?}: {}", path, e),
                }
            }
        }
    }

    // Sort by dimension
    instances.sort_by(|a, b| a.dimension.cmp(&b.dimension).then_with(|| a.name.cmp(&b.name)));

    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(parallel: bool) -> BenchmarkConfig {
        BenchmarkConfig {
            num_runs: 3,
            time_limit: 10.0,
            max_generations: Some(30),
            parallel,
            show_progress: false,
            base_seed: 7,
            ..Default::default()
        }
    }

    fn ring(name: &str, n: usize) -> TSPInstance {
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / n as f64;
                (100.0 * angle.cos(), 100.0 * angle.sin())
            })
            .collect();
        TSPInstance::from_coords(name, &coords, n)
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
        assert_eq!(config.population_size, 20);
    }

    #[test]
    fn test_run_instance_and_statistics() {
        let mut benchmark = Benchmark::new(quick_config(false));
        benchmark.run_on_instances(&[ring("b", 12), ring("a", 8)]).unwrap();

        assert_eq!(benchmark.results().len(), 6);
        assert!(benchmark.results().iter().all(|r| r.feasible && r.generations == 30));
        assert_eq!(benchmark.results()[0].seed, 7);
        assert_eq!(benchmark.results()[2].seed, 9);

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].instance, "a");
        assert_eq!(stats[0].num_feasible, 3);
        assert!(stats[0].best_cost <= stats[0].worst_cost);
        assert!(stats[0].mean_cost >= stats[0].best_cost as f64);

        let report = benchmark.generate_report();
        assert!(report.contains("Instance Summary"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let instance = ring("r", 15);
        let mut sequential = Benchmark::new(quick_config(false));
        let mut parallel = Benchmark::new(quick_config(true));
        sequential.run_instance(&instance).unwrap();
        parallel.run_instance(&instance).unwrap();

        let costs = |b: &Benchmark| b.results().iter().map(|r| (r.seed, r.cost)).collect::<Vec<_>>();
        assert_eq!(costs(&sequential), costs(&parallel));
    }

    #[test]
    fn test_invalid_population_is_reported() {
        let mut benchmark = Benchmark::new(BenchmarkConfig {
            population_size: 2,
            ..quick_config(false)
        });
        assert!(benchmark.run_instance(&ring("r", 5)).is_err());
        assert!(benchmark.results().is_empty());
    }

    #[test]
    fn test_export_csv() {
        let mut benchmark = Benchmark::new(quick_config(false));
        benchmark.run_instance(&ring("csv", 6)).unwrap();

        let path = std::env::temp_dir().join(format!("tsp_ga_results_{}.csv", std::process::id()));
        benchmark.export_to_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(text.starts_with("instance,dimension,min_node_num,run,seed,cost"));
        assert_eq!(text.lines().count(), 4);
    }
}
