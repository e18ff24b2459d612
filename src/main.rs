//! TSP GA Solver - Command Line Interface
//!
//! A time-bounded genetic algorithm for the Euclidean TSP with minimum-subset tours.

use clap::{Parser, Subcommand, ValueEnum};
use tsp_ga_solver::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use tsp_ga_solver::heuristics::genetic::{GAConfig, GeneticAlgorithm};
use tsp_ga_solver::instance::TSPInstance;
use tsp_ga_solver::solution::Solution;
use tsp_ga_solver::tour_file::{read_tour_file, write_solution, OutputFormat};
use tsp_ga_solver::visualization::Visualizer;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tsp-ga-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "A genetic algorithm for the Euclidean TSP with minimum-subset tours")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance
    Solve {
        /// Path to the instance file (read from stdin when omitted)
        #[arg(short, long)]
        instance: Option<PathBuf>,

        /// Time limit in seconds
        #[arg(short, long, default_value = "300")]
        time_limit: f64,

        /// Random seed (drawn at random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Population size
        #[arg(short, long, default_value = "20")]
        population: usize,

        /// Stop after this many generations
        #[arg(long)]
        max_generations: Option<usize>,

        /// TSPLIB tour used to seed the search
        #[arg(long)]
        initial_tour: Option<PathBuf>,

        /// Format of the written tour
        #[arg(long, value_enum, default_value = "tsp-view")]
        output_format: OutputFormatArg,

        /// Where the tour is written
        #[arg(long, default_value = "result.tour")]
        tour_file: PathBuf,

        /// Write an SVG picture of the tour
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of runs per instance
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Time limit per run
        #[arg(short, long, default_value = "60")]
        time_limit: f64,

        /// Population size
        #[arg(short, long, default_value = "20")]
        population: usize,

        /// Generation cap per run
        #[arg(long)]
        max_generations: Option<usize>,

        /// Seed of the first run
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Run the independent runs in parallel
        #[arg(long)]
        parallel: bool,

        /// Maximum instance size
        #[arg(long)]
        max_size: Option<usize>,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Time limit of the quick run
        #[arg(short, long, default_value = "5")]
        time_limit: f64,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum OutputFormatArg {
    /// Do not write a tour
    None,
    /// TSPLIB tour file
    Tsplib,
    /// tsp-view plot input
    TspView,
    /// Solution as JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::None => OutputFormat::None,
            OutputFormatArg::Tsplib => OutputFormat::Tsplib,
            OutputFormatArg::TspView => OutputFormat::TspView,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            time_limit,
            seed,
            population,
            max_generations,
            initial_tour,
            output_format,
            tour_file,
            svg,
            verbose,
        } => {
            let config = GAConfig {
                seed: seed.unwrap_or_else(rand::random),
                population_size: population,
                time_limit,
                max_generations,
                ..Default::default()
            };
            let output = SolveOutput {
                format: output_format.into(),
                tour_file,
                svg,
                verbose,
            };
            solve_instance(instance, initial_tour, config, output);
        }

        Commands::Benchmark {
            dir,
            output,
            runs,
            time_limit,
            population,
            max_generations,
            seed,
            parallel,
            max_size,
        } => {
            let config = BenchmarkConfig {
                num_runs: runs,
                time_limit,
                population_size: population,
                max_generations,
                parallel,
                show_progress: true,
                base_seed: seed,
            };
            run_benchmark(&dir, &output, config, max_size);
        }

        Commands::Analyze { instance, time_limit } => {
            analyze_instance(&instance, time_limit);
        }
    }
}

struct SolveOutput {
    format: OutputFormat,
    tour_file: PathBuf,
    svg: Option<PathBuf>,
    verbose: bool,
}

fn load_instance(path: Option<&PathBuf>) -> TSPInstance {
    let loaded = match path {
        Some(path) => {
            println!("Loading instance from {:?}...", path);
            TSPInstance::from_file(path)
        }
        None => {
            println!("Reading instance from stdin...");
            TSPInstance::from_reader(std::io::stdin().lock())
        }
    };

    match loaded {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(path: Option<PathBuf>, initial_tour: Option<PathBuf>, config: GAConfig, output: SolveOutput) {
    let instance = load_instance(path.as_ref());

    if output.verbose {
        println!("{}", instance.statistics());
        println!("Seed: {}", config.seed);
    }

    let ga = match GeneticAlgorithm::new(instance.clone(), config) {
        Ok(ga) => ga,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut ga = match initial_tour {
        Some(tour_path) => match read_tour_file(&tour_path, instance.dimension) {
            Ok(tour) => {
                println!("Seeding the search with {} nodes from {:?}", tour.len(), tour_path);
                ga.with_initial_tour(tour)
            }
            Err(e) => {
                eprintln!("Error loading initial tour: {}", e);
                std::process::exit(1);
            }
        },
        None => ga,
    };

    println!("Solving {} (n={}, min={})...", instance.name, instance.dimension, instance.min_node_num);
    let solution = ga.run();

    // audit the returned tour independently of the search
    let mut audited = solution.clone();
    audited.validate(&instance);
    if !audited.feasible {
        eprintln!("error: the computed tour is not feasible.");
        std::process::exit(1);
    }

    println!("\n========== Results ==========");
    println!("Algorithm: {}", audited.algorithm);
    println!("Recomputed tour length: {}", audited.cost);
    println!("Visited nodes: {}/{}", audited.visited, instance.dimension);
    println!("Feasible: {}", audited.feasible);
    println!("Time: {:.4}s", audited.computation_time);
    if let Some(iter) = audited.iterations {
        println!("Generations: {}", iter);
    }

    if output.verbose {
        println!("\nTour: {:?}", audited.padded_tour(instance.dimension));
        let history = ga.best_cost_history();
        if let (Some(first), Some(last)) = (history.first(), history.last()) {
            println!("Best cost: {} after the first generation, {} at the end", first, last);
        }
    }

    write_outputs(&instance, &audited, &ga, &output);
}

fn write_outputs(instance: &TSPInstance, solution: &Solution, ga: &GeneticAlgorithm, output: &SolveOutput) {
    if output.format != OutputFormat::None {
        match write_solution(&output.tour_file, output.format, instance, solution) {
            Ok(()) => println!("\nTour saved to {:?} ({:?})", output.tour_file, output.format),
            Err(e) => {
                eprintln!("Failed to write {:?}: {}", output.tour_file, e);
                std::process::exit(1);
            }
        }
    }

    if let Some(svg_path) = &output.svg {
        let viz = Visualizer::new();
        let svg = viz.generate_svg(instance, solution);
        match viz.save_svg(&svg, svg_path) {
            Ok(()) => println!("Visualization saved to {:?}", svg_path),
            Err(e) => eprintln!("Failed to save SVG: {}", e),
        }

        let curve_path = svg_path.with_extension("convergence.svg");
        let curve = viz.generate_convergence_svg(ga.best_cost_history(), &instance.name);
        match viz.save_svg(&curve, &curve_path) {
            Ok(()) => println!("Convergence curve saved to {:?}", curve_path),
            Err(e) => eprintln!("Failed to save SVG: {}", e),
        }
    }
}

fn run_benchmark(dir: &PathBuf, output: &PathBuf, config: BenchmarkConfig, max_size: Option<usize>) {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir);

    if let Some(max) = max_size {
        instances.retain(|i| i.dimension <= max);
    }

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return;
    }

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    let mut benchmark = Benchmark::new(config);

    for (i, instance) in instances.iter().enumerate() {
        println!("\n[{}/{}] Processing {} (n={})...",
            i + 1, instances.len(), instance.name, instance.dimension);

        if let Err(e) = benchmark.run_instance(instance) {
            eprintln!("Benchmark failed: {}", e);
            std::process::exit(1);
        }
    }

    let results_path = output.join("results.csv");
    match benchmark.export_to_csv(&results_path) {
        Ok(()) => println!("\nResults exported to {:?}", results_path),
        Err(e) => eprintln!("Failed to export results: {}", e),
    }

    let stats_path = output.join("statistics.csv");
    match benchmark.export_statistics_csv(&stats_path) {
        Ok(()) => println!("Statistics exported to {:?}", stats_path),
        Err(e) => eprintln!("Failed to export statistics: {}", e),
    }

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    match std::fs::write(&report_path, &report) {
        Ok(()) => println!("Report saved to {:?}", report_path),
        Err(e) => eprintln!("Failed to save report: {}", e),
    }
}

fn analyze_instance(path: &PathBuf, time_limit: f64) {
    let instance = load_instance(Some(path));

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let optional = instance.dimension - instance.min_node_num;
    println!("Subset:");
    println!("  Mandatory visits: {}", instance.min_node_num);
    println!("  Optional nodes: {}", optional);

    let config = GAConfig {
        time_limit,
        log_interval: 0,
        ..Default::default()
    };
    let mut ga = match GeneticAlgorithm::new(instance.clone(), config) {
        Ok(ga) => ga,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let solution = ga.run();

    let identity = instance.statistics().identity_cost;
    let improvement = if identity > 0 {
        100.0 * (identity - solution.cost) as f64 / identity as f64
    } else {
        0.0
    };

    println!("\nQuick Solution Estimate ({:.1}s):", time_limit);
    println!("  Natural order route: {}", identity);
    println!("  Genetic algorithm: {} (feasible: {}, {} generations)",
        solution.cost, solution.feasible, ga.current_generation());
    println!("  Improvement: {:.2}%", improvement);
}
