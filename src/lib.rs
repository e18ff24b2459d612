//! TSP GA Solver Library
//!
//! A time-bounded genetic algorithm for the symmetric Euclidean Traveling
//! Salesman Problem, with optional tours that only need to visit a minimum
//! number of nodes.
//!
//! # Features
//!
//! - TSPLIB `EUC_2D` instances with the `MIN_NODE_NUM` extension
//! - Order-representation chromosomes that always decode to a valid route
//! - Ranking selection, two-point crossover, segment-reset mutation
//! - TSPLIB / tsp-view / JSON tour output
//! - Benchmarking and SVG visualization tools
//!
//! # Example
//!
//! ```no_run
//! use tsp_ga_solver::instance::TSPInstance;
//! use tsp_ga_solver::heuristics::genetic::{GAConfig, GeneticAlgorithm};
//!
//! // Load instance
//! let instance = TSPInstance::from_file("instance.tsp").unwrap();
//!
//! // Run the search for ten seconds
//! let config = GAConfig { time_limit: 10.0, ..Default::default() };
//! let mut ga = GeneticAlgorithm::new(instance, config).unwrap();
//! let solution = ga.run();
//!
//! println!("Solution cost: {}", solution.cost);
//! ```

pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod tour_file;
pub mod benchmark;
pub mod visualization;

pub use instance::TSPInstance;
pub use solution::Solution;
