//! Solution representation for the TSP with a minimum subset.
//!
//! A tour is the ordered list of visited node ids (0-based). When fewer
//! than `dimension` nodes are visited the tour is simply shorter; the
//! fixed-width form with `-1` in the unused slots is produced on demand.

use crate::instance::TSPInstance;
use serde::{Deserialize, Serialize};

/// Marks an unused slot in a padded tour
pub const UNVISITED: i64 = -1;

/// Represents a solution to the TSP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour as a sequence of node indices (the cycle closes implicitly)
    pub tour: Vec<usize>,
    /// Total tour length
    pub cost: i64,
    /// Whether the solution is feasible
    pub feasible: bool,
    /// Number of visited nodes
    pub visited: usize,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a solution from a tour
    pub fn from_tour(instance: &TSPInstance, tour: Vec<usize>, algorithm: &str) -> Self {
        let cost = instance.tour_cost(&tour);
        let feasible = instance.is_feasible(&tour);

        Solution {
            visited: tour.len(),
            tour,
            cost,
            feasible,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Recompute cost and feasibility against the instance
    pub fn validate(&mut self, instance: &TSPInstance) {
        self.cost = instance.tour_cost(&self.tour);
        self.feasible = instance.is_feasible(&self.tour);
        self.visited = self.tour.len();
    }

    /// Check if every node is visited exactly once
    pub fn is_complete(&self, instance: &TSPInstance) -> bool {
        self.tour.len() == instance.dimension && instance.is_feasible(&self.tour)
    }

    /// Fixed-width form: node ids followed by `-1` for every unused slot
    pub fn padded_tour(&self, dimension: usize) -> Vec<i64> {
        let mut padded: Vec<i64> = self.tour.iter().map(|&node| node as i64).collect();
        if padded.len() < dimension {
            padded.resize(dimension, UNVISITED);
        }
        padded
    }
}

/// The visited prefix of a padded tour: everything before the first negative value
pub fn tour_from_padded(padded: &[i64]) -> Vec<usize> {
    padded.iter()
        .take_while(|&&node| node >= 0)
        .map(|&node| node as usize)
        .collect()
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {}", self.cost)?;
        writeln!(f, "  Feasible: {}", self.feasible)?;
        writeln!(f, "  Visited: {}", self.visited)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}
