//! Genetic search engine for the TSP.
//!
//! The engine is split by operator: the chromosome codec, the population
//! with its fitness evaluation, ranking selection, crossover, mutation,
//! and the time-bounded loop that drives them.

pub mod codec;
pub mod population;
pub mod selection;
pub mod crossover;
pub mod mutation;
pub mod genetic;

pub use codec::*;
pub use population::*;
pub use selection::*;
pub use crossover::*;
pub use mutation::*;
pub use genetic::*;
