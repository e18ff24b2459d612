//! Ranking selection.
//!
//! The whole population is reordered by ascending fitness so the best
//! individuals land at the front of the buffer, where the pairwise
//! recombination exploits them. Ties keep their original order.

use crate::heuristics::population::Population;

/// Positions of the population sorted by ascending fitness, stable on ties
pub fn rank_order(fitness: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by_key(|&i| fitness[i]);
    order
}

/// Write `current` into `sorted`, ordered by ascending fitness.
///
/// `sorted` is a reusable buffer: its previous contents are overwritten and
/// its chromosome allocations recycled.
pub fn ranking_selection(current: &Population, sorted: &mut Population) {
    let order = rank_order(current.fitness());

    sorted.refill(order.iter().map(|&idx| current.chromosome(idx)));
    for (slot, &idx) in sorted.fitness_mut().iter_mut().zip(&order) {
        *slot = current.fitness()[idx];
    }
}
