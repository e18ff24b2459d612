//! Segment-reset mutation.
//!
//! A run of genes is reset to `1` (take the first remaining node, i.e.
//! follow the natural order) and a marker `2` is written right after it.
//! The marker is clamped to the gene range, so late positions where only
//! `1` is allowed receive `1`.

use crate::heuristics::codec::Chromosome;
use crate::heuristics::population::Population;
use rand::Rng;

/// Distance between the split point and the tail run end / tail marker
pub const TAIL_OFFSET: usize = 10;

const RESET_GENE: usize = 1;
const MARKER_GENE: usize = 2;

/// Which half of the chromosome a mutation rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationRegime {
    /// Genes `[0, split)` reset, marker at `split`
    Head,
    /// Genes `[split, n - 10)` reset, marker at `split + 10`
    Tail,
}

impl MutationRegime {
    /// Individuals in the upper half of the ranked population get a head
    /// mutation, the others a tail mutation
    pub fn for_index(index: usize, population_size: usize) -> Self {
        if index > population_size / 2 {
            MutationRegime::Head
        } else {
            MutationRegime::Tail
        }
    }
}

/// Split point of a chromosome of length `n`: `ceil(n / 2)`
#[inline]
pub fn split_point(n: usize) -> usize {
    n.div_ceil(2)
}

/// Apply the deterministic part of the mutation to one chromosome
pub fn reset_segment(chromosome: &mut Chromosome, regime: MutationRegime) {
    let n = chromosome.len();
    let split = split_point(n);

    let (run, marker) = match regime {
        MutationRegime::Head => (0..split, split),
        MutationRegime::Tail => (split..n.saturating_sub(TAIL_OFFSET), split + TAIL_OFFSET),
    };

    for position in run {
        chromosome.set_gene(position, RESET_GENE);
    }
    chromosome.set_gene(marker, MARKER_GENE);
}

/// Mutate one individual chosen uniformly in `[1, size - 1]`; index 0 is
/// never touched. Returns the mutated index.
pub fn mutate<R: Rng>(population: &mut Population, rng: &mut R) -> Option<usize> {
    let size = population.len();
    if size < 2 {
        return None;
    }

    let index = rng.gen_range(1..size);
    let regime = MutationRegime::for_index(index, size);
    reset_segment(population.chromosome_mut(index), regime);

    log::debug!("[GA] Mutation on individual {} ({:?})", index, regime);
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_regime_selection() {
        assert_eq!(MutationRegime::for_index(11, 20), MutationRegime::Head);
        assert_eq!(MutationRegime::for_index(10, 20), MutationRegime::Tail);
        assert_eq!(MutationRegime::for_index(1, 20), MutationRegime::Tail);
    }

    #[test]
    fn test_head_mutation() {
        let mut c = Chromosome::from_genes(vec![6, 5, 4, 3, 2, 1]).unwrap();
        reset_segment(&mut c, MutationRegime::Head);
        assert_eq!(c.genes(), &[1, 1, 1, 2, 2, 1]);
    }

    #[test]
    fn test_tail_mutation() {
        let n = 30;
        let genes: Vec<usize> = (0..n).map(|j| n - j).collect();
        let mut c = Chromosome::from_genes(genes).unwrap();
        reset_segment(&mut c, MutationRegime::Tail);

        let g = c.genes();
        // untouched head
        assert!((0..15).all(|j| g[j] == n - j));
        // run [15, 20) reset, nothing after it besides the marker
        assert!((15..20).all(|j| g[j] == 1));
        assert_eq!(g[25], 2);
        assert!((20..25).chain(26..30).all(|j| g[j] == n - j));
    }

    #[test]
    fn test_marker_is_clamped_on_short_chromosomes() {
        // n = 2: split = 1, marker lands on the last gene where only 1 is allowed
        let mut c = Chromosome::from_genes(vec![2, 1]).unwrap();
        reset_segment(&mut c, MutationRegime::Head);
        assert_eq!(c.genes(), &[1, 1]);

        // n = 8: tail run is empty and the marker falls past the end
        let genes: Vec<usize> = (0..8).map(|j| 8 - j).collect();
        let mut c = Chromosome::from_genes(genes.clone()).unwrap();
        reset_segment(&mut c, MutationRegime::Tail);
        assert_eq!(c.genes(), genes.as_slice());

        // every length keeps the range invariant
        for n in 1..40 {
            let mut c = Chromosome::from_genes((0..n).map(|j| n - j).collect()).unwrap();
            reset_segment(&mut c, MutationRegime::Head);
            assert!(c.is_valid());
            let mut c = Chromosome::from_genes((0..n).map(|j| n - j).collect()).unwrap();
            reset_segment(&mut c, MutationRegime::Tail);
            assert!(c.is_valid());
        }
    }

    #[test]
    fn test_mutate_never_touches_index_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut population = Population::random(20, 24, &mut rng);
        let first = population.chromosome(0).clone();

        for _ in 0..200 {
            let index = mutate(&mut population, &mut rng).unwrap();
            assert!((1..20).contains(&index));
        }

        assert_eq!(population.chromosome(0), &first);
        assert!(population.is_valid());
        assert_eq!(mutate(&mut Population::default(), &mut rng), None);
    }
}
