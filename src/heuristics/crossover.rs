//! Recombination: symmetric two-point crossover over adjacent pairs, plus
//! the forced single-slot reinjection.

use crate::heuristics::codec::Chromosome;
use crate::heuristics::population::Population;

/// The three gene bands of the two-point crossover.
///
/// Genes in `0..head_end` and `middle_end..n` stay with their own parent,
/// genes in `head_end..middle_end` are exchanged between the two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverBands {
    pub head_end: usize,
    pub middle_end: usize,
}

impl CrossoverBands {
    /// Cut points for chromosomes of length `n`.
    ///
    /// With `p = ceil(n / 2) - 1` the bands are `[0, p/2]`,
    /// `(p/2, p + p/2]` and `(p + p/2, n)`.
    pub fn for_length(n: usize) -> Self {
        let point = n.div_ceil(2).saturating_sub(1);
        let head_end = (point / 2 + 1).min(n);
        let middle_end = (point + point / 2 + 1).min(n);
        CrossoverBands { head_end, middle_end }
    }

    pub fn middle(&self) -> std::ops::Range<usize> {
        self.head_end..self.middle_end
    }
}

/// Produce two children from two parents: outer bands inherited, middle band swapped
pub fn two_point_crossover(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    bands: CrossoverBands,
) -> (Chromosome, Chromosome) {
    let mut child_a = parent_a.clone();
    let mut child_b = parent_b.clone();
    child_a.swap_genes(&mut child_b, bands.middle());
    (child_a, child_b)
}

/// Build the next generation from the ranked buffer.
///
/// Individuals `(i, i + 1)` for even `i` are crossed and their children
/// written at the same two positions of `next`. With an odd population the
/// last individual is copied unchanged.
pub fn recombine(sorted: &Population, next: &mut Population) {
    let parents = sorted.chromosomes();
    let bands = CrossoverBands::for_length(parents.first().map_or(0, Chromosome::len));

    let mut offspring = Vec::with_capacity(parents.len());
    for pair in parents.chunks(2) {
        match pair {
            [a, b] => {
                let (child_a, child_b) = two_point_crossover(a, b, bands);
                offspring.push(child_a);
                offspring.push(child_b);
            }
            _ => offspring.extend_from_slice(pair),
        }
    }

    *next = Population::from_chromosomes(offspring);
}

/// Copy the chromosome at `source` over the one at `target`
pub fn forced_reinjection(population: &mut Population, source: usize, target: usize) {
    if source == target {
        return;
    }
    let chromosome = population.chromosome(source).clone();
    population.pin(target, chromosome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_bands() {
        // even n: p = n/2 - 1
        assert_eq!(CrossoverBands::for_length(10), CrossoverBands { head_end: 3, middle_end: 7 });
        // odd n: p = (n+1)/2 - 1
        assert_eq!(CrossoverBands::for_length(11), CrossoverBands { head_end: 3, middle_end: 8 });
        assert_eq!(CrossoverBands::for_length(5), CrossoverBands { head_end: 2, middle_end: 4 });
        assert_eq!(CrossoverBands::for_length(2), CrossoverBands { head_end: 1, middle_end: 1 });
        assert_eq!(CrossoverBands::for_length(1), CrossoverBands { head_end: 1, middle_end: 1 });
        assert_eq!(CrossoverBands::for_length(0), CrossoverBands { head_end: 0, middle_end: 0 });
    }

    #[test]
    fn test_two_point_crossover_example() {
        let a = Chromosome::from_genes(vec![5, 4, 3, 2, 1]).unwrap();
        let b = Chromosome::identity(5);
        let (ca, cb) = two_point_crossover(&a, &b, CrossoverBands::for_length(5));

        assert_eq!(ca.genes(), &[5, 4, 1, 1, 1]);
        assert_eq!(cb.genes(), &[1, 1, 3, 2, 1]);
    }

    #[test]
    fn test_recombine_pairs_and_odd_tail() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let sorted = Population::random(5, 12, &mut rng);
        let mut next = Population::default();
        recombine(&sorted, &mut next);

        assert_eq!(next.len(), 5);
        assert!(next.is_valid());
        let bands = CrossoverBands::for_length(12);
        for i in [0, 2] {
            let (ca, cb) = two_point_crossover(sorted.chromosome(i), sorted.chromosome(i + 1), bands);
            assert_eq!(next.chromosome(i), &ca);
            assert_eq!(next.chromosome(i + 1), &cb);
        }
        assert_eq!(next.chromosome(4), sorted.chromosome(4));
    }

    #[test]
    fn test_forced_reinjection() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut population = Population::random(20, 9, &mut rng);
        let source = population.chromosome(3).clone();

        forced_reinjection(&mut population, 3, 17);

        assert_eq!(population.chromosome(17), &source);
        assert_eq!(population.chromosome(3), &source);
        assert_eq!(population.len(), 20);
    }

    fn parent_pair() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        (1usize..50).prop_flat_map(|n| {
            let ranges = (0..n).map(|j| 1..=n - j).collect::<Vec<_>>();
            (ranges.clone(), ranges)
        })
    }

    proptest! {
        #[test]
        fn prop_crossover_band_symmetry((genes_a, genes_b) in parent_pair()) {
            let n = genes_a.len();
            let a = Chromosome::from_genes(genes_a).unwrap();
            let b = Chromosome::from_genes(genes_b).unwrap();
            let bands = CrossoverBands::for_length(n);
            let (ca, cb) = two_point_crossover(&a, &b, bands);

            prop_assert!(ca.is_valid() && cb.is_valid());
            for j in 0..n {
                if bands.middle().contains(&j) {
                    prop_assert_eq!(ca.genes()[j], b.genes()[j]);
                    prop_assert_eq!(cb.genes()[j], a.genes()[j]);
                } else {
                    prop_assert_eq!(ca.genes()[j], a.genes()[j]);
                    prop_assert_eq!(cb.genes()[j], b.genes()[j]);
                }
            }
        }
    }
}
