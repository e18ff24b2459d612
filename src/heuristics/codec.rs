//! Order-representation chromosome.
//!
//! Gene `j` selects, by 1-based rank, one node among the nodes not yet
//! placed in the route. With `n` nodes, gene `j` lies in `[1, n - j]`, so
//! every chromosome respecting that range decodes to a permutation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A chromosome of the genetic algorithm.
///
/// The range invariant `1 <= genes[j] <= len - j` holds for every value of
/// this type: genes are only written through [`Chromosome::set_gene`], which
/// clamps, or exchanged position-by-position between chromosomes of the
/// same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    genes: Vec<usize>,
}

impl Chromosome {
    /// The chromosome decoding to the natural order route `0, 1, ..., n-1`
    pub fn identity(n: usize) -> Self {
        Chromosome { genes: vec![1; n] }
    }

    /// A uniformly random chromosome of length `n`
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let genes = (0..n).map(|j| rng.gen_range(1..=n - j)).collect();
        Chromosome { genes }
    }

    /// Build a chromosome from raw genes, checking the range invariant
    pub fn from_genes(genes: Vec<usize>) -> Result<Self, String> {
        let n = genes.len();
        if let Some((j, &g)) = genes.iter().enumerate().find(|&(j, &g)| g < 1 || g > n - j) {
            return Err(format!("Gene {} at position {} is outside [1, {}]", g, j, n - j));
        }
        Ok(Chromosome { genes })
    }

    /// Encode a route (a permutation of `0..n`) as the chromosome decoding to it
    pub fn encode(route: &[usize]) -> Result<Self, String> {
        let n = route.len();
        let mut remaining: Vec<usize> = (0..n).collect();
        let mut genes = Vec::with_capacity(n);

        for &node in route {
            // `remaining` stays sorted, so the rank is a binary search away
            let pos = remaining.binary_search(&node)
                .map_err(|_| format!("Route is not a permutation of 0..{}: node {} is repeated or out of range", n, node))?;
            genes.push(pos + 1);
            remaining.remove(pos);
        }

        Ok(Chromosome { genes })
    }

    /// Decode into a route of 0-based node ids
    pub fn decode(&self) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..self.genes.len()).collect();
        self.genes.iter()
            .map(|&k| remaining.remove(k - 1))
            .collect()
    }

    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Largest value gene `position` may take
    #[inline]
    pub fn max_gene(&self, position: usize) -> usize {
        self.genes.len() - position
    }

    /// Write a gene, clamped into `[1, len - position]`.
    ///
    /// Writes past the end of the chromosome are ignored. Returns the value
    /// actually stored, if any.
    pub fn set_gene(&mut self, position: usize, value: usize) -> Option<usize> {
        if position >= self.genes.len() {
            return None;
        }
        let clamped = value.clamp(1, self.max_gene(position));
        self.genes[position] = clamped;
        Some(clamped)
    }

    /// Exchange the genes in `range` with another chromosome of the same length.
    ///
    /// Gene ranges depend only on the position, so both chromosomes stay valid.
    pub fn swap_genes(&mut self, other: &mut Chromosome, range: std::ops::Range<usize>) {
        debug_assert_eq!(self.len(), other.len());
        self.genes[range.clone()].swap_with_slice(&mut other.genes[range]);
    }

    /// Check the range invariant
    pub fn is_valid(&self) -> bool {
        let n = self.genes.len();
        self.genes.iter().enumerate().all(|(j, &g)| g >= 1 && g <= n - j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn all_permutations(n: usize) -> Vec<Vec<usize>> {
        if n == 0 {
            return vec![Vec::new()];
        }
        let mut result = Vec::new();
        for perm in all_permutations(n - 1) {
            for pos in 0..=perm.len() {
                let mut p = perm.clone();
                p.insert(pos, n - 1);
                result.push(p);
            }
        }
        result
    }

    fn is_permutation(route: &[usize], n: usize) -> bool {
        route.len() == n
            && route.iter().all(|&x| x < n)
            && route.iter().collect::<HashSet<_>>().len() == n
    }

    #[test]
    fn test_identity_decodes_to_natural_order() {
        assert_eq!(Chromosome::identity(6).decode(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_decode_example() {
        // remaining [0,1,2,3]: pick 3rd -> 2, [0,1,3]: 1st -> 0, [1,3]: 2nd -> 3, [1]: 1st -> 1
        let c = Chromosome::from_genes(vec![3, 1, 2, 1]).unwrap();
        assert_eq!(c.decode(), vec![2, 0, 3, 1]);
        assert_eq!(Chromosome::encode(&[2, 0, 3, 1]).unwrap(), c);
    }

    #[test]
    fn test_round_trip_every_permutation() {
        for n in 0..=6 {
            for perm in all_permutations(n) {
                let c = Chromosome::encode(&perm).unwrap();
                assert!(c.is_valid());
                assert_eq!(c.decode(), perm);
            }
        }
    }

    #[test]
    fn test_encode_rejects_non_permutations() {
        assert!(Chromosome::encode(&[0, 0, 1]).is_err());
        assert!(Chromosome::encode(&[0, 3, 1]).is_err());
    }

    #[test]
    fn test_from_genes_checks_ranges() {
        assert!(Chromosome::from_genes(vec![4, 3, 2, 1]).is_ok());
        assert!(Chromosome::from_genes(vec![1, 1, 3, 1]).is_err());
        assert!(Chromosome::from_genes(vec![0, 1, 1, 1]).is_err());
    }

    #[test]
    fn test_set_gene_clamps() {
        let mut c = Chromosome::identity(5);
        assert_eq!(c.set_gene(4, 2), Some(1));
        assert_eq!(c.set_gene(3, 2), Some(2));
        assert_eq!(c.set_gene(0, 0), Some(1));
        assert_eq!(c.set_gene(5, 1), None);
        assert!(c.is_valid());
    }

    #[test]
    fn test_random_chromosomes_are_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in 0..30 {
            let c = Chromosome::random(n, &mut rng);
            assert_eq!(c.len(), n);
            assert!(c.is_valid());
        }
    }

    fn valid_genes() -> impl Strategy<Value = Vec<usize>> {
        (0usize..60).prop_flat_map(|n| (0..n).map(|j| 1..=n - j).collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn prop_decode_is_total(genes in valid_genes()) {
            let n = genes.len();
            let c = Chromosome::from_genes(genes).unwrap();
            let route = c.decode();
            prop_assert!(is_permutation(&route, n));
        }

        #[test]
        fn prop_encode_inverts_decode(perm in (0usize..60).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())) {
            let c = Chromosome::encode(&perm).unwrap();
            prop_assert!(c.is_valid());
            prop_assert_eq!(c.decode(), perm);
        }
    }
}
