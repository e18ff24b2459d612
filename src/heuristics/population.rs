//! Population of chromosomes and their fitness.

use crate::heuristics::codec::Chromosome;
use crate::instance::TSPInstance;
use rand::Rng;

/// A fixed-size population with one fitness (tour cost) per chromosome.
///
/// Fitness values are only meaningful after [`Population::evaluate`];
/// lower is better.
#[derive(Debug, Clone, Default)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
    fitness: Vec<i64>,
}

impl Population {
    /// `size` random chromosomes of length `n`
    pub fn random<R: Rng>(size: usize, n: usize, rng: &mut R) -> Self {
        let chromosomes = (0..size).map(|_| Chromosome::random(n, rng)).collect();
        Self::from_chromosomes(chromosomes)
    }

    pub fn from_chromosomes(chromosomes: Vec<Chromosome>) -> Self {
        let fitness = vec![i64::MAX; chromosomes.len()];
        Population { chromosomes, fitness }
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn chromosome(&self, index: usize) -> &Chromosome {
        &self.chromosomes[index]
    }

    pub(crate) fn chromosome_mut(&mut self, index: usize) -> &mut Chromosome {
        &mut self.chromosomes[index]
    }

    /// Replace the contents with copies of `source`, recycling the existing
    /// gene buffers. Fitness is reset.
    pub(crate) fn refill<'a, I>(&mut self, source: I)
    where
        I: IntoIterator<Item = &'a Chromosome>,
    {
        let mut len = 0;
        for (slot, chromosome) in source.into_iter().enumerate() {
            match self.chromosomes.get_mut(slot) {
                Some(target) => target.clone_from(chromosome),
                None => self.chromosomes.push(chromosome.clone()),
            }
            len = slot + 1;
        }
        self.chromosomes.truncate(len);
        self.fitness.clear();
        self.fitness.resize(len, i64::MAX);
    }

    pub(crate) fn fitness_mut(&mut self) -> &mut [i64] {
        &mut self.fitness
    }

    pub fn fitness(&self) -> &[i64] {
        &self.fitness
    }

    /// Overwrite the chromosome at `index`
    pub fn pin(&mut self, index: usize, chromosome: Chromosome) {
        self.chromosomes[index] = chromosome;
        self.fitness[index] = i64::MAX;
    }

    /// Decode every chromosome and score its route with the cost oracle
    pub fn evaluate(&mut self, instance: &TSPInstance) {
        for (chromosome, fitness) in self.chromosomes.iter().zip(self.fitness.iter_mut()) {
            *fitness = instance.tour_cost(&chromosome.decode());
        }
    }

    /// Index of the lowest fitness, the first one on ties
    pub fn best_index(&self) -> Option<usize> {
        self.fitness.iter()
            .enumerate()
            .min_by_key(|&(i, &f)| (f, i))
            .map(|(i, _)| i)
    }

    /// Every chromosome satisfies the gene range invariant
    pub fn is_valid(&self) -> bool {
        self.chromosomes.iter().all(Chromosome::is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square() -> TSPInstance {
        TSPInstance::from_coords("square", &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)], 4)
    }

    #[test]
    fn test_random_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let population = Population::random(20, 10, &mut rng);

        assert_eq!(population.len(), 20);
        assert!(population.is_valid());
        assert!(population.chromosomes().iter().all(|c| c.len() == 10));
    }

    #[test]
    fn test_evaluate() {
        let instance = square();
        let mut population = Population::from_chromosomes(vec![
            Chromosome::identity(4),
            Chromosome::encode(&[0, 2, 1, 3]).unwrap(),
        ]);
        population.evaluate(&instance);

        assert_eq!(population.fitness(), &[40, 48]);
        assert_eq!(population.best_index(), Some(0));
    }

    #[test]
    fn test_best_index_prefers_first_on_ties() {
        let instance = square();
        let mut population = Population::from_chromosomes(vec![
            Chromosome::encode(&[0, 2, 1, 3]).unwrap(),
            Chromosome::identity(4),
            Chromosome::encode(&[1, 2, 3, 0]).unwrap(),
        ]);
        population.evaluate(&instance);

        assert_eq!(population.best_index(), Some(1));
        assert_eq!(Population::default().best_index(), None);
    }
}
