//! The generational loop: score, speciate, allocate, reproduce, replace.

use crate::{
    genome::Genome,
    innovation::InnoGen,
    params::Parameters,
    random::Happens,
    reproduce::population_reproduce,
    specie::{next_reprs, population_alloc, speciate, SpecieRepr},
};
use log::{debug, warn};
use rand::RngCore;

/// Scores a genome, where higher is fitter. Called once per genome per generation.
#[cfg(not(feature = "parallel"))]
pub trait Fitness: Fn(&Genome) -> f64 {}

#[cfg(not(feature = "parallel"))]
impl<F: Fn(&Genome) -> f64> Fitness for F {}

/// Scores a genome, where higher is fitter. Called once per genome per generation, from many
/// threads at once.
#[cfg(feature = "parallel")]
pub trait Fitness: Fn(&Genome) -> f64 + Sync {}

#[cfg(feature = "parallel")]
impl<F: Fn(&Genome) -> f64 + Sync> Fitness for F {}

/// Summary of one generation, reported once it has been scored and replaced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// index of the scored generation, from 0
    pub generation: usize,
    /// size of the generation replacing it
    pub population: usize,
    pub species: usize,
    pub best_fitness: f64,
}

/// The highest scored pair, the first seen winning ties. NaN scores never win.
pub fn first_fittest<T>(scored: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    scored.into_iter().fold(None, |best, pair| match best {
        Some(b) if b.1 >= pair.1 || pair.1.is_nan() => Some(b),
        _ => Some(pair),
    })
}

#[derive(Debug, Clone)]
pub struct Population {
    params: Parameters,
    genomes: Vec<Genome>,
    reprs: Vec<(usize, SpecieRepr)>,
    next_specie: usize,
    inno: InnoGen,
    generation: usize,
}

impl Population {
    /// `params.population_size` fully connected genomes sharing their initial innovation ids
    pub fn new(
        inputs: usize,
        outputs: usize,
        params: Parameters,
        rng: &mut impl RngCore,
    ) -> Self {
        let mut inno = InnoGen::new(inputs + outputs);
        let genomes = (0..params.population_size)
            .map(|_| Genome::new(inputs, outputs, rng, &mut inno).with_activation(params.activation))
            .collect();

        Self {
            params,
            genomes,
            reprs: Vec::new(),
            next_specie: 0,
            inno,
            generation: 0,
        }
    }

    #[inline]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn inno(&self) -> &InnoGen {
        &self.inno
    }

    /// Fitness of every genome, in order
    #[cfg(not(feature = "parallel"))]
    pub fn score(&self, fitness: &impl Fitness) -> Vec<f64> {
        self.genomes.iter().map(fitness).collect()
    }

    /// Fitness of every genome, in order, scored across rayon's thread pool
    #[cfg(feature = "parallel")]
    pub fn score(&self, fitness: &impl Fitness) -> Vec<f64> {
        use rayon::prelude::*;
        self.genomes.par_iter().map(fitness).collect()
    }

    /// Replace the current generation with its offspring
    pub fn step(&mut self, fitness: &impl Fitness, rng: &mut (impl RngCore + Happens)) -> Stats {
        self.inno.reset();

        let scores = self.score(fitness);
        let best_fitness = first_fittest(scores.iter().map(|f| ((), *f)))
            .map_or(f64::NAN, |(_, f)| f);

        let mut species = speciate(
            self.genomes.drain(..).zip(scores),
            self.reprs.drain(..),
            &mut self.next_specie,
            &self.params,
        );
        population_alloc(&mut species, self.params.population_size);

        let offspring = population_reproduce(&species, rng, &mut self.inno);
        self.reprs = next_reprs(&species, rng);

        let species_count = species.len();
        self.genomes = if offspring.is_empty() {
            warn!(
                "generation {} produced no offspring, carrying it forward",
                self.generation
            );
            species
                .into_iter()
                .flat_map(|s| s.members.into_iter().map(|(genome, _)| genome))
                .collect()
        } else {
            offspring
        };

        let stats = Stats {
            generation: self.generation,
            population: self.genomes.len(),
            species: species_count,
            best_fitness,
        };
        debug!(
            "generation {}: {} species, best fitness {}, {} genomes next",
            stats.generation, stats.species, stats.best_fitness, stats.population
        );
        self.generation += 1;

        stats
    }

    /// Score every genome once more and keep the fittest, the first seen winning ties
    pub fn fittest(&self, fitness: &impl Fitness) -> Option<(Genome, f64)> {
        first_fittest(self.genomes.iter().zip(self.score(fitness)))
            .map(|(genome, fit)| (genome.clone(), fit))
    }
}
