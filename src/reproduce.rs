//! Functions related to reproducing on the specie and global population scale.

use crate::{
    genome::Genome,
    innovation::InnoGen,
    random::{uniq_2, EvolutionEvent, Happens},
    specie::Specie,
};
use core::cmp::Ordering;
use log::trace;
use rand::{seq::IndexedRandom, RngCore};

/// A child of two distinct members, ordered by their fitness. NaN fitness compares as a tie.
fn reproduce_crossover(
    members: &[(Genome, f64)],
    rng: &mut (impl RngCore + Happens),
) -> Option<Genome> {
    let ((l, l_fit), (r, r_fit)) = uniq_2(members, rng)?;
    let fitness_cmp = l_fit.partial_cmp(r_fit).unwrap_or(Ordering::Equal);
    Some(l.mate(r, fitness_cmp, rng))
}

/// A mutated copy of a random member
fn reproduce_copy(
    members: &[(Genome, f64)],
    rng: &mut (impl RngCore + Happens),
    innogen: &mut InnoGen,
) -> Option<Genome> {
    let (genome, _) = members.choose(rng)?;
    Some(genome.mutate(rng, innogen))
}

impl Specie {
    /// Fill this specie's quota of offspring. Each slot is a crossover of two members when the
    /// [EvolutionEvent::Crossover] roll succeeds and there are two to pick, else a mutated copy.
    pub fn reproduce(
        &self,
        rng: &mut (impl RngCore + Happens),
        innogen: &mut InnoGen,
    ) -> Vec<Genome> {
        let mut pop = Vec::with_capacity(self.quota);
        for _ in 0..self.quota {
            let child = if self.len() >= 2 && rng.happens(EvolutionEvent::Crossover) {
                reproduce_crossover(&self.members, rng)
            } else {
                reproduce_copy(&self.members, rng, innogen)
            };

            match child {
                Some(child) => pop.push(child),
                None => {
                    trace!("specie {} has no members to reproduce", self.id);
                    break;
                }
            }
        }

        pop
    }
}

/// Reproduce every specie by its quota into one new generation
pub fn population_reproduce(
    species: &[Specie],
    rng: &mut (impl RngCore + Happens),
    innogen: &mut InnoGen,
) -> Vec<Genome> {
    species
        .iter()
        .flat_map(|specie| specie.reproduce(rng, innogen))
        .collect()
}
