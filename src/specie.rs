use crate::{
    crossover::delta,
    genome::{ConnectionGene, Genome},
    params::Parameters,
};
use log::trace;
use rand::{seq::IndexedRandom, RngCore};

/// The representative member of a particular specie. Is retained inter-generationally to better
/// track when a specie deviates
#[derive(Debug, Clone, PartialEq)]
pub struct SpecieRepr(Vec<ConnectionGene>);

impl SpecieRepr {
    pub fn new(v: Vec<ConnectionGene>) -> Self {
        Self(v)
    }

    #[inline]
    pub fn delta(&self, other: &[ConnectionGene], params: &Parameters) -> f64 {
        delta(&self.0, other, params)
    }
}

impl AsRef<[ConnectionGene]> for SpecieRepr {
    fn as_ref(&self) -> &[ConnectionGene] {
        &self.0
    }
}

/// A collection of scored [Genome]s who are closely related to the same [SpecieRepr]
#[derive(Debug, Clone)]
pub struct Specie {
    pub id: usize,
    pub repr: SpecieRepr,
    pub members: Vec<(Genome, f64)>,
    /// offspring allotted to this specie for the next generation
    pub quota: usize,
}

impl Specie {
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mean member fitness, which is the sum of every member's fitness shared among the specie.
    /// A NaN member contributes nothing to the sum
    pub fn fit_adjusted(&self) -> f64 {
        let l = self.len() as f64;
        self.members
            .iter()
            .filter(|(_, fit)| !fit.is_nan())
            .fold(0., |acc, (_, fit)| acc + *fit / l)
    }
}

/// Partition scored genomes into species. Species are first created empty from `reprs`, which
/// keep their ids and order, and each genome joins the first whose representative is within
/// [Parameters::species_threshold] of it. A genome matching none of them founds a new specie,
/// represented by itself and numbered from `next_id`. Species left without members are dropped.
pub fn speciate(
    genomes: impl IntoIterator<Item = (Genome, f64)>,
    reprs: impl IntoIterator<Item = (usize, SpecieRepr)>,
    next_id: &mut usize,
    params: &Parameters,
) -> Vec<Specie> {
    let mut sp = reprs
        .into_iter()
        .map(|(id, repr)| Specie {
            id,
            repr,
            members: Vec::new(),
            quota: 0,
        })
        .collect::<Vec<_>>();

    for (genome, fitness) in genomes {
        match sp
            .iter_mut()
            .find(|s| s.repr.delta(genome.connections(), params) <= params.species_threshold)
        {
            Some(Specie { members, .. }) => members.push((genome, fitness)),
            None => {
                trace!("founding specie {next_id}");
                sp.push(Specie {
                    id: *next_id,
                    repr: SpecieRepr::new(genome.connections().to_vec()),
                    members: vec![(genome, fitness)],
                    quota: 0,
                });
                *next_id += 1;
            }
        }
    }

    sp.retain(|s| !s.is_empty());
    sp
}

/// Allocate each specie a share of `population` in proportion to its adjusted fitness, which
/// is clamped to be non-negative. If no specie has any adjusted fitness to share, the population
/// is instead shared in proportion to headcount.
pub fn population_alloc(species: &mut [Specie], population: usize) {
    let fitted = species
        .iter()
        .map(|s| {
            let fit = s.fit_adjusted();
            if fit.is_nan() {
                0.
            } else {
                fit.max(0.)
            }
        })
        .collect::<Vec<_>>();

    let fit_total = fitted.iter().sum::<f64>();
    let population_f = population as f64;
    if fit_total > 0. && fit_total.is_finite() {
        for (specie, fit) in species.iter_mut().zip(fitted) {
            specie.quota = f64::round(population_f * fit / fit_total) as usize;
        }
    } else {
        let headcount = species.iter().map(Specie::len).sum::<usize>() as f64;
        for specie in species.iter_mut() {
            specie.quota = if headcount > 0. {
                f64::round(population_f * specie.len() as f64 / headcount) as usize
            } else {
                0
            };
        }
    }
}

/// A uniformly drawn representative for every specie, to speciate the next generation against
pub fn next_reprs(species: &[Specie], rng: &mut impl RngCore) -> Vec<(usize, SpecieRepr)> {
    species
        .iter()
        .filter_map(|s| {
            s.members
                .choose(rng)
                .map(|(genome, _)| (s.id, SpecieRepr::new(genome.connections().to_vec())))
        })
        .collect()
}
