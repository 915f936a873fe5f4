use crate::{
    error::{ConfigError, Error},
    genome::Genome,
    params::Parameters,
    population::{Fitness, Population, Stats},
    random::{DefaultRng, Happens},
};
use core::ops::ControlFlow;
use log::info;
use rand::RngCore;

/// Called with each generation's [Stats]. Returning [ControlFlow::Break] ends training early.
pub type Hook = Box<dyn FnMut(&Stats) -> ControlFlow<()>>;

/// Evolves a [Population] toward whatever its fitness function scores highest
pub struct Trainer<F: Fitness, R: RngCore + Happens = DefaultRng> {
    population: Population,
    fitness: F,
    rng: R,
    hooks: Vec<Hook>,
    best: Option<(Genome, f64)>,
}

impl<F: Fitness> Trainer<F> {
    /// A trainer evolving genomes with `inputs` inputs and `outputs` outputs toward whatever
    /// `fitness` scores highest, using the default mutation probabilities and a randomly seeded
    /// generator.
    pub fn new(
        inputs: usize,
        outputs: usize,
        fitness: F,
        params: Parameters,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(inputs, outputs, fitness, params, DefaultRng::default())
    }
}

impl<F: Fitness, R: RngCore + Happens> Trainer<F, R> {
    /// Like [Trainer::new], drawing every random decision from `rng`
    pub fn with_rng(
        inputs: usize,
        outputs: usize,
        fitness: F,
        params: Parameters,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        if inputs == 0 {
            return Err(ConfigError::NoInputs);
        }
        if outputs == 0 {
            return Err(ConfigError::NoOutputs);
        }
        params.validate()?;

        Ok(Self {
            population: Population::new(inputs, outputs, params, &mut rng),
            fitness,
            rng,
            hooks: Vec::new(),
            best: None,
        })
    }

    pub fn add_hook(&mut self, hook: impl FnMut(&Stats) -> ControlFlow<()> + 'static) -> &mut Self {
        self.hooks.push(Box::new(hook));
        self
    }

    #[inline]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Evolve for the configured number of generations, or until a hook breaks, then keep the
    /// fittest genome of the final population. Training again continues from that population.
    pub fn train(&mut self) {
        let generations = self.population.params().generations;
        for _ in 0..generations {
            let stats = self.population.step(&self.fitness, &mut self.rng);

            // every hook sees every generation, even once one has asked to stop
            let stop = self
                .hooks
                .iter_mut()
                .fold(false, |stop, hook| hook(&stats).is_break() || stop);
            if stop {
                info!("stopping early after generation {}", stats.generation);
                break;
            }
        }

        self.best = self.population.fittest(&self.fitness);
        if let Some((_, fitness)) = &self.best {
            info!(
                "trained {} generations, best fitness {fitness}",
                self.population.generation()
            );
        }
    }

    pub fn best_model(&self) -> Result<&Genome, Error> {
        self.best
            .as_ref()
            .map(|(genome, _)| genome)
            .ok_or(Error::ModelNotTrained)
    }

    pub fn best_fitness(&self) -> Result<f64, Error> {
        self.best
            .as_ref()
            .map(|(_, fitness)| *fitness)
            .ok_or(Error::ModelNotTrained)
    }

    pub fn evaluate_with_best_model(&self, input: &[f64]) -> Result<Vec<f64>, Error> {
        self.best_model()?.evaluate(input)
    }
}
