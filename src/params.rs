use crate::{
    constants::{
        NEATLINE_DISJOINT_COEFFICIENT, NEATLINE_EXCESS_COEFFICIENT, NEATLINE_GENERATIONS,
        NEATLINE_NORMALIZATION_THRESHOLD, NEATLINE_POPULATION_SIZE, NEATLINE_SPECIE_THRESHOLD,
        NEATLINE_WEIGHT_COEFFICIENT,
    },
    error::ConfigError,
    network::Activation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// weight of excess genes in [crate::crossover::delta]
    pub c1: f64,
    /// weight of disjoint genes
    pub c2: f64,
    /// weight of mean matching-gene weight difference
    pub c3: f64,
    /// genomes within this distance of a species' representative join it
    pub species_threshold: f64,
    pub population_size: usize,
    pub generations: usize,
    pub activation: Activation,
    /// delta is only normalized by gene count once a genome has this many genes
    pub normalize_threshold: usize,
    /// whether disabled genes count toward the normalizing gene count
    pub count_disabled_genes: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            c1: NEATLINE_EXCESS_COEFFICIENT,
            c2: NEATLINE_DISJOINT_COEFFICIENT,
            c3: NEATLINE_WEIGHT_COEFFICIENT,
            species_threshold: NEATLINE_SPECIE_THRESHOLD,
            population_size: NEATLINE_POPULATION_SIZE,
            generations: NEATLINE_GENERATIONS,
            activation: Activation::default(),
            normalize_threshold: NEATLINE_NORMALIZATION_THRESHOLD,
            count_disabled_genes: true,
        }
    }
}

impl Parameters {
    /// Parse and validate parameters, filling anything unnamed with its default
    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        let params = serde_json::from_str::<Self>(src)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.species_threshold.is_nan() || self.species_threshold < 0. {
            return Err(ConfigError::InvalidThreshold(self.species_threshold));
        }
        for (name, value) in [("c1", self.c1), ("c2", self.c2), ("c3", self.c3)] {
            if !value.is_finite() || value < 0. {
                return Err(ConfigError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}
