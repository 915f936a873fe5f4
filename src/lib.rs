#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

pub mod constants;
pub mod crossover;
pub mod error;
pub mod genome;
pub mod innovation;
mod macros;
pub mod network;
pub mod params;
pub mod population;
pub mod random;
pub mod reproduce;
pub mod specie;
pub mod trainer;

pub use error::{ConfigError, Error};
pub use genome::{ConnectionGene, Genome, NodeGene, NodeKind};
pub use innovation::InnoGen;
pub use network::{activate, Activation};
pub use params::Parameters;
pub use population::{Fitness, Population, Stats};
pub use random::{Happens, Probabilities};
pub use specie::Specie;
pub use trainer::{Hook, Trainer};
