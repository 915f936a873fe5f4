//! Centralized constants for neatline evolution parameters.
//!
//! Fixed tunables are defined here with the `NEATLINE_` prefix. Anything a caller is expected
//! to change per run lives in [crate::params::Parameters] instead.

use crate::random::percent;

// ============================================================================
// Weight Parameters
// ============================================================================

/// Lower bound of every connection weight
pub const NEATLINE_WEIGHT_MIN: f64 = -8.0;

/// Upper bound of every connection weight
pub const NEATLINE_WEIGHT_MAX: f64 = 8.0;

/// Smallest magnitude of an additive weight jitter
pub const NEATLINE_JITTER_MIN: f64 = 0.001;

/// Largest magnitude of an additive weight jitter
pub const NEATLINE_JITTER_MAX: f64 = 0.25;

/// Smallest factor of a multiplicative weight scale
pub const NEATLINE_SCALE_MIN: f64 = 0.5;

/// Largest factor of a multiplicative weight scale
pub const NEATLINE_SCALE_MAX: f64 = 2.0;

/// Likelihood that a weight tweak is an additive jitter
pub const NEATLINE_TWEAK_JITTER_PROB: u64 = percent(70);

/// Likelihood that a weight tweak is a multiplicative scale
pub const NEATLINE_TWEAK_SCALE_PROB: u64 = percent(25);

/// Likelihood that a weight tweak flips the sign
pub const NEATLINE_TWEAK_FLIP_PROB: u64 = percent(5);

// ============================================================================
// Structural Mutation Parameters
// ============================================================================

/// Attempts to find an open path beyond `C(nodes, 2)` before giving up
pub const NEATLINE_NEW_CONNECTION_EXTRA_ATTEMPTS: usize = 50;

/// Relaxation passes allowed per enabled connection during evaluation
pub const NEATLINE_EVALUATE_DEPTH_FACTOR: usize = 2;

/// Weight of the connection leading into a freshly bisected node
pub const NEATLINE_BISECT_IN_WEIGHT: f64 = 1.0;

// ============================================================================
// Default Training Parameters
// ============================================================================

/// Coefficient for excess genes in compatibility distance calculation
pub const NEATLINE_EXCESS_COEFFICIENT: f64 = 1.0;

/// Coefficient for disjoint genes in compatibility distance calculation
pub const NEATLINE_DISJOINT_COEFFICIENT: f64 = 1.0;

/// Coefficient for weight differences in compatibility distance calculation
pub const NEATLINE_WEIGHT_COEFFICIENT: f64 = 0.4;

/// Genetic distance threshold for speciation
pub const NEATLINE_SPECIE_THRESHOLD: f64 = 3.0;

/// Genome size threshold below which delta is not normalized by gene count
pub const NEATLINE_NORMALIZATION_THRESHOLD: usize = 20;

/// Genomes per generation
pub const NEATLINE_POPULATION_SIZE: usize = 150;

/// Generations per training run
pub const NEATLINE_GENERATIONS: usize = 50;

/// Steepness of the default sigmoid activation
pub const NEATLINE_SIGMOID_STEEPNESS: f64 = 4.9;
