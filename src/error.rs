/// Failures of a single genome evaluation, or of asking for a model that doesn't exist yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Outputs were still unresolved after `limit` relaxation passes, which happens when a cycle
    /// has no acyclic entry. Callers usually score this as the worst possible fitness.
    #[error("evaluation did not resolve every output within {limit} passes")]
    EvaluateOverflow { limit: usize },

    /// A connection names a node that isn't part of the genome. This is structural corruption.
    #[error("connection {inno} references missing node {node}")]
    MissingNode { inno: usize, node: usize },

    #[error("expected {expected} inputs, got {got}")]
    InputSize { expected: usize, got: usize },

    #[error("model has not been trained")]
    ModelNotTrained,
}

/// Rejected training configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("input count must be non-zero")]
    NoInputs,
    #[error("output count must be non-zero")]
    NoOutputs,
    #[error("population size must be non-zero")]
    EmptyPopulation,
    #[error("species threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),
    #[error("coefficient {name} must be a non-negative number, got {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },
    #[error("failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),
}
