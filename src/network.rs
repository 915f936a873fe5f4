//! Expressing a [Genome]'s behaviour. Genomes may be cyclic, so rather than sorting them
//! topologically we relax over the enabled connections until every output resolves.

use crate::{
    constants::NEATLINE_EVALUATE_DEPTH_FACTOR,
    error::Error,
    genome::{Genome, NodeKind},
};
use fxhash::FxHashMap;
use log::trace;
use serde::{Deserialize, Serialize};

pub mod activate {
    use crate::constants::NEATLINE_SIGMOID_STEEPNESS;
    use core::f64::consts::E;

    pub fn steep_sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-NEATLINE_SIGMOID_STEEPNESS * x))
    }

    pub fn sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-x))
    }

    pub fn relu(x: f64) -> f64 {
        if x < 0. {
            0.
        } else {
            x
        }
    }

    pub fn identity(x: f64) -> f64 {
        x
    }
}

/// The activation function applied to every resolved non-input node
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `1 / (1 + e^(-4.9x))`
    #[default]
    SteepSigmoid,
    Sigmoid,
    Tanh,
    Relu,
    Identity,
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Activation {
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Self::SteepSigmoid => activate::steep_sigmoid(x),
            Self::Sigmoid => activate::sigmoid(x),
            Self::Tanh => x.tanh(),
            Self::Relu => activate::relu(x),
            Self::Identity => activate::identity(x),
            Self::Custom(σ) => σ(x),
        }
    }
}

/// Evaluate genome against input, which must have one value per input slot.
///
/// A connection fires once its source is resolved, adding `weight * source` to its target. A
/// node resolves once every enabled connection into it has fired; a node with none resolves to
/// `σ(0)` straight away. We make passes over the unfired connections until every output is
/// resolved. When a pass fires nothing the remaining connections wait on each other in a cycle,
/// so every unresolved node that some connection has already reached resolves from its partial
/// sum, and its back-edges are dropped. If no such node exists the cycle has no way in, and we
/// fail with [Error::EvaluateOverflow], as we do once we run out of passes.
pub fn evaluate(genome: &Genome, input: &[f64]) -> Result<Vec<f64>, Error> {
    if input.len() != genome.inputs() {
        return Err(Error::InputSize {
            expected: genome.inputs(),
            got: input.len(),
        });
    }

    let σ = genome.activation();
    let nodes = genome.nodes();
    let index = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id, idx))
        .collect::<FxHashMap<_, _>>();

    let lookup = |inno: usize, node: usize| {
        index
            .get(&node)
            .copied()
            .ok_or(Error::MissingNode { inno, node })
    };

    let mut unfired = Vec::with_capacity(genome.connections().len());
    for c in genome.connections() {
        let (from, to) = (lookup(c.inno, c.from)?, lookup(c.inno, c.to)?);
        if c.enabled && !matches!(nodes[to].kind, NodeKind::Input) {
            unfired.push((from, to, c.weight));
        }
    }

    let mut pending = vec![0usize; nodes.len()];
    for (_, to, _) in &unfired {
        pending[*to] += 1;
    }

    let mut sum = vec![0.; nodes.len()];
    let mut fired = vec![false; nodes.len()];
    let mut value = nodes
        .iter()
        .zip(&pending)
        .map(|(node, pending)| match (node.kind, node.slot) {
            (NodeKind::Input, Some(slot)) => input.get(slot).copied(),
            (NodeKind::Input, None) => Some(0.),
            (_, _) if *pending == 0 => Some(σ.apply(0.)),
            _ => None,
        })
        .collect::<Vec<Option<f64>>>();

    let outputs = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| matches!(node.kind, NodeKind::Output))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();

    let limit = NEATLINE_EVALUATE_DEPTH_FACTOR * unfired.len();
    let mut depth = 0;
    while outputs.iter().any(|idx| value[*idx].is_none()) {
        if depth >= limit {
            return Err(Error::EvaluateOverflow { limit });
        }
        depth += 1;

        let before = unfired.len();
        unfired.retain(|&(from, to, weight)| match value[from] {
            Some(v) => {
                sum[to] += weight * v;
                fired[to] = true;
                pending[to] -= 1;
                if pending[to] == 0 {
                    value[to] = Some(σ.apply(sum[to]));
                }
                false
            }
            None => true,
        });

        if unfired.len() == before {
            // stalled in a cycle: nodes it has entered resolve from what has reached them so far
            let stalled = (0..nodes.len())
                .filter(|idx| value[*idx].is_none() && fired[*idx])
                .collect::<Vec<_>>();
            if stalled.is_empty() {
                return Err(Error::EvaluateOverflow { limit });
            }

            trace!("forcing {} nodes stalled in a cycle", stalled.len());
            for idx in stalled {
                value[idx] = Some(σ.apply(sum[idx]));
            }
            unfired.retain(|(_, to, _)| value[*to].is_none());
        }
    }

    let mut output = vec![0.; genome.outputs()];
    for idx in outputs {
        if let (Some(slot), Some(v)) = (nodes[idx].slot, value[idx]) {
            if let Some(o) = output.get_mut(slot) {
                *o = v;
            }
        }
    }

    Ok(output)
}
