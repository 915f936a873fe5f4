pub mod connection;
pub mod node;

pub use connection::{clamp_weight, random_weight, ConnectionGene, WeightTweak};
pub use node::{NodeGene, NodeKind};

use crate::{
    constants::NEATLINE_NEW_CONNECTION_EXTRA_ATTEMPTS,
    crossover::crossover,
    error::Error,
    innovation::InnoGen,
    network::{self, Activation},
    random::{uniq_2, EvolutionEvent, Happens},
};
use core::cmp::Ordering;
use fxhash::FxHashSet;
use log::trace;
use rand::{Rng, RngCore};

/// A candidate network: node genes unique by id, and connection genes unique by innovation id
/// kept in ascending innovation order.
///
/// Genomes are never changed once other code may hold them. [Genome::mutate] and
/// [Genome::mate] both build a new genome.
#[derive(Debug, Clone)]
pub struct Genome {
    inputs: usize,
    outputs: usize,
    activation: Activation,
    nodes: Vec<NodeGene>,
    connections: Vec<ConnectionGene>,
}

impl Genome {
    /// A fully connected genome, with an input node for each of `inputs` slots, an output node
    /// for each of `outputs` slots, and one randomly weighted connection per (input, output)
    /// pair. Input nodes take ids `0..inputs`, output nodes follow them.
    pub fn new(inputs: usize, outputs: usize, rng: &mut impl RngCore, inno: &mut InnoGen) -> Self {
        let nodes = (0..inputs)
            .map(|slot| NodeGene::input(slot, slot))
            .chain((0..outputs).map(|slot| NodeGene::output(inputs + slot, slot)))
            .collect::<Vec<_>>();

        let mut connections = Vec::with_capacity(inputs * outputs);
        for from in 0..inputs {
            for to in inputs..inputs + outputs {
                connections.push(ConnectionGene::new(from, to, random_weight(rng), inno));
            }
        }

        Self::from_parts(inputs, outputs, nodes, connections)
    }

    /// Assemble a genome from existing genes, sorting connections by innovation id.
    /// Structure is not otherwise checked; [Genome::evaluate] reports dangling connections.
    pub fn from_parts(
        inputs: usize,
        outputs: usize,
        nodes: Vec<NodeGene>,
        mut connections: Vec<ConnectionGene>,
    ) -> Self {
        connections.sort_by_key(|c| c.inno);
        Self {
            inputs,
            outputs,
            activation: Activation::default(),
            nodes,
            connections,
        }
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    #[inline]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeGene] {
        &self.nodes
    }

    #[inline]
    pub fn connections(&self) -> &[ConnectionGene] {
        &self.connections
    }

    pub fn node(&self, id: usize) -> Option<&NodeGene> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Map an input vector to an output vector, see [network::evaluate]
    pub fn evaluate(&self, input: &[f64]) -> Result<Vec<f64>, Error> {
        network::evaluate(self, input)
    }

    /// A mutated copy of this genome. Weights may be perturbed, and independently either a
    /// connection is bisected or, failing that roll, a new connection is opened.
    pub fn mutate(&self, rng: &mut (impl RngCore + Happens), inno: &mut InnoGen) -> Self {
        let mut child = self.clone();
        if rng.happens(EvolutionEvent::MutateWeights) {
            child.mutate_params(rng);
        }
        if rng.happens(EvolutionEvent::BisectConnection) {
            child.bisect_connection(rng, inno);
        } else if rng.happens(EvolutionEvent::NewConnection) {
            child.new_connection(rng, inno);
        }
        child
    }

    /// Change every weight with a single tweak, or occasionally redraw all of them
    pub fn mutate_params(&mut self, rng: &mut (impl RngCore + Happens)) {
        if rng.happens(EvolutionEvent::NewWeights) {
            for c in self.connections.iter_mut() {
                c.weight = random_weight(rng);
            }
        } else {
            let tweak = WeightTweak::roll(rng);
            for c in self.connections.iter_mut() {
                c.weight = tweak.apply(c.weight);
            }
        }
    }

    /// Bisect a random connection, returning the new node's id
    pub fn bisect_connection(&mut self, rng: &mut impl RngCore, inno: &mut InnoGen) -> Option<usize> {
        if self.connections.is_empty() {
            trace!("no connections available to bisect");
            return None;
        }
        let idx = rng.random_range(0..self.connections.len());
        self.bisect(idx, inno)
    }

    /// Replace the connection at `idx` with a hidden node and a connection on either side of it.
    /// Returns the hidden node's id, or None if the split this generation would reuse a node
    /// this genome already has.
    pub fn bisect(&mut self, idx: usize, inno: &mut InnoGen) -> Option<usize> {
        let path = self.connections.get(idx)?.path();
        let center = inno.split(path);
        if self.node(center).is_some() {
            trace!("split of {path:?} already present as node {center}");
            return None;
        }

        let old = self.connections.remove(idx);
        let (l, r) = old.bisect(center, inno);
        self.nodes.push(NodeGene::hidden(center));
        self.connections.push(l);
        self.connections.push(r);
        self.connections.sort_by_key(|c| c.inno);
        Some(center)
    }

    /// Open a connection between two distinct nodes that aren't already connected, where the
    /// source isn't an output and the target isn't an input. Gives up quietly after
    /// `C(nodes, 2) + 50` attempts.
    pub fn new_connection(
        &mut self,
        rng: &mut impl RngCore,
        inno: &mut InnoGen,
    ) -> Option<(usize, usize)> {
        let n = self.nodes.len();
        let attempts = n * n.saturating_sub(1) / 2 + NEATLINE_NEW_CONNECTION_EXTRA_ATTEMPTS;
        for _ in 0..attempts {
            let (from, to) = match uniq_2(&self.nodes, rng) {
                Some((from, to)) => (*from, *to),
                None => break,
            };
            if !from.sources() || !to.targets() {
                continue;
            }
            let path = (from.id, to.id);
            if self.connections.iter().any(|c| c.path() == path) {
                continue;
            }

            let weight = random_weight(rng);
            self.connections
                .push(ConnectionGene::new(path.0, path.1, weight, inno));
            self.connections.sort_by_key(|c| c.inno);
            return Some(path);
        }

        trace!("no open path found in {attempts} attempts");
        None
    }

    /// Crossover with other, where `fitness_cmp` is our fitness compared to theirs.
    /// See [crossover] for how genes are picked. The child keeps every input and output node,
    /// and whichever hidden nodes its connections still reference.
    pub fn mate(
        &self,
        other: &Self,
        fitness_cmp: Ordering,
        rng: &mut (impl RngCore + Happens),
    ) -> Self {
        let connections = crossover(&self.connections, &other.connections, fitness_cmp, rng);

        let referenced = connections
            .iter()
            .flat_map(|c| [c.from, c.to])
            .collect::<FxHashSet<_>>();
        let mut seen = FxHashSet::default();
        let mut nodes = self
            .nodes
            .iter()
            .chain(other.nodes.iter())
            .filter(|n| !matches!(n.kind, NodeKind::Hidden) || referenced.contains(&n.id))
            .filter(|n| seen.insert(n.id))
            .copied()
            .collect::<Vec<_>>();
        nodes.sort_by_key(|n| n.id);

        Self {
            inputs: self.inputs,
            outputs: self.outputs,
            activation: self.activation,
            nodes,
            connections,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        assert_f64_approx,
        random::{percent, ProbBinding, ProbStatic, WyRng},
        test_t,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn rng_with(overrides: &[(EvolutionEvent, u64)], seed: u64) -> ProbBinding<ProbStatic, WyRng> {
        ProbBinding::new(
            ProbStatic::default().with_overrides(overrides),
            WyRng::seeded(seed),
        )
    }

    fn assert_innos_unique(genome: &Genome) {
        let innos = genome.connections().iter().map(|c| c.inno).collect::<HashSet<_>>();
        assert_eq!(innos.len(), genome.connections().len(), "{genome:?}");
    }

    fn assert_well_formed(genome: &Genome) {
        assert_innos_unique(genome);
        assert!(genome.connections().windows(2).all(|w| w[0].inno < w[1].inno));
        for c in genome.connections() {
            let from = genome.node(c.from).expect("source exists");
            let to = genome.node(c.to).expect("target exists");
            assert!(from.sources(), "output used as source: {c:?}");
            assert!(to.targets(), "input used as target: {c:?}");
        }
    }

    #[test]
    fn test_genome_creation() {
        let mut inno = InnoGen::new(5);
        let genome = Genome::new(3, 2, &mut WyRng::seeded(1), &mut inno);
        assert_eq!(genome.nodes().len(), 5);
        assert_eq!(genome.connections().len(), 6);
        assert_eq!(
            genome.nodes().iter().filter(|n| matches!(n.kind, NodeKind::Input)).count(),
            3
        );
        assert_eq!(genome.node(3), Some(&NodeGene::output(3, 0)));

        let paths = genome.connections().iter().map(|c| c.path()).collect::<HashSet<_>>();
        for from in 0..3 {
            for to in 3..5 {
                assert!(paths.contains(&(from, to)));
            }
        }
        assert_well_formed(&genome);
    }

    #[test]
    fn test_genome_creation_shares_innovations() {
        let mut inno = InnoGen::new(3);
        let mut rng = WyRng::seeded(2);
        let l = Genome::new(2, 1, &mut rng, &mut inno);
        let r = Genome::new(2, 1, &mut rng, &mut inno);
        assert_eq!(
            l.connections().iter().map(|c| c.inno).collect::<Vec<_>>(),
            r.connections().iter().map(|c| c.inno).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_bisect() {
        let mut inno = InnoGen::new(2);
        let mut genome = Genome::new(1, 1, &mut WyRng::seeded(3), &mut inno);
        let old = genome.connections()[0].clone();

        let center = genome.bisect(0, &mut inno).unwrap();

        assert_eq!(genome.nodes().len(), 3);
        assert_eq!(genome.connections().len(), 2);
        assert_eq!(genome.node(center), Some(&NodeGene::hidden(center)));
        assert!(!genome.connections().iter().any(|c| c.inno == old.inno));

        let into = genome.connections().iter().find(|c| c.to == center).unwrap();
        let out_of = genome.connections().iter().find(|c| c.from == center).unwrap();
        assert_eq!(into.from, old.from);
        assert_eq!(out_of.to, old.to);
        assert_f64_approx!(into.weight, 1.);
        assert_f64_approx!(out_of.weight, old.weight);
        assert_well_formed(&genome);
    }

    #[test]
    fn test_bisect_same_generation_collapses() {
        let mut inno = InnoGen::new(2);
        let mut rng = WyRng::seeded(4);
        let mut l = Genome::new(1, 1, &mut rng, &mut inno);
        let mut r = Genome::new(1, 1, &mut rng, &mut inno);
        assert_eq!(l.bisect(0, &mut inno), r.bisect(0, &mut inno));
        assert_eq!(
            l.connections().iter().map(|c| c.inno).collect::<Vec<_>>(),
            r.connections().iter().map(|c| c.inno).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_bisect_no_connections() {
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(0, 0, &mut WyRng::seeded(5), &mut inno);
        assert_eq!(genome.bisect_connection(&mut WyRng::seeded(5), &mut inno), None);
        assert!(genome.nodes().is_empty());
    }

    #[test]
    fn test_new_connection_legal() {
        let mut inno = InnoGen::new(5);
        let mut rng = WyRng::seeded(6);
        let base = {
            let mut g = Genome::new(3, 2, &mut rng, &mut inno);
            g.bisect(0, &mut inno);
            g.bisect(0, &mut inno);
            g
        };

        for _ in 0..500 {
            let mut genome = base.clone();
            if let Some((from, to)) = genome.new_connection(&mut rng, &mut inno) {
                assert_ne!(from, to);
                assert_eq!(genome.connections().len(), base.connections().len() + 1);
                assert!(!base.connections().iter().any(|c| c.path() == (from, to)));
            }
            assert_well_formed(&genome);
        }
    }

    #[test]
    fn test_new_connection_saturated() {
        let mut inno = InnoGen::new(2);
        let mut genome = Genome::new(1, 1, &mut WyRng::seeded(7), &mut inno);
        let before = genome.connections().to_vec();
        assert_eq!(genome.new_connection(&mut WyRng::seeded(7), &mut inno), None);
        assert_eq!(genome.connections(), &before[..]);
    }

    #[test]
    fn test_new_connection_finds_only_gap() {
        let mut inno = InnoGen::new(3);
        let mut genome = Genome::new(2, 1, &mut WyRng::seeded(8), &mut inno);
        let center = genome.bisect(0, &mut inno).unwrap();
        // either the bisected path reopens, or the second input reaches the new node
        let open = genome.new_connection(&mut WyRng::seeded(8), &mut inno).unwrap();
        assert!(open == (0, 2) || open == (1, center), "{open:?}");
        assert_well_formed(&genome);
    }

    #[test]
    fn test_mutate_copy_on_write() {
        let mut inno = InnoGen::new(3);
        let mut rng = rng_with(
            &[
                (EvolutionEvent::MutateWeights, u64::MAX),
                (EvolutionEvent::BisectConnection, u64::MAX),
            ],
            9,
        );
        let parent = Genome::new(2, 1, &mut rng, &mut inno);
        let snapshot = parent.clone();

        let child = parent.mutate(&mut rng, &mut inno);

        assert_eq!(parent.connections(), snapshot.connections());
        assert_eq!(parent.nodes(), snapshot.nodes());
        assert_eq!(child.nodes().len(), parent.nodes().len() + 1);
        assert_eq!(child.connections().len(), parent.connections().len() + 1);
    }

    #[test]
    fn test_mutate_params_redraw_clamped() {
        let mut inno = InnoGen::new(4);
        let mut rng = rng_with(&[(EvolutionEvent::NewWeights, u64::MAX)], 10);
        let mut genome = Genome::new(2, 2, &mut rng, &mut inno);
        let before = genome.connections().to_vec();
        genome.mutate_params(&mut rng);
        assert!(genome
            .connections()
            .iter()
            .zip(&before)
            .any(|(l, r)| l.weight != r.weight));
        assert!(genome
            .connections()
            .iter()
            .all(|c| (-8. ..=8.).contains(&c.weight)));
    }

    #[test]
    fn test_mutate_params_single_tweak() {
        let mut inno = InnoGen::new(3);
        let mut rng = rng_with(&[(EvolutionEvent::NewWeights, 0)], 11);
        let mut genome = Genome::from_parts(
            2,
            1,
            vec![NodeGene::input(0, 0), NodeGene::input(1, 1), NodeGene::output(2, 0)],
            vec![
                ConnectionGene::new(0, 2, 1., &mut inno),
                ConnectionGene::new(1, 2, 1., &mut inno),
            ],
        );
        genome.mutate_params(&mut rng);
        // the same tweak applies to every weight
        assert_f64_approx!(genome.connections()[0].weight, genome.connections()[1].weight);
    }

    test_t!(
    mutate_keeps_invariants[T: WyRng | StdRng]() {
        let mut inno = InnoGen::new(5);
        let mut rng = ProbBinding::new(
            ProbStatic::default().with_overrides(&[
                (EvolutionEvent::BisectConnection, percent(30)),
                (EvolutionEvent::NewConnection, percent(60)),
            ]),
            T::seed_from_u64(12),
        );
        let mut genome = Genome::new(3, 2, &mut rng, &mut inno);
        for generation in 0..200 {
            if generation % 10 == 0 {
                inno.reset();
            }
            genome = genome.mutate(&mut rng, &mut inno);
            assert_well_formed(&genome);
        }
    });

    #[test]
    fn test_grown_genomes_evaluate() {
        // every node a mutation adds is reachable from an input, so cycles always have a way in
        let mut rng = rng_with(
            &[
                (EvolutionEvent::BisectConnection, percent(10)),
                (EvolutionEvent::NewConnection, percent(30)),
            ],
            17,
        );
        for _ in 0..200 {
            let mut inno = InnoGen::new(3);
            let mut genome = Genome::new(2, 1, &mut rng, &mut inno);
            for _ in 0..60 {
                genome = genome.mutate(&mut rng, &mut inno);
            }
            let output = genome.evaluate(&[0.5, -1.]);
            assert!(output.is_ok(), "{output:?} from {genome:?}");
        }
    }

    #[test]
    fn test_mate_fitter_right_keeps_all_of_right() {
        let mut inno = InnoGen::new(3);
        let mut rng = WyRng::seeded(13);
        let l = Genome::new(2, 1, &mut rng, &mut inno);
        let mut r = l.clone();
        r.bisect(0, &mut inno);
        r.new_connection(&mut rng, &mut inno);

        let mut rng = rng_with(&[], 13);
        for _ in 0..100 {
            let child = l.mate(&r, Ordering::Less, &mut rng);
            let innos = child.connections().iter().map(|c| c.inno).collect::<HashSet<_>>();
            for c in r.connections() {
                assert!(innos.contains(&c.inno), "missing {c:?}");
            }
            assert_eq!(child.connections().len(), r.connections().len());
            assert_eq!(child.nodes().len(), r.nodes().len());
            assert_well_formed(&child);
        }
    }

    #[test]
    fn test_mate_fitter_left_drops_right_genes() {
        let mut inno = InnoGen::new(3);
        let mut rng = WyRng::seeded(14);
        let l = Genome::new(2, 1, &mut rng, &mut inno);
        let mut r = l.clone();
        let center = r.bisect(0, &mut inno).unwrap();

        let child = l.mate(&r, Ordering::Greater, &mut rng_with(&[], 14));
        assert_eq!(child.connections().len(), l.connections().len());
        assert!(child.node(center).is_none());
        assert_eq!(child.nodes().len(), 3);
    }

    #[test]
    fn test_mate_tie() {
        let mut inno = InnoGen::new(3);
        let mut rng = WyRng::seeded(15);
        let l = Genome::new(2, 1, &mut rng, &mut inno);
        let mut r = l.clone();
        r.bisect(0, &mut inno);

        // one gene matches, l has one gene r lacks, r has two genes l lacks
        let child = l.mate(&r, Ordering::Equal, &mut rng_with(&[(EvolutionEvent::KeepTied, 0)], 15));
        assert_eq!(child.connections().len(), 1);

        let child = l.mate(
            &r,
            Ordering::Equal,
            &mut rng_with(&[(EvolutionEvent::KeepTied, u64::MAX)], 15),
        );
        assert_eq!(child.connections().len(), 4);
        assert_eq!(child.nodes().len(), 4);
    }

    #[test]
    fn test_mate_picks_matching_from_both() {
        let mut inno = InnoGen::new(3);
        let mut rng = WyRng::seeded(16);
        let l = Genome::new(2, 1, &mut rng, &mut inno);
        let r = l.mutate(
            &mut rng_with(
                &[
                    (EvolutionEvent::MutateWeights, u64::MAX),
                    (EvolutionEvent::BisectConnection, 0),
                    (EvolutionEvent::NewConnection, 0),
                ],
                16,
            ),
            &mut inno,
        );
        let mut rng = rng_with(&[], 16);
        let (mut from_l, mut from_r) = (0, 0);
        for _ in 0..200 {
            let child = l.mate(&r, Ordering::Equal, &mut rng);
            let w = child.connections()[0].weight;
            if w == l.connections()[0].weight {
                from_l += 1;
            } else if w == r.connections()[0].weight {
                from_r += 1;
            }
        }
        assert!(from_l > 50 && from_r > 50, "{from_l} / {from_r}");
    }
}
