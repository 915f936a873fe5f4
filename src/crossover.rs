use crate::{
    genome::ConnectionGene,
    params::Parameters,
    random::{EvolutionEvent, Happens},
};
use core::cmp::Ordering;
use rand::RngCore;

/// Two parents' connection genes, partitioned by innovation id
#[derive(Debug, Default)]
pub struct Alignment<'a> {
    /// genes sharing an innovation id, as (left, right)
    pub matching: Vec<(&'a ConnectionGene, &'a ConnectionGene)>,
    pub l_disjoint: Vec<&'a ConnectionGene>,
    pub r_disjoint: Vec<&'a ConnectionGene>,
    pub l_excess: Vec<&'a ConnectionGene>,
    pub r_excess: Vec<&'a ConnectionGene>,
}

impl Alignment<'_> {
    #[inline]
    pub fn excess(&self) -> usize {
        self.l_excess.len() + self.r_excess.len()
    }

    #[inline]
    pub fn disjoint(&self) -> usize {
        self.l_disjoint.len() + self.r_disjoint.len()
    }
}

/// Align two connection lists, each ascending by innovation id. A gene found in only one list
/// is disjoint if its id is below the other list's highest id, and excess otherwise.
pub fn align<'a>(l: &'a [ConnectionGene], r: &'a [ConnectionGene]) -> Alignment<'a> {
    let l_max = l.last().map(|c| c.inno);
    let r_max = r.last().map(|c| c.inno);
    let below = |max: Option<usize>, c: &ConnectionGene| max.is_some_and(|m| c.inno < m);

    let mut alignment = Alignment::default();
    let (mut l_idx, mut r_idx) = (0, 0);
    loop {
        let (lc, rc) = (l.get(l_idx), r.get(r_idx));
        let left_first = match (lc, rc) {
            (None, None) => break,
            (Some(lc), Some(rc)) if lc.inno == rc.inno => {
                alignment.matching.push((lc, rc));
                l_idx += 1;
                r_idx += 1;
                continue;
            }
            (Some(lc), Some(rc)) => lc.inno < rc.inno,
            (Some(_), None) => true,
            (None, Some(_)) => false,
        };

        if let (true, Some(lc)) = (left_first, lc) {
            if below(r_max, lc) {
                alignment.l_disjoint.push(lc);
            } else {
                alignment.l_excess.push(lc);
            }
            l_idx += 1;
        } else if let Some(rc) = rc {
            if below(l_max, rc) {
                alignment.r_disjoint.push(rc);
            } else {
                alignment.r_excess.push(rc);
            }
            r_idx += 1;
        }
    }

    alignment
}

/// Count of (disjoint, excess) genes between two connection lists
pub fn disjoint_excess_count(l: &[ConnectionGene], r: &[ConnectionGene]) -> (f64, f64) {
    let alignment = align(l, r);
    (alignment.disjoint() as f64, alignment.excess() as f64)
}

/// Mean absolute weight difference of matching genes, or 0 if no genes match
pub fn avg_param_diff(l: &[ConnectionGene], r: &[ConnectionGene]) -> f64 {
    mean_param_diff(&align(l, r))
}

fn mean_param_diff(alignment: &Alignment<'_>) -> f64 {
    if alignment.matching.is_empty() {
        0.
    } else {
        alignment
            .matching
            .iter()
            .map(|(l, r)| l.param_diff(r))
            .sum::<f64>()
            / alignment.matching.len() as f64
    }
}

/// Compatibility distance `c1·E/N + c2·D/N + c3·W` between two connection lists.
///
/// N is the size of the larger list, and is floored to 1 while both lists are smaller than
/// [Parameters::normalize_threshold]. Disabled genes count toward N only when
/// [Parameters::count_disabled_genes] is set.
pub fn delta(l: &[ConnectionGene], r: &[ConnectionGene], params: &Parameters) -> f64 {
    let alignment = align(l, r);

    let size = |genes: &[ConnectionGene]| {
        if params.count_disabled_genes {
            genes.len()
        } else {
            genes.iter().filter(|c| c.enabled).count()
        }
    };
    let (l_size, r_size) = (size(l), size(r));
    let n = if l_size < params.normalize_threshold && r_size < params.normalize_threshold {
        1.
    } else {
        l_size.max(r_size) as f64
    };

    params.c1 * alignment.excess() as f64 / n
        + params.c2 * alignment.disjoint() as f64 / n
        + params.c3 * mean_param_diff(&alignment)
}

/// Build a child's connections from two parents, where `l_fit` is how the left parent's
/// fitness compares to the right's.
///
/// Each matching pair contributes one of its genes, picked at random. Genes only one parent
/// has are inherited from the fitter parent and dropped from the weaker one; when fitness is
/// tied each is kept by chance. A matching gene disabled in either parent stays disabled
/// unless it loses the [EvolutionEvent::KeepDisabled] roll.
pub fn crossover(
    l: &[ConnectionGene],
    r: &[ConnectionGene],
    l_fit: Ordering,
    rng: &mut (impl RngCore + Happens),
) -> Vec<ConnectionGene> {
    let alignment = align(l, r);
    let mut child = Vec::with_capacity(l.len().max(r.len()));

    for (lc, rc) in alignment.matching {
        let mut gene = if rng.happens(EvolutionEvent::PickLeft) {
            lc.clone()
        } else {
            rc.clone()
        };
        if !(lc.enabled && rc.enabled) {
            gene.enabled = !rng.happens(EvolutionEvent::KeepDisabled);
        }
        child.push(gene);
    }

    let l_only = alignment.l_disjoint.into_iter().chain(alignment.l_excess);
    let r_only = alignment.r_disjoint.into_iter().chain(alignment.r_excess);
    match l_fit {
        Ordering::Greater => child.extend(l_only.cloned()),
        Ordering::Less => child.extend(r_only.cloned()),
        Ordering::Equal => {
            for gene in l_only.chain(r_only) {
                if rng.happens(EvolutionEvent::KeepTied) {
                    child.push(gene.clone());
                }
            }
        }
    }

    child.sort_by_key(|c| c.inno);
    child
}
