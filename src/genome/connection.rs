use crate::{
    constants::{
        NEATLINE_BISECT_IN_WEIGHT, NEATLINE_JITTER_MAX, NEATLINE_JITTER_MIN, NEATLINE_SCALE_MAX,
        NEATLINE_SCALE_MIN, NEATLINE_TWEAK_FLIP_PROB, NEATLINE_TWEAK_JITTER_PROB,
        NEATLINE_TWEAK_SCALE_PROB, NEATLINE_WEIGHT_MAX, NEATLINE_WEIGHT_MIN,
    },
    innovation::InnoGen,
    random::Breakdown,
};
use rand::{Rng, RngCore};

/// A weighted, directed edge between two node genes
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionGene {
    pub inno: usize,
    pub from: usize,
    pub to: usize,
    pub weight: f64,
    pub enabled: bool,
}

impl ConnectionGene {
    /// An enabled connection along `(from, to)`, whose innovation id comes from `inno`
    pub fn new(from: usize, to: usize, weight: f64, inno: &mut InnoGen) -> Self {
        Self {
            inno: inno.path((from, to)),
            from,
            to,
            weight: clamp_weight(weight),
            enabled: true,
        }
    }

    #[inline]
    pub fn path(&self) -> (usize, usize) {
        (self.from, self.to)
    }

    /// difference of weight between this and another connection with the same innovation id
    #[inline]
    pub fn param_diff(&self, other: &Self) -> f64 {
        (self.weight - other.weight).abs()
    }

    /// The two connections replacing this one when it's split at `center`
    pub fn bisect(&self, center: usize, inno: &mut InnoGen) -> (Self, Self) {
        (
            // from -{1.}> center
            Self::new(self.from, center, NEATLINE_BISECT_IN_WEIGHT, inno),
            // center -{w}> to
            Self::new(center, self.to, self.weight, inno),
        )
    }
}

#[inline]
pub fn clamp_weight(w: f64) -> f64 {
    w.clamp(NEATLINE_WEIGHT_MIN, NEATLINE_WEIGHT_MAX)
}

pub fn random_weight(rng: &mut impl RngCore) -> f64 {
    rng.random_range(NEATLINE_WEIGHT_MIN..=NEATLINE_WEIGHT_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TweakKind {
    Jitter,
    Scale,
    Flip,
}

/// One weight-change function, rolled once and then applied to every weight of a genome
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightTweak {
    Jitter(f64),
    Scale(f64),
    Flip,
}

impl WeightTweak {
    pub fn roll(rng: &mut impl RngCore) -> Self {
        let table = Breakdown::new([
            (TweakKind::Jitter, NEATLINE_TWEAK_JITTER_PROB),
            (TweakKind::Scale, NEATLINE_TWEAK_SCALE_PROB),
            (TweakKind::Flip, NEATLINE_TWEAK_FLIP_PROB),
        ]);

        match table.pick(rng) {
            Some(TweakKind::Jitter) => {
                let amount = rng.random_range(NEATLINE_JITTER_MIN..=NEATLINE_JITTER_MAX);
                Self::Jitter(if rng.random_bool(0.5) { amount } else { -amount })
            }
            Some(TweakKind::Scale) => {
                Self::Scale(rng.random_range(NEATLINE_SCALE_MIN..=NEATLINE_SCALE_MAX))
            }
            Some(TweakKind::Flip) | None => Self::Flip,
        }
    }

    #[inline]
    pub fn apply(self, w: f64) -> f64 {
        clamp_weight(match self {
            Self::Jitter(amount) => w + amount,
            Self::Scale(factor) => w * factor,
            Self::Flip => -w,
        })
    }
}
