#![allow(dead_code)]

use criterion::Criterion;
use neatline::{
    random::{percent, EvolutionEvent, ProbBinding, ProbStatic, WyRng},
    Genome, InnoGen,
};

pub type BenchRng = ProbBinding<ProbStatic, WyRng>;

pub fn rng(seed: u64) -> BenchRng {
    ProbBinding::new(ProbStatic::default(), WyRng::seeded(seed))
}

/// A genome grown from a fully connected one by `rounds` structural mutations
pub fn grown(inputs: usize, outputs: usize, rounds: usize, seed: u64) -> (Genome, InnoGen) {
    let mut inno = InnoGen::new(inputs + outputs);
    let mut rng = ProbBinding::new(
        ProbStatic::default().with_overrides(&[
            (EvolutionEvent::BisectConnection, percent(40)),
            (EvolutionEvent::NewConnection, percent(90)),
        ]),
        WyRng::seeded(seed),
    );
    let mut genome = Genome::new(inputs, outputs, &mut rng, &mut inno);
    for _ in 0..rounds {
        genome = genome.mutate(&mut rng, &mut inno);
    }
    (genome, inno)
}

pub fn criterion(sample_size: usize) -> Criterion {
    #[cfg(not(feature = "smol_bench"))]
    let criterion = Criterion::default()
        .sample_size(sample_size)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let criterion = {
        use core::time::Duration;
        let _ = sample_size;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    criterion
}
