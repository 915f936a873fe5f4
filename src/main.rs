use core::{error::Error, ops::ControlFlow};
use log::info;
use neatline::{Genome, Parameters, Trainer};
use std::{env, fs};

const XOR: [([f64; 2], f64); 4] = [([0., 0.], 0.), ([0., 1.], 1.), ([1., 0.], 1.), ([1., 1.], 0.)];
const GOAL: f64 = 3.9;

fn xor(genome: &Genome) -> f64 {
    XOR.iter()
        .map(|(input, want)| match genome.evaluate(input) {
            Ok(output) => 1. - (want - output[0]).powi(2),
            Err(_) => 0.,
        })
        .sum()
}

/// Evolve an XOR network. Takes an optional path to a JSON file of [Parameters] overrides.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let params = match env::args().nth(1) {
        Some(path) => Parameters::from_json(&fs::read_to_string(path)?)?,
        None => Parameters {
            generations: 300,
            ..Parameters::default()
        },
    };

    let mut trainer = Trainer::new(2, 1, xor, params)?;
    trainer.add_hook(|stats| {
        if stats.generation % 10 == 0 {
            info!(
                "gen {}: {} species, champ {:.4}",
                stats.generation, stats.species, stats.best_fitness
            );
        }
        if stats.best_fitness >= GOAL {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    trainer.train();

    println!("best fitness {:.4}", trainer.best_fitness()?);
    for (input, want) in XOR {
        let output = trainer.evaluate_with_best_model(&input)?;
        println!("{input:?} -> {:.4} (want {want})", output[0]);
    }

    Ok(())
}
