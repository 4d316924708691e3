use std::env;
use std::process::ExitCode;

use roboevo::simulation::ecosystem::Ecosystem;
use roboevo::simulation::error::{Result, SimError};
use roboevo::simulation::params::Params;

const DEFAULT_GENERATIONS: u32 = 50;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);

    let params = match args.next() {
        Some(path) => {
            log::info!("loading parameters from {path}");
            Params::load(&path)?
        }
        None => Params::default(),
    };
    let generations = match args.next() {
        Some(count) => count.parse().map_err(|_| {
            SimError::InvalidConfig(format!(
                "generation count '{count}' is not a number"
            ))
        })?,
        None => DEFAULT_GENERATIONS,
    };

    let polarity = params.genetic.polarity;
    let mut ecosystem = Ecosystem::new(params)?;

    for _ in 0..generations {
        if ecosystem.run_generation()?.is_none() {
            log::warn!("stopping early: the population is exhausted");
            break;
        }
    }

    if let Some(best) = ecosystem.history().best_ever(polarity) {
        log::info!(
            "finished after {} generations, best fitness {:.3}",
            ecosystem.generation(),
            best
        );
    }
    Ok(())
}
