use oxiniche::logging::{EcologyLogger, ReportingLevel, Stats};
use oxiniche::{Ecosystem, Parameters, Snapshot};

use anyhow::{ensure, Context, Result};
use rayon::prelude::*;
use tracing::info;

const REPLICATES: u64 = 32;
const ROUNDS: usize = 250;

/// End state of one replicate run.
struct Outcome {
    population: usize,
    mean_entropy: f64,
    stdev_entropy: f64,
    mean_energy: f64,
    mean_survival_fraction: f64,
}

fn main() -> Result<()> {
    init_tracing();

    let parameters = Parameters {
        population_size: 2000,
        chromosome_bytes: 16,
        mean_mutations: 1.5,
        mean_crossovers: 2.0,
        birth_energy: 10.0,
        predation_noise_stdev_coeff: 0.25,
        predation_escape_coeff: 0.5,
        feed_entropy_weight: 10.0,
        mean_starve_energy: 1.0,
        mating_selectivity_mean: 0.5,
        ..Parameters::default()
    };

    replicate_test(&parameters)?;
    serde_test(&parameters)?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Runs independent ecosystems, one per seed, and
/// reports statistics over their final states.
fn replicate_test(parameters: &Parameters) -> Result<()> {
    let outcomes = (0..REPLICATES)
        .into_par_iter()
        .map(|seed| -> Result<Outcome> {
            let mut ecosystem = Ecosystem::new(parameters.clone())?.with_rng_seed(seed);
            let mut logger = EcologyLogger::new(ReportingLevel::NoAgents);
            ecosystem
                .run_logged(ROUNDS, &mut logger)
                .with_context(|| format!("replicate {} failed", seed))?;

            info!(
                seed,
                population = ecosystem.agents().len(),
                mean_entropy = ecosystem.mean_entropy(),
                "replicate finished"
            );
            Ok(Outcome {
                population: ecosystem.agents().len(),
                mean_entropy: ecosystem.mean_entropy(),
                stdev_entropy: ecosystem.stdev_entropy(),
                mean_energy: ecosystem.mean_energy(),
                mean_survival_fraction: logger.mean_survival_fraction().unwrap_or(1.0),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let extinct = outcomes.iter().filter(|o| o.population == 0).count();
    println!(
        "{} replicates of {} rounds, {:.1}% extinct",
        REPLICATES,
        ROUNDS,
        extinct as f64 * 100.0 / REPLICATES as f64
    );
    println!(
        "Final population {:?}",
        Stats::from(outcomes.iter().map(|o| o.population as f64))
    );
    println!(
        "Mean entropy {:?}",
        Stats::from(outcomes.iter().map(|o| o.mean_entropy))
    );
    println!(
        "Entropy spread {:?}",
        Stats::from(outcomes.iter().map(|o| o.stdev_entropy))
    );
    println!(
        "Mean energy {:?}",
        Stats::from(outcomes.iter().map(|o| o.mean_energy))
    );
    println!(
        "Survival fraction {:?}",
        Stats::from(outcomes.iter().map(|o| o.mean_survival_fraction))
    );
    Ok(())
}

/// Saves a population mid-run and checks that
/// it loads back unchanged.
fn serde_test(parameters: &Parameters) -> Result<()> {
    let mut ecosystem = Ecosystem::new(parameters.clone())?.with_rng_seed(0);
    ecosystem.run(50)?;

    let saved = ron::to_string(&ecosystem.snapshot()).context("failed to save population")?;
    let snapshot: Snapshot = ron::from_str(&saved).context("failed to load population")?;
    ensure!(
        snapshot == ecosystem.snapshot(),
        "population changed across a save/load cycle"
    );

    let mut resumed = Ecosystem::from_snapshot(snapshot)?.with_rng_seed(1);
    let summary = resumed.run_once()?;
    println!(
        "Resumed {} agents ({} bytes saved): {}",
        ecosystem.agents().len(),
        saved.len(),
        summary
    );
    Ok(())
}
