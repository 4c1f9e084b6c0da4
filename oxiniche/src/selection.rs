//! Pairwise selection mechanics: predation, feeding,
//! starvation and mate choice.
//!
//! Predation is a rock-paper-scissors game played codon
//! by codon, where a codon is a 2-bit group (4 per byte).
//! The resolution table is cyclic:
//!
//! ```text
//!     "00" <------- "11"
//!       |            ^
//!       |            |
//!       V            |
//!     "01" -------> "10"
//! ```
//!
//! Each arrow points from winner to loser. The score is
//! antisymmetric, `K(a, b) = -K(b, a)`, so agents are not
//! assigned predator or prey roles beforehand: either
//! one may end up eating the other.
use crate::agents::Agent;
use crate::config::{non_negative, selectivity, Parameters};
use crate::errors::{check_sizes, Error, Result};
use crate::information::{distance, shannon_entropy, BitVector};
use crate::rng::poisson;

use rand::Rng;
use rand_distr::{Beta, Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Result of a predation encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredationOutcome {
    /// Neither agent gets to eat.
    BothSurvive,
    /// The first agent kills and eats the second.
    FirstSurvives,
    /// The second agent kills and eats the first.
    SecondSurvives,
}

/// Result of a starvation event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarvationOutcome {
    Survived,
    Died,
}

/// Codon-against-codon scores, indexed `[a][b]`.
const SCORES: [[i64; 4]; 4] = [
    [0, 1, 0, -1],
    [-1, 0, 1, 0],
    [0, -1, 0, 1],
    [1, 0, -1, 0],
];

/// Returns codon `k` (0..4) of a byte.
fn codon(byte: u8, k: usize) -> usize {
    ((byte >> (2 * k)) & 0x03) as usize
}

/// Returns the predation score `K(a, b)`: the sum of
/// codon-wise game outcomes, positive when `a` dominates.
///
/// # Errors
///
/// Returns an error if the genomes have different lengths.
///
/// # Examples
/// ```
/// use oxiniche::information::BitVector;
/// use oxiniche::selection::predation_score;
///
/// // Every codon of 0x00 is "00", which beats the "01" codons of 0x55.
/// let a = BitVector::new(2, 0x00);
/// let b = BitVector::new(2, 0x55);
/// assert_eq!(predation_score(&a, &b).unwrap(), 8);
/// assert_eq!(predation_score(&b, &a).unwrap(), -8);
/// ```
pub fn predation_score(a: &BitVector, b: &BitVector) -> Result<i64> {
    check_sizes(a.len(), b.len())?;
    Ok(a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(x, y)| {
            (0..4)
                .map(|k| SCORES[codon(*x, k)][codon(*y, k)])
                .sum::<i64>()
        })
        .sum())
}

/// Decides an encounter from its score, a noise draw and
/// the escape threshold.
///
/// The first agent wins iff `noise < score` and
/// `escape_threshold < score`; otherwise the second wins iff
/// the same holds for `-score`; otherwise both survive.
/// Negating the score swaps the outcome for a fixed draw.
///
/// # Examples
/// ```
/// use oxiniche::selection::{resolve_predation, PredationOutcome};
///
/// assert_eq!(resolve_predation(5.0, 0.3, 2.0), PredationOutcome::FirstSurvives);
/// assert_eq!(resolve_predation(-5.0, 0.3, 2.0), PredationOutcome::SecondSurvives);
/// assert_eq!(resolve_predation(1.0, 0.3, 2.0), PredationOutcome::BothSurvive);
/// ```
pub fn resolve_predation(score: f64, noise: f64, escape_threshold: f64) -> PredationOutcome {
    if noise < score && escape_threshold < score {
        PredationOutcome::FirstSurvives
    } else if noise < -score && escape_threshold < -score {
        PredationOutcome::SecondSurvives
    } else {
        PredationOutcome::BothSurvive
    }
}

/// Simulates an encounter between two agents.
///
/// With `n` codons per genome, the noise is drawn from
/// `N(0, (σ√n)²)` and the escape threshold is `λ√n`, where σ is
/// [`predation_noise_stdev_coeff`] and λ is
/// [`predation_escape_coeff`]. For unrelated genomes the score
/// wanders like a random walk with variance `O(n)`, so the
/// `√n` scaling applies the same selection pressure whatever
/// the genome length.
///
/// Increasing σ gives the disadvantaged agent a better chance
/// of surviving; increasing λ lets more encounters end with
/// both agents escaping.
///
/// Energies are left untouched: the caller applies the
/// outcome (see [`feed`]).
///
/// # Errors
///
/// Returns an error if the genomes have different lengths,
/// or if σ is negative or not finite.
///
/// [`predation_noise_stdev_coeff`]: Parameters::predation_noise_stdev_coeff
/// [`predation_escape_coeff`]: Parameters::predation_escape_coeff
pub fn predation<R: Rng + ?Sized>(
    first: &Agent,
    second: &Agent,
    params: &Parameters,
    rng: &mut R,
) -> Result<PredationOutcome> {
    let score = predation_score(first.genome(), second.genome())?;
    let sigma = params.predation_noise_stdev_coeff;
    non_negative("predation_noise_stdev_coeff", sigma)?;

    let scale = ((4 * first.genome().len()) as f64).sqrt();
    let noise = Normal::new(0.0, sigma * scale)
        .map_err(|_| Error::InvalidParameter {
            name: "predation_noise_stdev_coeff",
            value: sigma,
            reason: "must be finite and non-negative",
        })?
        .sample(rng);
    let escape_threshold = params.predation_escape_coeff * scale;

    let outcome = resolve_predation(score as f64, noise, escape_threshold);
    trace!(score, noise, escape_threshold, ?outcome, "predation");
    Ok(outcome)
}

/// Rewards a predator for eating its prey. The predator gains
/// `feed_entropy_weight × H(prey) + 1` energy, `H` being the
/// Shannon entropy of the prey's genome.
///
/// The prey is not modified; zeroing its energy is up to
/// the caller.
///
/// # Examples
/// ```
/// use oxiniche::selection::feed;
/// use oxiniche::{Agent, Parameters};
///
/// let params = Parameters {
///     feed_entropy_weight: 10.0,
///     ..Parameters::zero()
/// };
/// let mut predator = Agent::new(2, 0x00, 2.0);
/// let prey = Agent::new(2, 0x0F, 0.0);
///
/// feed(&mut predator, &prey, &params);
/// assert_eq!(predator.energy(), 2.0 + 10.0 * 1.0 + 1.0);
/// ```
pub fn feed(predator: &mut Agent, prey: &Agent, params: &Parameters) {
    let gain = params.feed_entropy_weight * shannon_entropy(prey.genome()) + 1.0;
    predator.set_energy(predator.energy() + gain);
}

/// Makes an agent spend energy to stay alive.
///
/// The cost is drawn from a Poisson distribution of mean
/// [`mean_starve_energy`]. If the agent holds more energy
/// than the cost it pays and survives; otherwise its energy
/// drops to 0 and it dies. Energy never goes below 0.
///
/// # Errors
///
/// Returns an error if [`mean_starve_energy`] is negative
/// or not finite.
///
/// [`mean_starve_energy`]: Parameters::mean_starve_energy
pub fn starve<R: Rng + ?Sized>(
    agent: &mut Agent,
    params: &Parameters,
    rng: &mut R,
) -> Result<StarvationOutcome> {
    let cost = poisson(rng, params.mean_starve_energy, "mean_starve_energy")? as f64;
    if cost < agent.energy() {
        agent.set_energy(agent.energy() - cost);
        Ok(StarvationOutcome::Survived)
    } else {
        agent.set_energy(0.0);
        Ok(StarvationOutcome::Died)
    }
}

/// Decides whether two agents mate.
///
/// Let `d` be the fraction of differing bits between the
/// genomes. A threshold `p` is drawn from `Beta(1, β)` with
/// `β = 1/μ - 1`, μ being [`mating_selectivity_mean`]: the
/// mode is pinned at 0 and the mean is μ. Mating succeeds iff
/// `d < p`, so similar agents mate easily while dissimilar ones
/// need an improbably large draw. μ = 1 makes the threshold 1.
///
/// # Errors
///
/// Returns an error if the genomes have different lengths,
/// or if μ is not in `(0, 1]`.
///
/// [`mating_selectivity_mean`]: Parameters::mating_selectivity_mean
///
/// # Examples
/// ```
/// use oxiniche::selection::mate;
/// use oxiniche::rng::create_rng;
/// use oxiniche::{Agent, Parameters};
///
/// let params = Parameters {
///     mating_selectivity_mean: 1.0,
///     ..Parameters::zero()
/// };
/// let a = Agent::new(16, 0x00, 1.0);
/// let b = a.clone();
/// assert!(mate(&a, &b, &params, &mut create_rng(0)).unwrap());
/// ```
pub fn mate<R: Rng + ?Sized>(
    first: &Agent,
    second: &Agent,
    params: &Parameters,
    rng: &mut R,
) -> Result<bool> {
    let differing = distance(first.genome(), second.genome())?;
    let bits = first.genome().bit_len();
    let d = if bits == 0 {
        0.0
    } else {
        differing as f64 / bits as f64
    };
    let threshold = mating_threshold(rng, params.mating_selectivity_mean)?;
    Ok(d < threshold)
}

fn mating_threshold<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> Result<f64> {
    selectivity(mean)?;
    let beta = 1.0 / mean - 1.0;
    if beta <= 0.0 {
        return Ok(1.0);
    }
    Beta::new(1.0, beta)
        .map(|distribution| distribution.sample(rng))
        .map_err(|_| Error::InvalidParameter {
            name: "mating_selectivity_mean",
            value: mean,
            reason: "must lie in (0, 1]",
        })
}
