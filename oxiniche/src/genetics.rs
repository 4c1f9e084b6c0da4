//! Stochastic genetic operators: point mutation
//! and multi-point crossover.
//!
//! The two compose: mating produces a child through
//! [`crossover`] and then applies [`mutate`] to it.
use crate::agents::Agent;
use crate::config::Parameters;
use crate::errors::{check_sizes, Result};
use crate::information::BitVector;
use crate::rng::poisson;

use rand::Rng;
use tracing::trace;

/// Flips `n` uniformly chosen bits of the agent's genome,
/// with `n` drawn from a Poisson distribution of mean
/// [`mean_mutations`]. Returns `n`.
///
/// Positions are drawn with replacement, so a bit may be
/// flipped back by a later draw; `n` counts draws, not net
/// changes. The genome's length never changes.
///
/// # Errors
///
/// Returns an error if [`mean_mutations`] is negative
/// or not finite.
///
/// [`mean_mutations`]: Parameters::mean_mutations
///
/// # Examples
/// ```
/// use oxiniche::genetics::mutate;
/// use oxiniche::information::distance;
/// use oxiniche::rng::create_rng;
/// use oxiniche::{Agent, Parameters};
///
/// let params = Parameters {
///     mean_mutations: 2.5,
///     ..Parameters::zero()
/// };
/// let mut rng = create_rng(3);
///
/// let original = Agent::new(4, 0x00, 1.0);
/// let mut agent = original.clone();
/// let flips = mutate(&mut agent, &params, &mut rng).unwrap();
///
/// assert_eq!(agent.genome().len(), 4);
/// assert!(distance(agent.genome(), original.genome()).unwrap() as u64 <= flips);
/// ```
pub fn mutate<R: Rng + ?Sized>(agent: &mut Agent, params: &Parameters, rng: &mut R) -> Result<u64> {
    let flips = poisson(rng, params.mean_mutations, "mean_mutations")?;
    let bits = agent.genome().bit_len();
    if bits > 0 {
        let genome = agent.genome_mut();
        for _ in 0..flips {
            genome.flip_bit(rng.gen_range(0..bits));
        }
    }
    trace!(flips, "mutated genome");
    Ok(flips)
}

/// Combines two parent genomes into a child.
///
/// `k` byte-aligned breakpoints are drawn uniformly (with
/// replacement) from the genome, `k` being Poisson-distributed
/// with mean [`mean_crossovers`]. A coin flip picks the parent
/// that supplies the first segment; the source parent then
/// alternates at each breakpoint, in ascending order, up to the
/// end of the genome.
///
/// The child is born with [`birth_energy`] and is *not*
/// mutated; call [`mutate`] on it separately.
///
/// # Errors
///
/// Returns an error if the parents' genomes have different
/// lengths, or if [`mean_crossovers`] is negative or not finite.
///
/// [`mean_crossovers`]: Parameters::mean_crossovers
/// [`birth_energy`]: Parameters::birth_energy
///
/// # Examples
/// ```
/// use oxiniche::genetics::crossover;
/// use oxiniche::rng::create_rng;
/// use oxiniche::{Agent, Parameters};
///
/// let params = Parameters {
///     mean_crossovers: 2.5,
///     birth_energy: 10.0,
///     ..Parameters::zero()
/// };
/// let father = Agent::new(20, 0x00, 1.0);
/// let mother = Agent::new(20, 0xFF, 1.0);
///
/// let child = crossover(&father, &mother, &params, &mut create_rng(11)).unwrap();
///
/// assert_eq!(child.genome().len(), 20);
/// assert_eq!(child.energy(), 10.0);
/// assert!(child.genome().as_bytes().iter().all(|b| *b == 0x00 || *b == 0xFF));
/// ```
pub fn crossover<R: Rng + ?Sized>(
    father: &Agent,
    mother: &Agent,
    params: &Parameters,
    rng: &mut R,
) -> Result<Agent> {
    let (father, mother) = (father.genome().as_bytes(), mother.genome().as_bytes());
    check_sizes(father.len(), mother.len())?;
    let len = father.len();

    let crossings = poisson(rng, params.mean_crossovers, "mean_crossovers")?;
    let mut breakpoints: Vec<usize> = if len == 0 {
        vec![]
    } else {
        (0..crossings).map(|_| rng.gen_range(0..len)).collect()
    };
    breakpoints.sort_unstable();

    let mut from_father: bool = rng.gen();
    let mut chromosome = Vec::with_capacity(len);
    let mut start = 0;
    for breakpoint in breakpoints {
        let active = if from_father { father } else { mother };
        chromosome.extend_from_slice(&active[start..breakpoint]);
        start = breakpoint;
        from_father = !from_father;
    }
    let active = if from_father { father } else { mother };
    chromosome.extend_from_slice(&active[start..]);

    trace!(crossings, "crossed over parents");
    Ok(Agent::from_genome(
        BitVector::from_bytes(chromosome),
        params.birth_energy,
    ))
}
