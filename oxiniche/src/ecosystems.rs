//! An Ecosystem is a population of agents competing
//! for energy. Each round they are paired off to prey on
//! each other, starve, and then paired again to mate.
//! No fitness function is involved: selective pressure
//! emerges from the encounters themselves.
pub mod logging;
mod snapshot;
mod summary;

use crate::agents::Agent;
use crate::config::Parameters;
use crate::errors::{Error, Result};
use crate::genetics::{crossover, mutate};
use crate::information::shannon_entropy;
use crate::rng::{create_rng, entropy_rng, EcosystemRng};
use crate::selection::{feed, mate, predation, starve, PredationOutcome, StarvationOutcome};
use logging::{EcologyLogger, Stats};
pub use snapshot::Snapshot;
pub use summary::RoundSummary;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A population of agents together with the random
/// source driving it.
///
/// Every round runs the same sequence of steps:
/// 1. Replenish: newborn agents with all-zero genomes
///    are added until the target population is reached.
/// 2. Shuffle the population.
/// 3. Feeding: consecutive agents are paired for a
///    [`predation`] encounter; the winner (if any) eats the
///    loser. Every agent then has to [`starve`].
/// 4. Cull the agents without energy.
/// 5. Shuffle again.
/// 6. Mating: consecutive survivors are paired; each
///    couple that [`mate`]s produces a [`crossover`] child,
///    which is then [`mutate`]d.
/// 7. Add the children to the population.
///
/// In both pairing steps an odd agent out sits the round out.
///
/// The random generator is part of the serialized state,
/// so a deserialized ecosystem continues exactly where
/// the original left off.
///
/// [`predation`]: crate::selection::predation
/// [`starve`]: crate::selection::starve
/// [`mate`]: crate::selection::mate
/// [`crossover`]: crate::genetics::crossover
/// [`mutate`]: crate::genetics::mutate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ecosystem {
    agents: Vec<Agent>,
    round: usize,
    parameters: Parameters,
    rng: EcosystemRng,
}

impl Ecosystem {
    /// Default number of rounds of a run.
    pub const DEFAULT_ROUNDS: usize = 1000;

    /// Creates a new ecosystem holding [`population_size`]
    /// agents with all-zero genomes and [`birth_energy`].
    /// The random generator is seeded from system entropy;
    /// see [`with_rng_seed`] for reproducible runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail [`Parameters::validate`].
    ///
    /// [`population_size`]: Parameters::population_size
    /// [`birth_energy`]: Parameters::birth_energy
    /// [`with_rng_seed`]: Ecosystem::with_rng_seed
    ///
    /// # Examples
    /// ```
    /// use oxiniche::{Ecosystem, Parameters};
    ///
    /// let ecosystem = Ecosystem::new(Parameters {
    ///     population_size: 100,
    ///     ..Parameters::default()
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(ecosystem.agents().len(), 100);
    /// assert_eq!(ecosystem.round(), 0);
    /// ```
    pub fn new(parameters: Parameters) -> Result<Ecosystem> {
        parameters.validate()?;
        let agents = (0..parameters.population_size)
            .map(|_| newborn(&parameters))
            .collect();
        Ok(Ecosystem {
            agents,
            round: 0,
            parameters,
            rng: entropy_rng(),
        })
    }

    /// Creates a new ecosystem from an existing set of agents.
    ///
    /// The agents need not match the target population size:
    /// missing agents are replenished at the start of the
    /// next round, and a surplus is kept as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail
    /// [`Parameters::validate`], or if any genome is not
    /// [`chromosome_bytes`] long.
    ///
    /// [`chromosome_bytes`]: Parameters::chromosome_bytes
    ///
    /// # Examples
    /// ```
    /// use oxiniche::{Agent, Ecosystem, Error, Parameters};
    ///
    /// let params = Parameters {
    ///     chromosome_bytes: 4,
    ///     ..Parameters::zero()
    /// };
    ///
    /// let seed = vec![Agent::new(4, 0xAB, 1.0), Agent::new(4, 0xCD, 1.0)];
    /// let ecosystem = Ecosystem::new_seeded(params.clone(), seed).unwrap();
    /// assert_eq!(ecosystem.agents()[1][0], 0xCD);
    ///
    /// let misfit = vec![Agent::new(3, 0x00, 1.0)];
    /// assert_eq!(
    ///     Ecosystem::new_seeded(params, misfit).unwrap_err(),
    ///     Error::SizeMismatch { left: 4, right: 3 }
    /// );
    /// ```
    pub fn new_seeded(parameters: Parameters, agents: Vec<Agent>) -> Result<Ecosystem> {
        parameters.validate()?;
        if let Some(misfit) = agents
            .iter()
            .find(|a| a.genome().len() != parameters.chromosome_bytes)
        {
            return Err(Error::SizeMismatch {
                left: parameters.chromosome_bytes,
                right: misfit.genome().len(),
            });
        }
        Ok(Ecosystem {
            agents,
            round: 0,
            parameters,
            rng: entropy_rng(),
        })
    }

    /// Restores an ecosystem from a [`Snapshot`].
    ///
    /// # Errors
    ///
    /// Same as [`Ecosystem::new_seeded`].
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Ecosystem> {
        Ecosystem::new_seeded(snapshot.parameters, snapshot.agents)
    }

    /// Replaces the random generator with one seeded
    /// from `seed`. Ecosystems with equal state and
    /// seed evolve identically.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::{Ecosystem, Parameters};
    ///
    /// let params = Parameters {
    ///     population_size: 50,
    ///     chromosome_bytes: 4,
    ///     ..Parameters::default()
    /// };
    /// let mut a = Ecosystem::new(params.clone()).unwrap().with_rng_seed(9);
    /// let mut b = Ecosystem::new(params).unwrap().with_rng_seed(9);
    ///
    /// a.run(5).unwrap();
    /// b.run(5).unwrap();
    /// assert_eq!(a.agents(), b.agents());
    /// ```
    pub fn with_rng_seed(mut self, seed: u64) -> Ecosystem {
        self.rng = create_rng(seed);
        self
    }

    /// Returns a copy of the parameters and agents.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            parameters: self.parameters.clone(),
            agents: self.agents.clone(),
        }
    }

    /// Consumes the ecosystem, returning its parameters and agents.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            parameters: self.parameters,
            agents: self.agents,
        }
    }

    /// Runs a single round.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an operator. The
    /// round is abandoned midway in that case, and the round
    /// counter is not advanced.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::{Ecosystem, Parameters};
    ///
    /// let mut ecosystem = Ecosystem::new(Parameters {
    ///     population_size: 100,
    ///     ..Parameters::default()
    /// })
    /// .unwrap();
    ///
    /// let summary = ecosystem.run_once().unwrap();
    /// assert_eq!(summary.round, 1);
    /// assert_eq!(summary.population, ecosystem.agents().len());
    /// assert!(ecosystem.agents().len() <= 150);
    /// ```
    pub fn run_once(&mut self) -> Result<RoundSummary> {
        let replenished = self.replenish();
        self.agents.shuffle(&mut self.rng);
        let (predation_kills, starvations) = self.feeding_round()?;
        let deaths = remove_dead_agents(&mut self.agents);
        self.agents.shuffle(&mut self.rng);
        let children = self.mating_round()?;
        let births = children.len();
        self.agents.extend(children);
        self.round += 1;

        let summary = RoundSummary {
            round: self.round,
            replenished,
            predation_kills,
            starvations,
            deaths,
            births,
            population: self.agents.len(),
        };
        debug!(
            round = summary.round,
            population = summary.population,
            births,
            deaths,
            predation_kills,
            starvations,
            "completed round"
        );
        if self.agents.is_empty() {
            warn!(round = self.round, "population went extinct");
        }
        Ok(summary)
    }

    /// Runs the given number of rounds, stopping
    /// at the first error.
    ///
    /// # Errors
    ///
    /// Same as [`Ecosystem::run_once`].
    pub fn run(&mut self, rounds: usize) -> Result<()> {
        for _ in 0..rounds {
            self.run_once()?;
        }
        Ok(())
    }

    /// Runs the given number of rounds, recording
    /// each one with `logger`.
    ///
    /// # Errors
    ///
    /// Same as [`Ecosystem::run_once`].
    ///
    /// # Examples
    /// ```
    /// use oxiniche::logging::{EcologyLogger, ReportingLevel};
    /// use oxiniche::{Ecosystem, Parameters};
    ///
    /// let mut ecosystem = Ecosystem::new(Parameters {
    ///     population_size: 200,
    ///     ..Parameters::default()
    /// })
    /// .unwrap();
    /// let mut logger = EcologyLogger::new(ReportingLevel::NoAgents);
    ///
    /// ecosystem.run_logged(10, &mut logger).unwrap();
    /// assert_eq!(logger.iter().count(), 10);
    /// ```
    pub fn run_logged(&mut self, rounds: usize, logger: &mut EcologyLogger) -> Result<()> {
        for _ in 0..rounds {
            let summary = self.run_once()?;
            logger.log(self, summary);
        }
        Ok(())
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the number of completed rounds.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Mean genome entropy of the population, 0 if extinct.
    pub fn mean_entropy(&self) -> f64 {
        self.entropy_stats().map_or(0.0, |s| s.mean)
    }

    /// Standard deviation of genome entropy across
    /// the population, 0 if extinct.
    pub fn stdev_entropy(&self) -> f64 {
        self.entropy_stats().map_or(0.0, |s| s.stdev)
    }

    /// Mean energy of the population, 0 if extinct.
    pub fn mean_energy(&self) -> f64 {
        Stats::from(self.agents.iter().map(Agent::energy)).map_or(0.0, |s| s.mean)
    }

    fn entropy_stats(&self) -> Option<Stats> {
        Stats::from(self.agents.iter().map(|a| shannon_entropy(a.genome())))
    }

    /// Tops the population up to its target size.
    /// Returns the number of agents added.
    fn replenish(&mut self) -> usize {
        let missing = self
            .parameters
            .population_size
            .saturating_sub(self.agents.len());
        let parameters = &self.parameters;
        self.agents.extend((0..missing).map(|_| newborn(parameters)));
        missing
    }

    /// Pairs up agents for predation, then makes every
    /// agent starve. Returns the number of agents eaten
    /// and the number of agents starved to death.
    fn feeding_round(&mut self) -> Result<(usize, usize)> {
        let parameters = &self.parameters;
        let rng = &mut self.rng;

        let mut kills = 0;
        for pair in self.agents.chunks_exact_mut(2) {
            let (first, second) = pair.split_at_mut(1);
            let (first, second) = (&mut first[0], &mut second[0]);
            match predation(first, second, parameters, rng)? {
                PredationOutcome::FirstSurvives => {
                    second.set_energy(0.0);
                    feed(first, second, parameters);
                    kills += 1;
                }
                PredationOutcome::SecondSurvives => {
                    first.set_energy(0.0);
                    feed(second, first, parameters);
                    kills += 1;
                }
                PredationOutcome::BothSurvive => {}
            }
        }

        let mut starvations = 0;
        for agent in &mut self.agents {
            let was_alive = agent.is_alive();
            if starve(agent, parameters, rng)? == StarvationOutcome::Died && was_alive {
                starvations += 1;
            }
        }
        Ok((kills, starvations))
    }

    /// Pairs up agents for mating, returning the children.
    fn mating_round(&mut self) -> Result<Vec<Agent>> {
        let parameters = &self.parameters;
        let rng = &mut self.rng;

        let mut children = vec![];
        for pair in self.agents.chunks_exact(2) {
            if mate(&pair[0], &pair[1], parameters, rng)? {
                let mut child = crossover(&pair[0], &pair[1], parameters, rng)?;
                mutate(&mut child, parameters, rng)?;
                children.push(child);
            }
        }
        Ok(children)
    }
}

fn newborn(parameters: &Parameters) -> Agent {
    Agent::new(parameters.chromosome_bytes, 0x00, parameters.birth_energy)
}

/// Removes every agent without energy in a single pass,
/// returning the number removed. Living agents keep their
/// relative order.
fn remove_dead_agents(agents: &mut Vec<Agent>) -> usize {
    let mut alive = 0;
    for i in 0..agents.len() {
        if agents[i].is_alive() {
            agents.swap(alive, i);
            alive += 1;
        }
    }
    let dead = agents.len() - alive;
    agents.truncate(alive);
    dead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::information::{distance, BitVector};

    fn quiet(population_size: usize, chromosome_bytes: usize) -> Parameters {
        Parameters {
            population_size,
            chromosome_bytes,
            birth_energy: 10.0,
            mating_selectivity_mean: 1.0,
            ..Parameters::zero()
        }
    }

    #[test]
    fn single_round_stays_within_bounds() {
        let params = Parameters {
            population_size: 100,
            chromosome_bytes: 16,
            ..Parameters::default()
        };
        for seed in 0..10 {
            let mut ecosystem = Ecosystem::new(params.clone())
                .unwrap()
                .with_rng_seed(seed);
            let summary = ecosystem.run_once().unwrap();
            assert!(ecosystem.agents().len() <= 150);
            assert_eq!(summary.population, ecosystem.agents().len());
            assert_eq!(summary.entered(), 100);
            assert!(ecosystem.agents().iter().all(|a| a.energy() >= 0.0));
            assert!(ecosystem
                .agents()
                .iter()
                .all(|a| a.genome().len() == 16));
        }
    }

    #[test]
    fn identical_genomes_always_mate() {
        let mut ecosystem = Ecosystem::new(quiet(100, 16)).unwrap().with_rng_seed(1);
        let summary = ecosystem.run_once().unwrap();
        assert_eq!(summary.predation_kills, 0);
        assert_eq!(summary.deaths, 0);
        assert_eq!(summary.births, 50);
        assert_eq!(ecosystem.agents().len(), 150);
    }

    #[test]
    fn children_copy_a_parent_without_crossovers() {
        let params = Parameters {
            predation_escape_coeff: 1.0,
            ..quiet(100, 16)
        };
        let plain = BitVector::new(16, 0x00);
        let mut marked = plain.clone();
        marked.flip_bit(0);
        let agents = (0..100)
            .map(|i| {
                let genome = if i % 2 == 0 { &plain } else { &marked };
                Agent::from_genome(genome.clone(), 10.0)
            })
            .collect();

        let mut ecosystem = Ecosystem::new_seeded(params, agents)
            .unwrap()
            .with_rng_seed(2);
        let summary = ecosystem.run_once().unwrap();
        assert_eq!(summary.replenished, 0);
        assert_eq!(summary.deaths, 0);
        assert_eq!(summary.births, 50);
        for child in &ecosystem.agents()[100..] {
            assert!(child.genome() == &plain || child.genome() == &marked);
            assert_eq!(child.energy(), 10.0);
        }
    }

    #[test]
    fn predation_winner_eats_and_loser_is_culled() {
        let params = Parameters {
            predation_escape_coeff: 0.5,
            feed_entropy_weight: 10.0,
            ..quiet(2, 4)
        };
        let prey = Agent::new(4, 0x55, 10.0);
        let prey_entropy = shannon_entropy(prey.genome());
        for seed in 0..20 {
            let agents = vec![prey.clone(), Agent::new(4, 0x00, 10.0)];
            let mut ecosystem = Ecosystem::new_seeded(params.clone(), agents)
                .unwrap()
                .with_rng_seed(seed);
            let summary = ecosystem.run_once().unwrap();

            assert_eq!(summary.predation_kills, 1);
            assert_eq!(summary.deaths, 1);
            assert_eq!(summary.births, 0);
            assert_eq!(ecosystem.agents().len(), 1);
            let winner = &ecosystem.agents()[0];
            assert_eq!(winner.genome(), &BitVector::new(4, 0x00));
            assert_eq!(winner.energy(), 10.0 + 10.0 * prey_entropy + 1.0);
            assert_eq!(winner.energy(), 21.0);
        }
    }

    #[test]
    fn children_are_mutated_after_crossover() {
        let params = Parameters {
            mean_mutations: 8.0,
            ..quiet(100, 16)
        };
        let parent = BitVector::new(16, 0x00);
        let mut ecosystem = Ecosystem::new(params).unwrap().with_rng_seed(12);
        let summary = ecosystem.run_once().unwrap();
        assert_eq!(summary.births, 50);

        // Parents are never mutated; only the appended children are.
        assert!(ecosystem.agents()[..100]
            .iter()
            .all(|a| a.genome() == &parent));

        let distances: Vec<usize> = ecosystem.agents()[100..]
            .iter()
            .map(|child| distance(child.genome(), &parent).unwrap())
            .collect();
        assert!(distances.iter().filter(|d| **d > 0).count() >= 45);
        let mean = distances.iter().sum::<usize>() as f64 / distances.len() as f64;
        assert!((4.0..12.0).contains(&mean), "mean distance {}", mean);
    }

    #[test]
    fn population_is_replenished_each_round() {
        let params = Parameters {
            birth_energy: 0.0,
            ..quiet(20, 2)
        };
        let mut ecosystem = Ecosystem::new(params).unwrap().with_rng_seed(3);

        // Agents born without energy starve on their first round.
        let first = ecosystem.run_once().unwrap();
        assert_eq!(first.deaths, 20);
        assert_eq!(first.starvations, 0);
        assert_eq!(first.population, 0);
        assert_eq!(first.survival_fraction(), 0.0);
        assert!(ecosystem.agents().is_empty());

        let second = ecosystem.run_once().unwrap();
        assert_eq!(second.replenished, 20);
        assert_eq!(second.round, 2);
        assert_eq!(ecosystem.round(), 2);
    }

    #[test]
    fn starvation_is_counted_for_living_agents_only() {
        let params = Parameters {
            mean_starve_energy: 1000.0,
            ..quiet(30, 2)
        };
        let mut ecosystem = Ecosystem::new(params).unwrap().with_rng_seed(4);
        let summary = ecosystem.run_once().unwrap();
        assert_eq!(summary.starvations, 30);
        assert_eq!(summary.deaths, 30);
        assert_eq!(summary.births, 0);
    }

    #[test]
    fn remove_dead_agents_keeps_the_living_in_order() {
        let energies = [1.0, 0.0, 2.0, -1.0, 0.0, 3.0, 0.5];
        let mut agents: Vec<Agent> = energies
            .iter()
            .enumerate()
            .map(|(i, e)| Agent::new(1, i as u8, *e))
            .collect();

        assert_eq!(remove_dead_agents(&mut agents), 3);
        assert_eq!(
            agents.iter().map(Agent::energy).collect::<Vec<_>>(),
            vec![1.0, 2.0, 3.0, 0.5]
        );
        assert_eq!(
            agents.iter().map(|a| a[0]).collect::<Vec<_>>(),
            vec![0, 2, 5, 6]
        );
    }

    #[test]
    fn remove_dead_agents_edge_cases() {
        let mut empty: Vec<Agent> = vec![];
        assert_eq!(remove_dead_agents(&mut empty), 0);

        let mut all_dead = vec![Agent::new(1, 0, 0.0); 5];
        assert_eq!(remove_dead_agents(&mut all_dead), 5);
        assert!(all_dead.is_empty());

        let mut all_alive = vec![Agent::new(1, 0, 1.0); 5];
        assert_eq!(remove_dead_agents(&mut all_alive), 0);
        assert_eq!(all_alive.len(), 5);
    }

    #[test]
    fn seeded_runs_replay_identically() {
        let params = Parameters {
            population_size: 200,
            chromosome_bytes: 8,
            ..Parameters::default()
        };
        let mut a = Ecosystem::new(params.clone()).unwrap().with_rng_seed(77);
        let mut b = Ecosystem::new(params).unwrap().with_rng_seed(77);
        for _ in 0..10 {
            assert_eq!(a.run_once(), b.run_once());
        }
        assert_eq!(a.agents(), b.agents());
    }

    #[test]
    fn serialized_ecosystem_resumes_exactly() {
        let params = Parameters {
            population_size: 100,
            chromosome_bytes: 4,
            ..Parameters::default()
        };
        let mut original = Ecosystem::new(params).unwrap().with_rng_seed(5);
        original.run(3).unwrap();

        let json = serde_json::to_string(&original).unwrap();
        let mut restored: Ecosystem = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.round(), 3);
        assert_eq!(restored.agents(), original.agents());

        assert_eq!(original.run_once(), restored.run_once());
        assert_eq!(original.agents(), restored.agents());
    }

    #[test]
    fn snapshot_round_trip() {
        let params = Parameters {
            population_size: 50,
            chromosome_bytes: 4,
            ..Parameters::default()
        };
        let mut ecosystem = Ecosystem::new(params).unwrap().with_rng_seed(6);
        ecosystem.run(4).unwrap();

        let snapshot = ecosystem.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);

        let restored = Ecosystem::from_snapshot(decoded).unwrap();
        assert_eq!(restored.agents(), ecosystem.agents());
        assert_eq!(restored.parameters(), ecosystem.parameters());
        assert_eq!(ecosystem.into_snapshot(), snapshot);
    }

    #[test]
    fn construction_errors() {
        let invalid = Parameters {
            mating_selectivity_mean: 1.5,
            ..Parameters::zero()
        };
        assert!(matches!(
            Ecosystem::new(invalid.clone()),
            Err(Error::InvalidParameter {
                name: "mating_selectivity_mean",
                ..
            })
        ));
        assert!(Ecosystem::new_seeded(invalid, vec![]).is_err());

        let snapshot = Snapshot {
            parameters: quiet(2, 2),
            agents: vec![Agent::new(2, 0, 1.0), Agent::new(5, 0, 1.0)],
        };
        assert_eq!(
            Ecosystem::from_snapshot(snapshot).unwrap_err(),
            Error::SizeMismatch { left: 2, right: 5 }
        );
    }

    #[test]
    fn operator_errors_abort_the_round() {
        let mut ecosystem = Ecosystem::new(quiet(10, 2)).unwrap();
        ecosystem.parameters.mean_starve_energy = -1.0;
        assert!(ecosystem.run_once().is_err());
        assert_eq!(ecosystem.round(), 0);
        assert!(ecosystem.run(3).is_err());
    }

    #[test]
    fn population_statistics() {
        let genomes = [
            BitVector::new(2, 0x00),
            BitVector::new(2, 0x0F),
            BitVector::new(2, 0x00),
            BitVector::new(2, 0x0F),
        ];
        let agents = genomes
            .iter()
            .zip([1.0, 2.0, 3.0, 6.0])
            .map(|(g, e)| Agent::from_genome(g.clone(), e))
            .collect();
        let ecosystem = Ecosystem::new_seeded(quiet(4, 2), agents).unwrap();
        assert_eq!(ecosystem.mean_entropy(), 0.5);
        assert_eq!(ecosystem.stdev_entropy(), 0.5);
        assert_eq!(ecosystem.mean_energy(), 3.0);

        let extinct = Ecosystem::new_seeded(quiet(4, 2), vec![]).unwrap();
        assert_eq!(extinct.mean_entropy(), 0.0);
        assert_eq!(extinct.stdev_entropy(), 0.0);
        assert_eq!(extinct.mean_energy(), 0.0);
    }

    #[test]
    fn default_round_count() {
        assert_eq!(Ecosystem::DEFAULT_ROUNDS, 1000);
    }
}
