use super::{Ecosystem, RoundSummary};

use crate::agents::Agent;
use crate::information::shannon_entropy;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllAgents,
    /// Clones no agents.
    NoAgents,
}

/// A record of a single round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundLog {
    pub summary: RoundSummary,
    /// Energy statistics at the end of the round,
    /// `None` if the population was extinct.
    pub energy: Option<Stats>,
    /// Genome entropy statistics at the end of the round,
    /// `None` if the population was extinct.
    pub entropy: Option<Stats>,
    pub sample: PopulationRecord,
}

impl fmt::Display for RoundLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tround: {}\n\
            \tpopulation: {}\n\
            \tbirths: {}\n\
            \tdeaths: {}\n\
            \tsurvival_fraction: {:.4}\n\
            \tenergy: {:?}\n\
            \tentropy: {:?}\n\
            }}",
            self.summary.round,
            self.summary.population,
            self.summary.births,
            self.summary.deaths,
            self.summary.survival_fraction(),
            self.energy,
            self.entropy,
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub stdev: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return None;
        }
        let len = data.len() as f64;
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / len;
        let variance = data.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / len;

        let mid = data.len() / 2;
        let even = data.len() % 2 == 0;
        let (lower, upper, _) = data.select_nth_unstable_by(mid, f64::total_cmp);
        let median = if even {
            (lower.iter().copied().fold(f64::MIN, f64::max) + *upper) / 2.0
        } else {
            *upper
        };

        Some(Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
            stdev: variance.sqrt(),
        })
    }
}

/// A reporting-level dependant store
/// of agents from an ecosystem.
#[derive(Clone, Debug, PartialEq)]
pub enum PopulationRecord {
    /// Every agent, in population order.
    Agents(Vec<Agent>),
    /// Empty.
    None,
}

/// A log of the development of an ecosystem over time.
#[derive(Clone, Debug)]
pub struct EcologyLogger {
    reporting_level: ReportingLevel,
    logs: Vec<RoundLog>,
}

impl EcologyLogger {
    /// Returns an empty logger that samples agents
    /// according to `reporting_level`.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::logging::{EcologyLogger, ReportingLevel};
    ///
    /// let logger = EcologyLogger::new(ReportingLevel::NoAgents);
    /// assert!(logger.last().is_none());
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EcologyLogger {
        EcologyLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a record of an ecosystem after the round
    /// described by `summary`.
    ///
    /// [`Ecosystem::run_logged`] calls this after every round.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::logging::{EcologyLogger, ReportingLevel};
    /// use oxiniche::{Ecosystem, Parameters};
    ///
    /// let mut ecosystem = Ecosystem::new(Parameters {
    ///     population_size: 10,
    ///     birth_energy: 5.0,
    ///     ..Parameters::zero()
    /// })
    /// .unwrap()
    /// .with_rng_seed(0);
    /// let mut logger = EcologyLogger::new(ReportingLevel::NoAgents);
    ///
    /// let summary = ecosystem.run_once().unwrap();
    /// logger.log(&ecosystem, summary);
    ///
    /// assert_eq!(logger.last().unwrap().summary, summary);
    /// ```
    pub fn log(&mut self, ecosystem: &Ecosystem, summary: RoundSummary) {
        let agents = ecosystem.agents();
        self.logs.push(RoundLog {
            summary,
            energy: Stats::from(agents.iter().map(Agent::energy)),
            entropy: Stats::from(agents.iter().map(|a| shannon_entropy(a.genome()))),
            sample: match self.reporting_level {
                ReportingLevel::AllAgents => PopulationRecord::Agents(agents.to_vec()),
                ReportingLevel::NoAgents => PopulationRecord::None,
            },
        })
    }

    /// Iterate over all logged rounds.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::logging::{EcologyLogger, ReportingLevel};
    /// use oxiniche::{Ecosystem, Parameters};
    ///
    /// let mut ecosystem = Ecosystem::new(Parameters {
    ///     population_size: 4,
    ///     birth_energy: 2.0,
    ///     ..Parameters::zero()
    /// })
    /// .unwrap();
    /// let mut logger = EcologyLogger::new(ReportingLevel::AllAgents);
    /// ecosystem.run_logged(3, &mut logger).unwrap();
    ///
    /// for log in logger.iter() {
    ///     println!("{}", log);
    /// }
    /// let rounds: Vec<usize> = logger.iter().map(|log| log.summary.round).collect();
    /// assert_eq!(rounds, vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &RoundLog> {
        self.logs.iter()
    }

    /// Returns the most recent log, if any.
    pub fn last(&self) -> Option<&RoundLog> {
        self.logs.last()
    }

    /// Returns the mean survival fraction over all logged
    /// rounds, or `None` if nothing was logged.
    pub fn mean_survival_fraction(&self) -> Option<f64> {
        Stats::from(self.logs.iter().map(|log| log.summary.survival_fraction())).map(|s| s.mean)
    }
}
