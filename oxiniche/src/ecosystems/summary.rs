use serde::{Deserialize, Serialize};
use std::fmt;

/// Bookkeeping for one completed round, as
/// returned by [`Ecosystem::run_once`].
///
/// [`Ecosystem::run_once`]: crate::Ecosystem::run_once
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Number of the round, starting at 1.
    pub round: usize,
    /// Newborns added to restore the target population.
    pub replenished: usize,
    /// Agents eaten during the feeding round.
    pub predation_kills: usize,
    /// Agents that survived predation but starved.
    pub starvations: usize,
    /// Agents removed by the cull.
    pub deaths: usize,
    /// Children born during the mating round.
    pub births: usize,
    /// Population size at the end of the round.
    pub population: usize,
}

impl RoundSummary {
    /// Number of agents that entered the feeding round.
    ///
    /// Derived from the other counters, which are consistent
    /// for summaries produced by a run; a hand-built summary
    /// with more births than it can account for yields 0.
    pub fn entered(&self) -> usize {
        (self.population + self.deaths).saturating_sub(self.births)
    }

    /// Fraction of the agents entering the feeding round
    /// that survived the cull. A round that started with
    /// no agents counts as fully surviving.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::RoundSummary;
    ///
    /// let summary = RoundSummary {
    ///     round: 1,
    ///     replenished: 100,
    ///     predation_kills: 20,
    ///     starvations: 5,
    ///     deaths: 25,
    ///     births: 30,
    ///     population: 105,
    /// };
    /// assert_eq!(summary.entered(), 100);
    /// assert_eq!(summary.survival_fraction(), 0.75);
    /// ```
    pub fn survival_fraction(&self) -> f64 {
        let entered = self.entered();
        if entered == 0 {
            1.0
        } else {
            entered.saturating_sub(self.deaths) as f64 / entered as f64
        }
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {}: population {} (+{} replenished, -{} eaten, -{} starved, +{} born)",
            self.round,
            self.population,
            self.replenished,
            self.predation_kills,
            self.starvations,
            self.births
        )
    }
}
