use crate::agents::Agent;
use crate::config::Parameters;

use serde::{Deserialize, Serialize};

/// The state of an ecosystem that outlives a run: its
/// configuration and its agents, in population order.
///
/// Unlike a serialized [`Ecosystem`], a snapshot does not
/// carry the random generator or the round counter, so it
/// is the format of choice for sharing populations between
/// runs or tools.
///
/// [`Ecosystem`]: crate::Ecosystem
///
/// # Examples
/// ```
/// use oxiniche::{Ecosystem, Parameters};
///
/// let params = Parameters {
///     population_size: 8,
///     birth_energy: 1.0,
///     ..Parameters::zero()
/// };
/// let ecosystem = Ecosystem::new(params).unwrap();
///
/// let snapshot = ecosystem.snapshot();
/// assert_eq!(snapshot.agents.len(), 8);
///
/// let restored = Ecosystem::from_snapshot(snapshot.clone()).unwrap();
/// assert_eq!(restored.snapshot(), snapshot);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub parameters: Parameters,
    pub agents: Vec<Agent>,
}
