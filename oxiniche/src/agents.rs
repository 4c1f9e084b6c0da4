use crate::information::BitVector;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A single organism: a genome and an energy reserve.
///
/// An agent is alive while its energy is positive.
/// All dynamics live in the [`genetics`] and
/// [`selection`] operators.
///
/// Supports Serde for convenient population saving and loading.
///
/// [`genetics`]: crate::genetics
/// [`selection`]: crate::selection
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Agent {
    genome: BitVector,
    energy: f64,
}

impl Agent {
    /// Returns an agent whose genome is `len` copies
    /// of the byte `fill`.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::Agent;
    ///
    /// let agent = Agent::new(4, 0xFF, 2.5);
    /// assert_eq!(agent.genome().len(), 4);
    /// assert_eq!(agent[3], 0xFF);
    /// assert!(agent.is_alive());
    /// ```
    pub fn new(len: usize, fill: u8, energy: f64) -> Agent {
        Agent::from_genome(BitVector::new(len, fill), energy)
    }

    /// Returns an agent with the given genome.
    pub fn from_genome(genome: BitVector, energy: f64) -> Agent {
        Agent { genome, energy }
    }

    pub fn genome(&self) -> &BitVector {
        &self.genome
    }

    pub fn genome_mut(&mut self) -> &mut BitVector {
        &mut self.genome
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }

    /// Returns `true` while the agent's energy is positive.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::Agent;
    ///
    /// let mut agent = Agent::new(1, 0x00, 1.0);
    /// assert!(agent.is_alive());
    /// agent.set_energy(0.0);
    /// assert!(!agent.is_alive());
    /// ```
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }
}

impl Index<usize> for Agent {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.genome[index]
    }
}

impl IndexMut<usize> for Agent {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.genome[index]
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent[{}, energy: {:.3}]", self.genome, self.energy)
    }
}
