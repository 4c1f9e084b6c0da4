//! A simulator of open-ended evolution in an ecology of
//! bit-string organisms.
//!
//! Each agent is a fixed-length genome plus an energy reserve.
//! Agents are paired off every round to prey on each other in a
//! codon-wise rock-paper-scissors game, pay an energy cost to
//! stay alive, and mate with agents genetically similar to
//! themselves. Children are built by multi-point crossover and
//! point mutation. There is no fitness function: whatever
//! survives the encounters gets to reproduce, so niches are
//! expected to emerge from the interactions alone.
//!
//! All randomness flows from a single seedable generator
//! owned by the [`Ecosystem`], and every operator receives
//! it explicitly, so runs can be replayed exactly.
//!
//! # Example usage: watching genome entropy over a short run
//! ```
//! use oxiniche::logging::{EcologyLogger, ReportingLevel};
//! use oxiniche::{Ecosystem, Parameters};
//! use serde_json;
//!
//! fn main() {
//!     let parameters = Parameters {
//!         population_size: 500,
//!         chromosome_bytes: 8,
//!         mean_mutations: 2.0,
//!         mating_selectivity_mean: 0.3,
//!         ..Parameters::default()
//!     };
//!
//!     let mut ecosystem = Ecosystem::new(parameters).unwrap().with_rng_seed(2024);
//!     let mut logger = EcologyLogger::new(ReportingLevel::NoAgents);
//!
//!     for _ in 0..5 {
//!         if let Err(e) = ecosystem.run_logged(10, &mut logger) {
//!             eprintln!("{}", e);
//!             break;
//!         }
//!         println!(
//!             "round {}: {} agents, mean entropy {:.3} (stdev {:.3})",
//!             ecosystem.round(),
//!             ecosystem.agents().len(),
//!             ecosystem.mean_entropy(),
//!             ecosystem.stdev_entropy(),
//!         );
//!     }
//!
//!     if let Some(log) = logger.last() {
//!         println!("{}", log);
//!     }
//!     println!(
//!         "Final population: {}",
//!         serde_json::to_string(&ecosystem.snapshot()).unwrap()
//!     );
//! }
//! ```

pub mod agents;
mod config;
mod ecosystems;
mod errors;
pub mod genetics;
pub mod information;
pub mod rng;
pub mod selection;

pub use agents::Agent;
pub use config::Parameters;
pub use ecosystems::*;
pub use errors::{Error, Result};
