use crate::errors::{Error, Result};

use serde::{Deserialize, Serialize};

/// Run configuration for an ecosystem.
///
/// A single `Parameters` value is shared by reference
/// with every genetic and selection operator, and
/// is never modified during a run.
///
/// # Note
/// Quantities used as distribution parameters have
/// restricted domains (see [`Parameters::validate`]).
/// Operators check the parameters they draw from and
/// return [`Error::InvalidParameter`] when they are
/// out of range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Population size restored at the start of each round.
    pub population_size: usize,
    /// Number of bytes in each agent's genome.
    pub chromosome_bytes: usize,
    /// Mean (Poisson) number of bit flips per `mutate`.
    pub mean_mutations: f64,
    /// Mean (Poisson) number of breakpoints per `crossover`.
    pub mean_crossovers: f64,
    /// Energy given to every agent at birth.
    pub birth_energy: f64,
    /// Coefficient of the predation noise standard
    /// deviation, scaled by the square root of the
    /// codon count.
    pub predation_noise_stdev_coeff: f64,
    /// Coefficient of the deterministic escape threshold,
    /// scaled by the square root of the codon count.
    pub predation_escape_coeff: f64,
    /// Energy proportional to predation score during `feed`.
    ///
    /// Kept as configuration so that snapshots carry it;
    /// [`feed`] does not read it.
    ///
    /// [`feed`]: crate::selection::feed
    pub feed_score_weight: f64,
    /// Energy proportional to prey entropy during `feed`.
    pub feed_entropy_weight: f64,
    /// Mean (Poisson) energy spent in a `starve` event.
    pub mean_starve_energy: f64,
    /// Mean mating threshold. Lower values make mating
    /// more selective. Must lie in `(0, 1]`.
    pub mating_selectivity_mean: f64,
}

impl Parameters {
    /// Returns a "zero-valued" configuration: every quantity
    /// is 0, except `chromosome_bytes` (1) and
    /// `mating_selectivity_mean` (1.0), which take the
    /// smallest values that still validate.
    ///
    /// # Note
    /// This value is not suitable for most experiments.
    /// It is meant to abbreviate configuration instantiation
    /// in tests and examples.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::Parameters;
    ///
    /// let params = Parameters {
    ///     population_size: 10,
    ///     chromosome_bytes: 4,
    ///     ..Parameters::zero()
    /// };
    /// assert!(params.validate().is_ok());
    /// ```
    pub const fn zero() -> Parameters {
        Parameters {
            population_size: 0,
            chromosome_bytes: 1,
            mean_mutations: 0.0,
            mean_crossovers: 0.0,
            birth_energy: 0.0,
            predation_noise_stdev_coeff: 0.0,
            predation_escape_coeff: 0.0,
            feed_score_weight: 0.0,
            feed_entropy_weight: 0.0,
            mean_starve_energy: 0.0,
            mating_selectivity_mean: 1.0,
        }
    }

    /// Checks every parameter against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] naming the first
    /// offending field.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::{Error, Parameters};
    ///
    /// let params = Parameters {
    ///     mating_selectivity_mean: 0.0,
    ///     ..Parameters::default()
    /// };
    /// assert!(matches!(
    ///     params.validate(),
    ///     Err(Error::InvalidParameter { name: "mating_selectivity_mean", .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.chromosome_bytes == 0 {
            return Err(Error::InvalidParameter {
                name: "chromosome_bytes",
                value: 0.0,
                reason: "genomes must hold at least one byte",
            });
        }
        non_negative("mean_mutations", self.mean_mutations)?;
        non_negative("mean_crossovers", self.mean_crossovers)?;
        non_negative("mean_starve_energy", self.mean_starve_energy)?;
        non_negative(
            "predation_noise_stdev_coeff",
            self.predation_noise_stdev_coeff,
        )?;
        finite("birth_energy", self.birth_energy)?;
        finite("predation_escape_coeff", self.predation_escape_coeff)?;
        finite("feed_score_weight", self.feed_score_weight)?;
        finite("feed_entropy_weight", self.feed_entropy_weight)?;
        selectivity(self.mating_selectivity_mean)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            population_size: 10_000,
            chromosome_bytes: 16,
            mean_mutations: 1.5,
            mean_crossovers: 2.0,
            birth_energy: 10.0,
            predation_noise_stdev_coeff: 0.25,
            predation_escape_coeff: 0.5,
            feed_score_weight: 1.0,
            feed_entropy_weight: 10.0,
            mean_starve_energy: 1.0,
            mating_selectivity_mean: 0.5,
        }
    }
}

/// Requires a finite, non-negative value.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be finite and non-negative",
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

/// Requires the mating selectivity mean to lie in `(0, 1]`.
pub(crate) fn selectivity(value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "mating_selectivity_mean",
            value,
            reason: "must lie in (0, 1]",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(Parameters::default().validate(), Ok(()));
        assert_eq!(Parameters::zero().validate(), Ok(()));
    }

    #[test]
    fn empty_genomes_are_rejected() {
        let params = Parameters {
            chromosome_bytes: 0,
            ..Parameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidParameter {
                name: "chromosome_bytes",
                ..
            })
        ));
    }

    #[test]
    fn negative_means_are_rejected() {
        for params in [
            Parameters {
                mean_mutations: -0.5,
                ..Parameters::default()
            },
            Parameters {
                mean_crossovers: -1.0,
                ..Parameters::default()
            },
            Parameters {
                mean_starve_energy: f64::NAN,
                ..Parameters::default()
            },
        ] {
            assert!(params.validate().is_err(), "{:?}", params);
        }
    }

    #[test]
    fn selectivity_bounds() {
        assert!(selectivity(1.0).is_ok());
        assert!(selectivity(1e-9).is_ok());
        assert!(selectivity(0.0).is_err());
        assert!(selectivity(1.0 + 1e-9).is_err());
        assert!(selectivity(f64::NAN).is_err());
    }

    #[test]
    fn serde_round_trip() {
        let params = Parameters {
            population_size: 123,
            feed_score_weight: 0.125,
            ..Parameters::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let restored: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, restored);
    }
}
