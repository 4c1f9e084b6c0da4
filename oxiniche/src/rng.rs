//! Random sources and the validated draws shared
//! by the genetic and selection operators.
//!
//! Operators never own a generator: the caller threads one
//! through every call as `&mut R where R: Rng + ?Sized`,
//! which keeps runs reproducible under a fixed seed.
use crate::config::non_negative;
use crate::errors::{Error, Result};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rand_distr::{Distribution, Poisson};

/// The generator held by an [`Ecosystem`].
///
/// [`Ecosystem`]: crate::Ecosystem
pub type EcosystemRng = ChaCha12Rng;

/// Creates a deterministic generator from a seed.
///
/// # Examples
/// ```
/// use oxiniche::rng::create_rng;
/// use rand::Rng;
///
/// let (mut a, mut b) = (create_rng(7), create_rng(7));
/// assert_eq!(a.gen::<u64>(), b.gen::<u64>());
/// ```
pub fn create_rng(seed: u64) -> EcosystemRng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Creates a generator seeded from operating system entropy.
pub fn entropy_rng() -> EcosystemRng {
    ChaCha12Rng::from_entropy()
}

/// Draws a Poisson-distributed count with the given mean.
///
/// A mean of exactly 0 always yields 0 (the distribution
/// is degenerate there, and `rand_distr` refuses it).
///
/// # Errors
///
/// Returns an error if `mean` is negative or not finite,
/// naming `parameter` as the culprit.
pub(crate) fn poisson<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    parameter: &'static str,
) -> Result<u64> {
    non_negative(parameter, mean)?;
    if mean == 0.0 {
        return Ok(0);
    }
    let distribution = Poisson::new(mean).map_err(|_| Error::InvalidParameter {
        name: parameter,
        value: mean,
        reason: "must be finite and non-negative",
    })?;
    let draw: f64 = distribution.sample(rng);
    Ok(draw as u64)
}
