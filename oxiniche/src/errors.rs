use thiserror::Error;

/// Errors raised by genome operations, genetic
/// operators and the ecosystem driver.
///
/// Every error is fatal to the operation that
/// detected it; the ecosystem does not retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two genomes taking part in the same
    /// operation have different byte lengths.
    #[error("genome size mismatch: {left} bytes against {right} bytes")]
    SizeMismatch { left: usize, right: usize },
    /// A parameter is outside the domain of the
    /// distribution (or quantity) it configures.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Checks that two genome lengths agree.
pub(crate) fn check_sizes(left: usize, right: usize) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(Error::SizeMismatch { left, right })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_sizes_accepts_equal_lengths() {
        assert_eq!(check_sizes(16, 16), Ok(()));
    }

    #[test]
    fn check_sizes_reports_both_lengths() {
        assert_eq!(
            check_sizes(4, 8),
            Err(Error::SizeMismatch { left: 4, right: 8 })
        );
    }

    #[test]
    fn messages_name_the_offending_parameter() {
        let e = Error::InvalidParameter {
            name: "mean_mutations",
            value: -1.0,
            reason: "must be finite and non-negative",
        };
        assert_eq!(
            e.to_string(),
            "invalid parameter `mean_mutations` = -1: must be finite and non-negative"
        );
    }
}
