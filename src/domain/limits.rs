//! Hard capacity limits for model descriptors and Monte Carlo requests.
//!
//! Every limit is checked explicitly by the decoder and by
//! [`ModelDescriptor::validate`](super::ModelDescriptor::validate); a violation
//! is a [`DecodeError::CountExceedsLimit`], never a truncation.

use crate::error::DecodeError;

/// Maximum number of input variables in one model.
pub const MAX_VARS: usize = 64;

/// Maximum number of routes (LP decision variables).
pub const MAX_ROUTES: usize = 16;

/// Maximum number of constraints.
pub const MAX_CONSTRAINTS: usize = 32;

/// Maximum number of correlation pairs per perturbation.
pub const MAX_CORRELATIONS: usize = 8;

/// Maximum number of Monte Carlo scenarios per request.
pub const MAX_SCENARIOS: usize = 10_000;

/// Number of variables reported in a sensitivity ranking.
pub const SENSITIVITY_TOP: usize = 6;

/// Reject `count` if it exceeds `limit`.
pub fn check_count(field: &'static str, count: usize, limit: usize) -> Result<(), DecodeError> {
    if count > limit {
        return Err(DecodeError::CountExceedsLimit {
            field,
            count,
            limit,
        });
    }
    Ok(())
}

/// Reject `index` unless it is strictly below `bound`.
pub fn check_index(field: &'static str, index: usize, bound: usize) -> Result<(), DecodeError> {
    if index >= bound {
        return Err(DecodeError::IndexOutOfRange {
            field,
            index,
            bound,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_at_limit_is_accepted() {
        assert!(check_count("n_vars", MAX_VARS, MAX_VARS).is_ok());
    }

    #[test]
    fn count_above_limit_is_rejected() {
        let err = check_count("n_vars", 70, MAX_VARS).unwrap_err();
        assert_eq!(
            err,
            DecodeError::CountExceedsLimit {
                field: "n_vars",
                count: 70,
                limit: 64
            }
        );
    }

    #[test]
    fn index_equal_to_bound_is_out_of_range() {
        assert!(check_index("route", 3, 3).is_err());
        assert!(check_index("route", 2, 3).is_ok());
    }
}
