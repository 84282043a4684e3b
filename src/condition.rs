//! Wear conditions and the float-range → condition mapping.

use std::fmt;
use thiserror::Error;

/// Discrete wear states, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Condition {
    FactoryNew,
    MinimalWear,
    FieldTested,
    WellWorn,
    BattleScarred,
}

/// Lower float bound of each condition, indexed by rank.
pub const CONDITION_BOUNDARIES: [f64; 5] = [0.00, 0.07, 0.15, 0.38, 0.45];

impl Condition {
    /// Every condition in rank order.
    pub const ALL: [Condition; 5] = [
        Condition::FactoryNew,
        Condition::MinimalWear,
        Condition::FieldTested,
        Condition::WellWorn,
        Condition::BattleScarred,
    ];

    /// Ordinal rank, 0 being the best condition.
    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }

    /// Display label as it appears inside item names, e.g. `"Field-Tested"`.
    pub fn label(self) -> &'static str {
        match self {
            Condition::FactoryNew => "Factory New",
            Condition::MinimalWear => "Minimal Wear",
            Condition::FieldTested => "Field-Tested",
            Condition::WellWorn => "Well-Worn",
            Condition::BattleScarred => "Battle-Scarred",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("min_float must be < max_float (got {min_float} >= {max_float})")]
    InvalidRange { min_float: f64, max_float: f64 },

    #[error("{name} out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

/// Index of the condition the minimum float falls into (lower bound inclusive).
fn best_condition_idx(min_float: f64) -> Result<usize, ConditionError> {
    let out_of_range = ConditionError::OutOfRange {
        name: "min_float",
        value: min_float,
    };
    if min_float > 1.0 {
        return Err(out_of_range);
    }
    CONDITION_BOUNDARIES
        .iter()
        .rposition(|&lower| min_float >= lower)
        .ok_or(out_of_range)
}

/// Index of the worst condition the maximum float strictly exceeds the bound of.
fn worst_condition_idx(max_float: f64) -> Result<usize, ConditionError> {
    // Only reachable with a negative min_float, which the min lookup rejects.
    if max_float == 0.0 {
        return Ok(0);
    }
    let out_of_range = ConditionError::OutOfRange {
        name: "max_float",
        value: max_float,
    };
    if max_float > 1.0 {
        return Err(out_of_range);
    }
    CONDITION_BOUNDARIES
        .iter()
        .rposition(|&lower| max_float > lower)
        .ok_or(out_of_range)
}

/// Returns the contiguous, rank-ordered conditions overlapped by
/// `[min_float, max_float)`.
pub fn conditions_for_range(
    min_float: f64,
    max_float: f64,
) -> Result<Vec<Condition>, ConditionError> {
    // Written as a negated `<` so NaN inputs are rejected here too.
    if !(min_float < max_float) {
        return Err(ConditionError::InvalidRange {
            min_float,
            max_float,
        });
    }
    let min_idx = best_condition_idx(min_float)?;
    let max_idx = worst_condition_idx(max_float)?;
    Ok(Condition::ALL[min_idx..=max_idx].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Condition::*;

    #[test]
    fn test_full_range_yields_all_conditions() {
        assert_eq!(conditions_for_range(0.0, 1.0).unwrap(), Condition::ALL);
    }

    #[test]
    fn test_max_must_exceed_boundary() {
        assert_eq!(
            conditions_for_range(0.0, 0.08).unwrap(),
            vec![FactoryNew, MinimalWear]
        );
        assert_eq!(conditions_for_range(0.0, 0.07).unwrap(), vec![FactoryNew]);
    }

    #[test]
    fn test_min_boundary_is_inclusive() {
        assert_eq!(
            conditions_for_range(0.07, 0.15).unwrap(),
            vec![MinimalWear]
        );
        assert_eq!(conditions_for_range(0.45, 1.0).unwrap(), vec![BattleScarred]);
    }

    #[test]
    fn test_typical_skin_range() {
        assert_eq!(
            conditions_for_range(0.06, 0.8).unwrap(),
            vec![FactoryNew, MinimalWear, FieldTested, WellWorn, BattleScarred]
        );
        assert_eq!(
            conditions_for_range(0.1, 0.4).unwrap(),
            vec![MinimalWear, FieldTested, WellWorn]
        );
    }

    #[test]
    fn test_equal_bounds_are_invalid() {
        assert!(matches!(
            conditions_for_range(0.07, 0.07),
            Err(ConditionError::InvalidRange { .. })
        ));
        assert!(matches!(
            conditions_for_range(0.0, 0.0),
            Err(ConditionError::InvalidRange { .. })
        ));
        assert!(matches!(
            conditions_for_range(0.5, 0.2),
            Err(ConditionError::InvalidRange { .. })
        ));
        assert!(matches!(
            conditions_for_range(f64::NAN, 0.5),
            Err(ConditionError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_out_of_range_floats() {
        assert_eq!(
            conditions_for_range(-0.1, 0.5),
            Err(ConditionError::OutOfRange {
                name: "min_float",
                value: -0.1
            })
        );
        assert_eq!(
            conditions_for_range(0.1, 1.5),
            Err(ConditionError::OutOfRange {
                name: "max_float",
                value: 1.5
            })
        );
        // The max_float == 0.0 shortcut never rescues a negative minimum.
        assert!(matches!(
            conditions_for_range(-0.5, 0.0),
            Err(ConditionError::OutOfRange { name: "min_float", .. })
        ));
    }

    #[test]
    fn test_results_are_contiguous_and_sorted() {
        let steps: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        for &min in &steps {
            for &max in steps.iter().filter(|&&max| max > min) {
                let conditions = conditions_for_range(min, max).unwrap();
                assert!(!conditions.is_empty(), "empty for ({min}, {max})");
                for pair in conditions.windows(2) {
                    assert_eq!(pair[0].rank() + 1, pair[1].rank());
                }
                assert_eq!(conditions_for_range(min, max).unwrap(), conditions);
            }
        }
    }

    #[test]
    fn test_labels_and_ranks() {
        assert_eq!(FieldTested.to_string(), "Field-Tested");
        assert_eq!(BattleScarred.label(), "Battle-Scarred");
        assert_eq!(Condition::from_rank(1), Some(MinimalWear));
        assert_eq!(Condition::from_rank(5), None);
        assert!(FactoryNew < WellWorn);
    }
}
