//! Progress indicator markers.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum StepStatus {
    Complete,
    Active,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StepMarker {
    /// Zero-based step index
    pub index: usize,
    pub status: StepStatus,
}

pub fn status(index: usize, current: usize) -> StepStatus {
    match index.cmp(&current) {
        std::cmp::Ordering::Less => StepStatus::Complete,
        std::cmp::Ordering::Equal => StepStatus::Active,
        std::cmp::Ordering::Greater => StepStatus::Pending,
    }
}

/// One marker per step. `current >= total` marks every step complete.
pub fn markers(current: usize, total: usize) -> Vec<StepMarker> {
    (0..total)
        .map(|index| StepMarker {
            index,
            status: status(index, current),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(current: usize, total: usize) -> Vec<StepStatus> {
        markers(current, total).into_iter().map(|m| m.status).collect()
    }

    #[test]
    fn test_middle_step() {
        assert_eq!(
            statuses(1, 3),
            vec![StepStatus::Complete, StepStatus::Active, StepStatus::Pending]
        );
    }

    #[test]
    fn test_first_step() {
        assert_eq!(
            statuses(0, 2),
            vec![StepStatus::Active, StepStatus::Pending]
        );
    }

    #[test]
    fn test_past_the_end_is_all_complete() {
        assert!(statuses(3, 3).iter().all(|s| *s == StepStatus::Complete));
    }

    #[test]
    fn test_no_steps() {
        assert!(markers(0, 0).is_empty());
    }
}
