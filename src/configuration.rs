use crate::time_slots::{self, TimeSlot};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::{Validate, ValidationError};

pub trait Configuration: Clone + Send + Sync + 'static {
    fn business_hours(&self) -> BusinessHours;
    fn workload_thresholds(&self) -> WorkloadThresholds;
    fn availability_url(&self) -> Option<String>;
}

/// Bookable window of a workday. Hours are whole local hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_window"))]
pub struct BusinessHours {
    #[validate(range(max = 23))]
    pub start_hour: u32,
    #[validate(range(min = 1, max = 24))]
    pub end_hour: u32,
    #[validate(range(max = 24))]
    pub break_start: u32,
    #[validate(range(max = 24))]
    pub break_end: u32,
    #[validate(range(min = 1, max = 720))]
    pub slot_interval_minutes: u32,
}

fn validate_window(hours: &BusinessHours) -> Result<(), ValidationError> {
    if hours.start_hour >= hours.end_hour {
        return Err(ValidationError::new("start_not_before_end"));
    }
    Ok(())
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
            break_start: 12,
            break_end: 13,
            slot_interval_minutes: 60,
        }
    }
}

impl BusinessHours {
    /// Upstream hours are a data-quality concern, so invalid ones are
    /// replaced by the defaults instead of being surfaced to the user.
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                warn!(?err, hours = ?self, "Invalid business hours, using defaults");
                Self::default()
            }
        }
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        time_slots::generate(
            self.start_hour,
            self.end_hour,
            self.break_start,
            self.break_end,
            self.slot_interval_minutes,
        )
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_hour * 60
    }

    /// Length of the whole window, break included.
    pub fn window_minutes(&self) -> u32 {
        self.end_hour.saturating_sub(self.start_hour) * 60
    }

    /// Part of the break that falls inside the window.
    pub fn break_minutes(&self) -> u32 {
        let start = self.break_start.max(self.start_hour);
        let end = self.break_end.min(self.end_hour);
        end.saturating_sub(start) * 60
    }

    pub fn capacity_minutes(&self) -> u32 {
        self.window_minutes() - self.break_minutes()
    }
}

/// Workload percentage boundaries, `medium_from <= high_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadThresholds {
    pub medium_from: u32,
    pub high_from: u32,
}

impl Default for WorkloadThresholds {
    fn default() -> Self {
        Self {
            medium_from: 50,
            high_from: 80,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_hours_are_valid() {
        let hours = BusinessHours::default();
        hours.validate().unwrap();
        assert_eq!(hours.window_minutes(), 600);
        assert_eq!(hours.break_minutes(), 60);
        assert_eq!(hours.capacity_minutes(), 540);
        assert_eq!(hours.slots().len(), 9);
    }

    #[test_case(BusinessHours { start_hour: 18, end_hour: 8, ..Default::default() } ; "inverted window")]
    #[test_case(BusinessHours { end_hour: 25, ..Default::default() } ; "end after midnight")]
    #[test_case(BusinessHours { slot_interval_minutes: 0, ..Default::default() } ; "zero interval")]
    fn test_invalid_hours_fall_back(hours: BusinessHours) {
        hours.validate().unwrap_err();
        assert_eq!(hours.validated_or_default(), BusinessHours::default());
    }

    #[test]
    fn test_break_outside_window_costs_nothing() {
        let hours = BusinessHours {
            start_hour: 13,
            end_hour: 17,
            break_start: 10,
            break_end: 12,
            slot_interval_minutes: 30,
        };
        assert_eq!(hours.validated_or_default(), hours);
        assert_eq!(hours.break_minutes(), 0);
        assert_eq!(hours.capacity_minutes(), 240);
    }
}
