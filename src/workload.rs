//! Per-technician daily workload, read-only over committed bookings.
//!
//! Segments are placed on a timeline that starts at the beginning of the
//! business day. Overlapping segments are reported as they are; preventing
//! overlaps is the reservation planner's job.

use crate::{
    configuration::{BusinessHours, WorkloadThresholds},
    date_key::DateKey,
    types::{Booking, ServiceIndex, Technician, DEFAULT_DURATION_MINUTES},
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment<'a> {
    /// Minutes after the start of the business day.
    pub offset_minutes: i32,
    pub duration_minutes: u32,
    pub booking: &'a Booking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLoad<'a> {
    pub technician_id: Uuid,
    pub date: DateKey,
    /// Includes bookings whose segment falls outside the timeline.
    pub total_minutes: u32,
    pub percentage: u32,
    pub level: WorkloadLevel,
    pub segments: Vec<Segment<'a>>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkloadAggregator {
    hours: BusinessHours,
    thresholds: WorkloadThresholds,
}

impl WorkloadAggregator {
    pub fn new(hours: BusinessHours, thresholds: WorkloadThresholds) -> Self {
        Self {
            hours: hours.validated_or_default(),
            thresholds,
        }
    }

    pub fn daily_load<'a>(
        &self,
        technician: &Technician,
        date: DateKey,
        bookings: &'a [Booking],
        services: &ServiceIndex,
    ) -> DailyLoad<'a> {
        let window = self.hours.window_minutes();
        let mut total_minutes: u32 = 0;
        let mut segments = vec![];

        let assigned = bookings.iter().filter(|booking| {
            !booking.status.is_cancelled()
                && booking.technician_id == Some(technician.id)
                && booking.covers(date)
        });

        for booking in assigned {
            let (offset_minutes, duration_minutes) =
                if booking.is_multi_day() && date != booking.start_date {
                    (0, window)
                } else {
                    let offset =
                        booking.time.minutes() as i32 - self.hours.start_minutes() as i32;
                    (offset, self.service_minutes(booking, services))
                };

            total_minutes = total_minutes.saturating_add(duration_minutes);
            if (0..window as i32).contains(&offset_minutes) {
                segments.push(Segment {
                    offset_minutes,
                    duration_minutes,
                    booking,
                });
            }
        }
        segments.sort_by_key(|segment| segment.offset_minutes);

        let percentage = self.percentage(total_minutes);
        DailyLoad {
            technician_id: technician.id,
            date,
            total_minutes,
            percentage,
            level: self.level(percentage),
            segments,
        }
    }

    /// One load per technician, in the given order.
    pub fn team_load<'a>(
        &self,
        technicians: &[Technician],
        date: DateKey,
        bookings: &'a [Booking],
        services: &ServiceIndex,
    ) -> Vec<DailyLoad<'a>> {
        technicians
            .iter()
            .map(|technician| self.daily_load(technician, date, bookings, services))
            .collect()
    }

    fn service_minutes(&self, booking: &Booking, services: &ServiceIndex) -> u32 {
        match services.get(&booking.service_id) {
            Some(service) => service.duration_minutes(),
            None => {
                warn!(booking = %booking.id, service = %booking.service_id, "Unknown service, assuming default duration");
                DEFAULT_DURATION_MINUTES
            }
        }
    }

    /// Share of the paid capacity (window minus break), clamped to 100.
    fn percentage(&self, total_minutes: u32) -> u32 {
        let capacity = self.hours.capacity_minutes();
        if capacity == 0 {
            return if total_minutes > 0 { 100 } else { 0 };
        }
        (u64::from(total_minutes) * 100 / u64::from(capacity)).min(100) as u32
    }

    fn level(&self, percentage: u32) -> WorkloadLevel {
        if percentage < self.thresholds.medium_from {
            WorkloadLevel::Low
        } else if percentage < self.thresholds.high_from {
            WorkloadLevel::Medium
        } else {
            WorkloadLevel::High
        }
    }
}
