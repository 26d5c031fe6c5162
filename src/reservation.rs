//! Turns a service and a start date into the days and the slot a booking
//! occupies, checks them against availability and produces the resulting
//! availability.
//!
//! Day-level exclusivity only applies to multi-day services: a booking that
//! spans several days marks every one of them fully booked, while a single-day
//! booking occupies exactly one slot and leaves the rest of its day bookable.

use crate::{
    availability::Availability,
    configuration::BusinessHours,
    date_key::{DateKey, SlotKey},
    time_slots::TimeSlot,
    types::Service,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReservationConflict {
    #[error("{0} is not a bookable time")]
    UnknownTimeSlot(TimeSlot),
    #[error("{0} is fully booked")]
    FullyBooked(DateKey),
    #[error("{0} is already booked")]
    SlotTaken(SlotKey),
}

impl ReservationConflict {
    pub fn conflicting_date(&self) -> Option<DateKey> {
        match self {
            Self::UnknownTimeSlot(_) => None,
            Self::FullyBooked(date) => Some(*date),
            Self::SlotTaken(slot) => Some(slot.date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationPlan {
    service_id: Uuid,
    dates: Vec<DateKey>,
    primary_time: Option<TimeSlot>,
}

impl ReservationPlan {
    pub fn service_id(&self) -> Uuid {
        self.service_id
    }

    /// Consecutive days from the start date, never empty.
    pub fn dates(&self) -> &[DateKey] {
        &self.dates
    }

    pub fn start_date(&self) -> DateKey {
        self.dates[0]
    }

    pub fn end_date(&self) -> DateKey {
        self.dates[self.dates.len() - 1]
    }

    /// Earliest slot of the business day, offered as the default choice.
    pub fn primary_time(&self) -> Option<TimeSlot> {
        self.primary_time
    }

    pub fn is_multi_day(&self) -> bool {
        self.dates.len() > 1
    }

    pub fn request(&self, time: TimeSlot) -> BookingRequest {
        BookingRequest {
            service_id: self.service_id,
            date: self.start_date(),
            end_date: self.end_date(),
            time,
        }
    }
}

/// Payload handed to the booking-submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub service_id: Uuid,
    pub date: DateKey,
    pub end_date: DateKey,
    pub time: TimeSlot,
}

/// Keys a reservation adds to availability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityDelta {
    pub fully_booked_dates: Vec<DateKey>,
    pub booked_slots: Vec<SlotKey>,
}

#[derive(Debug, Clone)]
pub struct ReservationPlanner {
    slots: Vec<TimeSlot>,
}

impl Default for ReservationPlanner {
    fn default() -> Self {
        Self::new(BusinessHours::default())
    }
}

impl ReservationPlanner {
    pub fn new(hours: BusinessHours) -> Self {
        Self {
            slots: hours.validated_or_default().slots(),
        }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn plan(&self, service: &Service, start_date: DateKey) -> ReservationPlan {
        let days = service.duration_days().max(1);
        ReservationPlan {
            service_id: service.id,
            dates: start_date.range(days),
            primary_time: self.slots.first().copied(),
        }
    }

    /// Reports the earliest conflicting date when several dates conflict.
    pub fn validate(
        &self,
        plan: &ReservationPlan,
        time: TimeSlot,
        availability: &Availability,
    ) -> Result<(), ReservationConflict> {
        if !self.slots.contains(&time) {
            debug!(%time, "Rejected reservation at unknown time");
            return Err(ReservationConflict::UnknownTimeSlot(time));
        }

        let start_date = plan.start_date();
        for date in plan.dates() {
            if availability.is_fully_booked(*date) {
                debug!(%date, "Rejected reservation on fully booked date");
                return Err(ReservationConflict::FullyBooked(*date));
            }
            if *date == start_date && availability.is_slot_booked(*date, time) {
                debug!(%date, %time, "Rejected reservation on booked slot");
                return Err(ReservationConflict::SlotTaken(date.slot(time)));
            }
        }
        Ok(())
    }

    pub fn delta(&self, plan: &ReservationPlan, time: TimeSlot) -> AvailabilityDelta {
        AvailabilityDelta {
            fully_booked_dates: match plan.is_multi_day() {
                true => plan.dates.clone(),
                false => vec![],
            },
            booked_slots: vec![plan.start_date().slot(time)],
        }
    }

    /// Availability after the reservation. Call [`validate`](Self::validate)
    /// first; this does not check for conflicts.
    pub fn commit(
        &self,
        plan: &ReservationPlan,
        time: TimeSlot,
        availability: &Availability,
    ) -> Availability {
        let mut availability = availability.clone();
        availability.apply(&self.delta(plan, time));
        availability
    }
}
