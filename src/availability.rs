//! Availability state: which days are fully booked and which single slots
//! are taken.
//!
//! [`AvailabilityStore`] keeps two copies of that state. The draft is what an
//! editor (or a booking in progress) mutates; the committed copy is the last
//! state the persistence collaborator accepted and is the only one published
//! to subscribers. `commit` promotes the draft as one unit.

use crate::{
    backend::{AvailabilityBackend, AvailabilityPayload, PersistenceError},
    date_key::{DateKey, SlotKey},
    reservation::{AvailabilityDelta, ReservationConflict, ReservationPlan, ReservationPlanner},
    time_slots::TimeSlot,
};
use std::collections::BTreeSet;
use tokio::sync::watch::{self, Sender};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    fully_booked_dates: BTreeSet<DateKey>,
    booked_slots: BTreeSet<SlotKey>,
}

impl Availability {
    pub fn new(
        fully_booked_dates: impl IntoIterator<Item = DateKey>,
        booked_slots: impl IntoIterator<Item = SlotKey>,
    ) -> Self {
        Self {
            fully_booked_dates: fully_booked_dates.into_iter().collect(),
            booked_slots: booked_slots.into_iter().collect(),
        }
    }

    /// Parses the collaborator payload once. Malformed keys are dropped with a
    /// warning; everything else is kept.
    pub fn from_payload(payload: &AvailabilityPayload) -> Self {
        let fully_booked_dates = payload
            .fully_booked_dates
            .iter()
            .filter_map(|raw| match raw.parse::<DateKey>() {
                Ok(date) => Some(date),
                Err(err) => {
                    warn!(%err, "Dropping malformed fully booked date");
                    None
                }
            });
        let booked_slots = payload
            .booked_slots
            .iter()
            .filter_map(|raw| match raw.parse::<SlotKey>() {
                Ok(slot) => Some(slot),
                Err(err) => {
                    warn!(%err, "Dropping malformed booked slot");
                    None
                }
            });
        Self::new(fully_booked_dates, booked_slots)
    }

    pub fn fully_booked_dates(&self) -> &BTreeSet<DateKey> {
        &self.fully_booked_dates
    }

    pub fn booked_slots(&self) -> &BTreeSet<SlotKey> {
        &self.booked_slots
    }

    pub fn is_fully_booked(&self, date: DateKey) -> bool {
        self.fully_booked_dates.contains(&date)
    }

    pub fn is_slot_booked(&self, date: DateKey, time: TimeSlot) -> bool {
        self.booked_slots.contains(&date.slot(time))
    }

    /// A fully booked day has no available slot, whatever the slot set says.
    pub fn is_slot_available(&self, date: DateKey, time: TimeSlot) -> bool {
        !self.is_fully_booked(date) && !self.is_slot_booked(date, time)
    }

    pub fn available_slots(&self, date: DateKey, slots: &[TimeSlot]) -> Vec<TimeSlot> {
        slots
            .iter()
            .copied()
            .filter(|time| self.is_slot_available(date, *time))
            .collect()
    }

    /// Returns whether the day is fully booked afterwards.
    pub fn toggle_full_day(&mut self, date: DateKey) -> bool {
        if !self.fully_booked_dates.remove(&date) {
            self.fully_booked_dates.insert(date);
            return true;
        }
        false
    }

    /// Returns whether the slot is booked afterwards.
    pub fn toggle_slot(&mut self, date: DateKey, time: TimeSlot) -> bool {
        let slot = date.slot(time);
        if !self.booked_slots.remove(&slot) {
            self.booked_slots.insert(slot);
            return true;
        }
        false
    }

    pub fn apply(&mut self, delta: &AvailabilityDelta) {
        self.fully_booked_dates
            .extend(delta.fully_booked_dates.iter().copied());
        self.booked_slots.extend(delta.booked_slots.iter().copied());
    }
}

pub struct AvailabilityStore<B: AvailabilityBackend> {
    backend: B,
    seed: Availability,
    committed: Availability,
    draft: Availability,
    sender: Sender<Availability>,
}

impl<B: AvailabilityBackend> AvailabilityStore<B> {
    /// Until [`load`](Self::load) resolves the store holds the (empty) seed.
    pub fn new(backend: B) -> Self {
        let (sender, _) = watch::channel(Availability::default());
        Self {
            backend,
            seed: Availability::default(),
            committed: Availability::default(),
            draft: Availability::default(),
            sender,
        }
    }

    /// Static state used before the first load and whenever loading fails.
    pub fn with_seed(mut self, seed: Availability) -> Self {
        self.committed = seed.clone();
        self.draft = seed.clone();
        self.seed = seed;
        self.sender.send_replace(self.committed.clone());
        self
    }

    /// Never fails: an unreachable collaborator degrades to the seed.
    pub async fn load(&mut self) -> &Availability {
        let availability = match self.backend.load().await {
            Ok(payload) => {
                info!(
                    fully_booked_dates = payload.fully_booked_dates.len(),
                    booked_slots = payload.booked_slots.len(),
                    "Loaded availability"
                );
                Availability::from_payload(&payload)
            }
            Err(err) => {
                warn!(?err, "Failed to load availability, falling back to default seed");
                self.seed.clone()
            }
        };

        self.draft = availability.clone();
        self.committed = availability;
        self.publish();
        &self.committed
    }

    /// Persists the draft as the new committed baseline. On failure the draft
    /// is left untouched so the caller can retry.
    pub async fn commit(&mut self) -> Result<(), PersistenceError> {
        let payload = AvailabilityPayload::from(&self.draft);
        if let Err(err) = self.backend.save(payload).await {
            error!(?err, "Failed to commit availability, draft kept for retry");
            return Err(err);
        }

        self.committed = self.draft.clone();
        info!(
            fully_booked_dates = self.committed.fully_booked_dates.len(),
            booked_slots = self.committed.booked_slots.len(),
            "Committed availability"
        );
        self.publish();
        Ok(())
    }

    pub fn toggle_full_day(&mut self, date: DateKey) -> bool {
        self.draft.toggle_full_day(date)
    }

    /// Allowed on fully booked days, where it has no effect on booking.
    pub fn toggle_slot(&mut self, date: DateKey, time: TimeSlot) -> bool {
        if self.draft.is_fully_booked(date) {
            debug!(%date, %time, "Toggling slot on a fully booked day");
        }
        self.draft.toggle_slot(date, time)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.draft != self.committed
    }

    pub fn discard_changes(&mut self) {
        self.draft = self.committed.clone();
    }

    /// Validates and writes a reservation into the draft in one step.
    pub fn reserve(
        &mut self,
        planner: &ReservationPlanner,
        plan: &ReservationPlan,
        time: TimeSlot,
    ) -> Result<AvailabilityDelta, ReservationConflict> {
        planner.validate(plan, time, &self.draft)?;
        let delta = planner.delta(plan, time);
        self.draft.apply(&delta);
        info!(start = %plan.start_date(), %time, days = plan.dates().len(), "Reserved in draft");
        Ok(delta)
    }

    pub fn draft(&self) -> &Availability {
        &self.draft
    }

    pub fn committed(&self) -> &Availability {
        &self.committed
    }

    /// Stream of committed states, starting with the current one.
    pub fn subscribe(&self) -> WatchStream<Availability> {
        WatchStream::new(self.sender.subscribe())
    }

    fn publish(&self) {
        self.sender.send_replace(self.committed.clone());
    }
}
