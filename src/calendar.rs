//! Keyboard-driven date picker state.
//!
//! The navigator owns a focused date (the cursor) and the month that is
//! shown. Every transition that moves the cursor reports the new focus so the
//! presentation layer can move its own focus along with it, including when the
//! visible month changes. Selection is independent of any booking; it only
//! refuses past and fully booked days.

use crate::{availability::Availability, date_key::DateKey};
use chrono::{Datelike, Days, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved; focus has to follow it.
    Focus { date: DateKey, month_changed: bool },
    Selected(DateKey),
    /// Nothing changed, e.g. Enter on a past or fully booked day.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: DateKey,
    pub is_today: bool,
    pub is_selected: bool,
    /// Exactly one cell of the grid takes focus.
    pub is_focused: bool,
    pub is_disabled: bool,
}

pub type Week = [Option<DayCell>; 7];

#[derive(Debug, Clone)]
pub struct CalendarNavigator {
    today: NaiveDate,
    focused: NaiveDate,
    selected: Option<NaiveDate>,
    visible_month: NaiveDate,
}

impl CalendarNavigator {
    pub fn new(selected: Option<DateKey>, today: DateKey) -> Self {
        let selected = selected.map(|date| date.date());
        let focused = selected.unwrap_or(today.date());
        Self {
            today: today.date(),
            focused,
            selected,
            visible_month: first_of_month(focused),
        }
    }

    /// Navigator anchored on the local calendar's today.
    pub fn for_today(selected: Option<DateKey>) -> Self {
        Self::new(selected, DateKey::today())
    }

    pub fn focused(&self) -> DateKey {
        self.focused.into()
    }

    pub fn selected(&self) -> Option<DateKey> {
        self.selected.map(DateKey::from)
    }

    /// First day of the shown month.
    pub fn visible_month(&self) -> DateKey {
        self.visible_month.into()
    }

    pub fn handle_key(
        &mut self,
        key: CalendarKey,
        shift: bool,
        availability: &Availability,
    ) -> Navigation {
        let focused = self.focused;
        let target = match key {
            CalendarKey::ArrowLeft => focused.checked_sub_days(Days::new(1)),
            CalendarKey::ArrowRight => focused.checked_add_days(Days::new(1)),
            CalendarKey::ArrowUp => focused.checked_sub_days(Days::new(7)),
            CalendarKey::ArrowDown => focused.checked_add_days(Days::new(7)),
            CalendarKey::PageUp => focused.checked_sub_months(month_step(shift)),
            CalendarKey::PageDown => focused.checked_add_months(month_step(shift)),
            CalendarKey::Home => {
                focused.checked_sub_days(Days::new(days_from_sunday(focused)))
            }
            CalendarKey::End => {
                focused.checked_add_days(Days::new(6 - days_from_sunday(focused)))
            }
            CalendarKey::Enter | CalendarKey::Space => {
                return self.select(focused.into(), availability);
            }
        };

        match target {
            Some(target) => self.move_focus(target),
            None => Navigation::Ignored,
        }
    }

    /// Pointer navigation to the previous month, keeping the cursor in it.
    pub fn previous_month(&mut self) -> Navigation {
        match self.focused.checked_sub_months(Months::new(1)) {
            Some(target) => self.move_focus(target),
            None => Navigation::Ignored,
        }
    }

    pub fn next_month(&mut self) -> Navigation {
        match self.focused.checked_add_months(Months::new(1)) {
            Some(target) => self.move_focus(target),
            None => Navigation::Ignored,
        }
    }

    /// Pointer selection: moves the cursor to `date`, then selects it under
    /// the same rules as Enter.
    pub fn click(&mut self, date: DateKey, availability: &Availability) -> Navigation {
        if self.is_disabled(date.date(), availability) {
            return Navigation::Ignored;
        }
        self.move_focus(date.date());
        self.select(date, availability)
    }

    pub fn is_selectable(&self, date: DateKey, availability: &Availability) -> bool {
        !self.is_disabled(date.date(), availability)
    }

    /// Sunday-first weeks of the visible month, padded with blanks.
    pub fn grid(&self, availability: &Availability) -> Vec<Week> {
        let leading = days_from_sunday(self.visible_month) as usize;
        let mut cells: Vec<Option<DayCell>> = vec![None; leading];

        cells.extend(
            self.visible_month
                .iter_days()
                .take_while(|date| date.month() == self.visible_month.month())
                .map(|date| Some(self.cell(date, availability))),
        );
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        cells
            .chunks(7)
            .map(|week| {
                let mut row: Week = [None; 7];
                row.copy_from_slice(week);
                row
            })
            .collect()
    }

    fn cell(&self, date: NaiveDate, availability: &Availability) -> DayCell {
        DayCell {
            date: date.into(),
            is_today: date == self.today,
            is_selected: self.selected == Some(date),
            is_focused: date == self.focused,
            is_disabled: self.is_disabled(date, availability),
        }
    }

    fn select(&mut self, date: DateKey, availability: &Availability) -> Navigation {
        if self.is_disabled(date.date(), availability) {
            return Navigation::Ignored;
        }
        self.selected = Some(date.date());
        Navigation::Selected(date)
    }

    fn is_disabled(&self, date: NaiveDate, availability: &Availability) -> bool {
        date < self.today || availability.is_fully_booked(date.into())
    }

    fn move_focus(&mut self, target: NaiveDate) -> Navigation {
        let month = first_of_month(target);
        let month_changed = month != self.visible_month;
        self.focused = target;
        self.visible_month = month;
        Navigation::Focus {
            date: target.into(),
            month_changed,
        }
    }
}

fn month_step(shift: bool) -> Months {
    match shift {
        true => Months::new(12),
        false => Months::new(1),
    }
}

fn days_from_sunday(date: NaiveDate) -> u64 {
    date.weekday().num_days_from_sunday() as u64
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
