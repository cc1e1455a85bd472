// libs/availability-cell/src/services/generator.rs
use chrono::{Duration, NaiveTime, Timelike};

use crate::models::{AvailabilityError, GeneratorSettings, SlotWindow};

/// Ordered, finite sequence of candidate slots over a shift window.
///
/// Consuming the iterator is the only way through it; once exhausted it
/// yields nothing further. Slots advance on a fixed grid from the start
/// hour; an increment whose starting hour is in the break set is skipped
/// without shifting the grid, and a trailing slot that would run past the
/// end of the shift is discarded.
#[derive(Debug)]
pub struct SlotSequence {
    cursor: NaiveTime,
    end_time: NaiveTime,
    slot_duration: Duration,
    break_hours: Vec<u32>,
}

impl SlotSequence {
    pub fn new(settings: &GeneratorSettings) -> Result<Self, AvailabilityError> {
        if settings.slot_minutes == 0 {
            return Err(AvailabilityError::ValidationError(
                "Slot duration must be greater than zero".to_string(),
            ));
        }
        if settings.start_hour >= settings.end_hour {
            return Err(AvailabilityError::ValidationError(
                "Shift start hour must be before end hour".to_string(),
            ));
        }

        let cursor = NaiveTime::from_hms_opt(settings.start_hour, 0, 0).ok_or_else(|| {
            AvailabilityError::ValidationError("Shift hours must be between 0 and 23".to_string())
        })?;
        let end_time = NaiveTime::from_hms_opt(settings.end_hour, 0, 0).ok_or_else(|| {
            AvailabilityError::ValidationError("Shift hours must be between 0 and 23".to_string())
        })?;

        Ok(Self {
            cursor,
            end_time,
            slot_duration: Duration::minutes(i64::from(settings.slot_minutes)),
            break_hours: settings.break_hours.clone(),
        })
    }

    /// Run the whole sequence into a vector.
    pub fn collect_windows(settings: &GeneratorSettings) -> Result<Vec<SlotWindow>, AvailabilityError> {
        Ok(Self::new(settings)?.collect())
    }
}

impl Iterator for SlotSequence {
    type Item = SlotWindow;

    fn next(&mut self) -> Option<SlotWindow> {
        loop {
            // overflowing_add reports seconds wrapped past midnight; any
            // wrap means the slot cannot fit in the shift
            let (slot_end, wrapped) = self.cursor.overflowing_add_signed(self.slot_duration);
            if wrapped != 0 || slot_end > self.end_time {
                return None;
            }

            let start = self.cursor;
            self.cursor = slot_end;

            if self.break_hours.contains(&start.hour()) {
                continue;
            }

            return Some(SlotWindow {
                start_time: start,
                end_time: slot_end,
            });
        }
    }
}
