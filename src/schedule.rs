use std::fmt;

use serde::{Deserialize, Serialize};
use time::{macros::offset, Date, OffsetDateTime, UtcOffset, Weekday};

/// All schedule decisions are made in Indian Standard Time.
pub const IST: UtcOffset = offset!(+5:30);

/// Time-derived meal slot. Snack is not here: it is a tab the user picks,
/// never something the clock resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day and slot a recipe query is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMealKey {
    pub day: Weekday,
    pub slot: MealSlot,
}

impl DayMealKey {
    /// Full English day name, the form recipes store ("Monday").
    pub fn day_name(&self) -> String {
        self.day.to_string()
    }
}

/// Slot for an IST wall-clock hour: [5,11) breakfast, [11,16) lunch,
/// everything else dinner.
pub fn slot_for_hour(hour: u8) -> MealSlot {
    if (5..11).contains(&hour) {
        MealSlot::Breakfast
    } else if (11..16).contains(&hour) {
        MealSlot::Lunch
    } else {
        MealSlot::Dinner
    }
}

/// Shift an instant into IST and derive its day/slot key.
pub fn resolve(instant: OffsetDateTime) -> DayMealKey {
    let ist = instant.to_offset(IST);
    DayMealKey {
        day: ist.weekday(),
        slot: slot_for_hour(ist.hour()),
    }
}

/// The IST calendar date of an instant, used to memoize "today".
pub fn today(instant: OffsetDateTime) -> Date {
    instant.to_offset(IST).date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn slot_boundaries() {
        assert_eq!(slot_for_hour(4), MealSlot::Dinner);
        assert_eq!(slot_for_hour(5), MealSlot::Breakfast);
        assert_eq!(slot_for_hour(10), MealSlot::Breakfast);
        assert_eq!(slot_for_hour(11), MealSlot::Lunch);
        assert_eq!(slot_for_hour(15), MealSlot::Lunch);
        assert_eq!(slot_for_hour(16), MealSlot::Dinner);
    }

    #[test]
    fn slot_is_total_over_all_hours() {
        for hour in 0u8..24 {
            // Must always land on one of the three slots.
            let _ = slot_for_hour(hour).as_str();
        }
    }

    #[test]
    fn boundary_minutes_resolve_like_their_hour() {
        // 4:59 IST is still dinner, 5:00 IST flips to breakfast.
        let before = resolve(datetime!(2025-03-03 4:59 +5:30));
        let after = resolve(datetime!(2025-03-03 5:00 +5:30));
        assert_eq!(before.slot, MealSlot::Dinner);
        assert_eq!(after.slot, MealSlot::Breakfast);

        let late_lunch = resolve(datetime!(2025-03-03 15:59 +5:30));
        let dinner = resolve(datetime!(2025-03-03 16:00 +5:30));
        assert_eq!(late_lunch.slot, MealSlot::Lunch);
        assert_eq!(dinner.slot, MealSlot::Dinner);
    }

    #[test]
    fn tuesday_noon_ist_is_tuesday_lunch() {
        // 2025-03-04 is a Tuesday. 12:00 IST == 06:30 UTC.
        let key = resolve(datetime!(2025-03-04 06:30 UTC));
        assert_eq!(key.day_name(), "Tuesday");
        assert_eq!(key.slot, MealSlot::Lunch);
    }

    #[test]
    fn late_utc_evening_rolls_into_next_ist_day() {
        // 20:00 UTC Monday is 01:30 IST Tuesday.
        let key = resolve(datetime!(2025-03-03 20:00 UTC));
        assert_eq!(key.day_name(), "Tuesday");
        assert_eq!(key.slot, MealSlot::Dinner);

        let date = today(datetime!(2025-03-03 20:00 UTC));
        assert_eq!(date, datetime!(2025-03-04 0:00 UTC).date());
    }

    #[test]
    fn slot_serializes_lowercase() {
        let json = serde_json::to_string(&MealSlot::Breakfast).expect("serialize");
        assert_eq!(json, "\"breakfast\"");
    }
}
