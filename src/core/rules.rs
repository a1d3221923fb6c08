//! Streak and module-completion rules.
//!
//! Every function here is a pure transformation of a [`ProgressRecord`]:
//! the record goes in by value and the updated record comes back. Nothing
//! here touches storage.

use chrono::NaiveDate;

use crate::core::record::{format_date, today, ProgressRecord};

/// XP awarded for completing a module when no reward is given.
pub const DEFAULT_XP_PER_MODULE: i64 = 100;

/// How a streak changes for a given day delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTransition {
    /// Already active today.
    Unchanged,
    /// Active yesterday; the streak continues.
    Extend,
    /// Gap, backwards clock, or unreadable date; today is day 1.
    Reset,
}

impl StreakTransition {
    /// Classify the number of days between the last active date and today.
    pub fn for_delta(days: i64) -> Self {
        match days {
            0 => Self::Unchanged,
            1 => Self::Extend,
            _ => Self::Reset,
        }
    }

    /// Classify activity on `today` given the last active date, if readable.
    pub fn between(last: Option<NaiveDate>, today: NaiveDate) -> Self {
        last.map_or(Self::Reset, |last| {
            Self::for_delta((today - last).num_days())
        })
    }

    /// Short name for display and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Extend => "extend",
            Self::Reset => "reset",
        }
    }
}

/// Record activity for today.
pub fn touch_activity(record: ProgressRecord) -> ProgressRecord {
    touch_activity_on(record, today())
}

/// Record activity for `today`.
///
/// Same day is a no-op, the next day extends the streak, and anything else
/// (including a date in the future) resets it to 1.
pub fn touch_activity_on(mut record: ProgressRecord, today: NaiveDate) -> ProgressRecord {
    let last = record.last_active();
    if last.is_none() {
        tracing::warn!(
            last_active_date = %record.last_active_date,
            "unreadable last active date, restarting streak"
        );
    }

    match StreakTransition::between(last, today) {
        StreakTransition::Unchanged => return record,
        StreakTransition::Extend => record.streak_days = record.streak_days.saturating_add(1),
        StreakTransition::Reset => record.streak_days = 1,
    }
    record.last_active_date = format_date(today);
    record
}

/// Mark a module complete, awarding `xp_reward` the first time only.
///
/// Counters saturate at `i64::MAX` instead of wrapping.
pub fn complete_module(
    record: ProgressRecord,
    module_name: &str,
    xp_reward: i64,
) -> ProgressRecord {
    complete_module_on(record, module_name, xp_reward, today())
}

/// Mark a module complete as of `today`.
///
/// A blank name leaves the record untouched. Otherwise activity is recorded
/// first, then the module is appended and XP awarded unless it was already
/// completed.
pub fn complete_module_on(
    record: ProgressRecord,
    module_name: &str,
    xp_reward: i64,
    today: NaiveDate,
) -> ProgressRecord {
    let module_name = module_name.trim();
    if module_name.is_empty() {
        return record;
    }

    let mut record = touch_activity_on(record, today);

    if !record.has_completed(module_name) {
        record.completed_modules.push(module_name.to_string());
        record.xp = record.xp.saturating_add(xp_reward);
    }

    record
}
