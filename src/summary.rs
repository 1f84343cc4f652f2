use crate::models::{Tracker, WeekSummary};
use chrono::Days;

pub fn build_summary(tracker: &Tracker) -> Vec<WeekSummary> {
    tracker
        .weeks()
        .iter()
        .enumerate()
        .map(|(index, week)| WeekSummary {
            week: index + 1,
            start_date: week.start_date,
            end_date: week
                .start_date
                .and_then(|start| start.checked_add_days(Days::new(6))),
            workouts: week.days.iter().filter(|day| !day.workout.is_empty()).count(),
            done_days: week.days.iter().filter(|day| day.done).count(),
            weight: week.weight.clone(),
            checkpoint: week.checkpoint.clone(),
        })
        .collect()
}
