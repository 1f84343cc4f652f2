use crate::errors::TrackerError;
use crate::models::{DAYS_PER_WEEK, Day, Tracker, WEEK_COUNT, Week};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayEdit {
    Workout(String),
    Cardio(String),
    Notes(String),
    Done(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekEdit {
    Checkpoint(String),
    Weight(String),
}

/// A single-field change addressed into the tracker grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Day { week: usize, day: usize, edit: DayEdit },
    Week { week: usize, edit: WeekEdit },
    StartDate { week: usize, date: Option<NaiveDate> },
}

impl Edit {
    pub fn apply(self, tracker: &Tracker) -> Result<Tracker, TrackerError> {
        match self {
            Edit::Day { week, day, edit } => tracker.set_field(week, day, edit),
            Edit::Week { week, edit } => tracker.set_week_field(week, edit),
            Edit::StartDate { week, date } => tracker.set_start_date(week, date),
        }
    }
}

impl Tracker {
    pub fn set_field(&self, week: usize, day: usize, edit: DayEdit) -> Result<Tracker, TrackerError> {
        check_week(week)?;
        if day >= DAYS_PER_WEEK {
            return Err(TrackerError::DayOutOfRange(day));
        }

        let mut next = self.clone();
        let target: &mut Day = &mut next.weeks[week].days[day];
        match edit {
            DayEdit::Workout(value) => target.workout = value,
            DayEdit::Cardio(value) => target.cardio = value,
            DayEdit::Notes(value) => target.notes = value,
            DayEdit::Done(value) => target.done = value,
        }
        Ok(next)
    }

    pub fn set_week_field(&self, week: usize, edit: WeekEdit) -> Result<Tracker, TrackerError> {
        check_week(week)?;

        let mut next = self.clone();
        let target: &mut Week = &mut next.weeks[week];
        match edit {
            WeekEdit::Checkpoint(value) => target.checkpoint = value,
            WeekEdit::Weight(value) => target.weight = value,
        }
        Ok(next)
    }

    pub fn set_start_date(&self, week: usize, date: Option<NaiveDate>) -> Result<Tracker, TrackerError> {
        check_week(week)?;

        let mut next = self.clone();
        next.weeks[week].start_date = date;
        Ok(next)
    }
}

fn check_week(week: usize) -> Result<(), TrackerError> {
    if week >= WEEK_COUNT {
        return Err(TrackerError::WeekOutOfRange(week));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayLabel;

    fn count_changed_days(before: &Tracker, after: &Tracker) -> usize {
        before
            .weeks()
            .iter()
            .zip(after.weeks())
            .flat_map(|(a, b)| a.days.iter().zip(b.days.iter()))
            .filter(|(a, b)| a != b)
            .count()
    }

    #[test]
    fn set_field_touches_exactly_one_day() {
        let before = Tracker::default()
            .set_field(4, 2, DayEdit::Notes("deload".into()))
            .unwrap();

        for week in 0..WEEK_COUNT {
            for day in 0..DAYS_PER_WEEK {
                let edits = [
                    DayEdit::Workout("Bench 3x8".into()),
                    DayEdit::Cardio("20 min row".into()),
                    DayEdit::Notes("tired".into()),
                    DayEdit::Done(true),
                ];
                for edit in edits {
                    let after = before.set_field(week, day, edit).unwrap();
                    assert_eq!(count_changed_days(&before, &after), 1);
                    for (index, (a, b)) in before.weeks().iter().zip(after.weeks()).enumerate() {
                        assert_eq!(a.checkpoint, b.checkpoint);
                        assert_eq!(a.weight, b.weight);
                        assert_eq!(a.start_date, b.start_date);
                        if index != week {
                            assert_eq!(a, b);
                        }
                    }
                    assert!(after.validate().is_ok());
                }
            }
        }
    }

    #[test]
    fn set_field_keeps_label() {
        let after = Tracker::default()
            .set_field(0, 5, DayEdit::Workout("Long run".into()))
            .unwrap();
        let day = &after.week(0).unwrap().days[5];
        assert_eq!(day.label(), DayLabel::Weekend);
        assert_eq!(day.workout, "Long run");
    }

    #[test]
    fn squat_then_done_scenario() {
        let tracker = Tracker::default()
            .set_field(0, 0, DayEdit::Workout("Squat 5x5".into()))
            .and_then(|t| t.set_field(0, 0, DayEdit::Done(true)))
            .unwrap();

        let day = &tracker.week(0).unwrap().days[0];
        assert_eq!(day.label(), DayLabel::Monday);
        assert_eq!(day.workout, "Squat 5x5");
        assert_eq!(day.cardio, "");
        assert_eq!(day.notes, "");
        assert!(day.done);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let tracker = Tracker::default();
        assert!(matches!(
            tracker.set_field(12, 0, DayEdit::Done(true)),
            Err(TrackerError::WeekOutOfRange(12))
        ));
        assert!(matches!(
            tracker.set_field(0, 6, DayEdit::Done(true)),
            Err(TrackerError::DayOutOfRange(6))
        ));
        assert!(tracker.set_week_field(99, WeekEdit::Weight("80".into())).is_err());
        assert!(tracker.set_start_date(12, None).is_err());
    }

    #[test]
    fn week_edits_leave_days_alone() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3);
        let tracker = Tracker::default();
        let after = Edit::Week { week: 1, edit: WeekEdit::Checkpoint("PR on deadlift".into()) }
            .apply(&tracker)
            .and_then(|t| Edit::Week { week: 1, edit: WeekEdit::Weight("81.5".into()) }.apply(&t))
            .and_then(|t| Edit::StartDate { week: 1, date }.apply(&t))
            .unwrap();

        let week = after.week(1).unwrap();
        assert_eq!(week.checkpoint, "PR on deadlift");
        assert_eq!(week.weight, "81.5");
        assert_eq!(week.start_date, date);
        assert_eq!(week.days, tracker.week(1).unwrap().days);
        assert_eq!(count_changed_days(&tracker, &after), 0);
    }
}
