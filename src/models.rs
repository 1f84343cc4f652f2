use crate::errors::TrackerError;
use crate::identity::Identity;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub const WEEK_COUNT: usize = 12;
pub const DAYS_PER_WEEK: usize = 6;
pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayLabel {
    #[serde(rename = "M")]
    Monday,
    #[serde(rename = "T")]
    Tuesday,
    #[serde(rename = "W")]
    Wednesday,
    #[serde(rename = "Th")]
    Thursday,
    #[serde(rename = "F")]
    Friday,
    #[serde(rename = "S/S")]
    Weekend,
}

impl DayLabel {
    pub const ALL: [DayLabel; DAYS_PER_WEEK] = [
        DayLabel::Monday,
        DayLabel::Tuesday,
        DayLabel::Wednesday,
        DayLabel::Thursday,
        DayLabel::Friday,
        DayLabel::Weekend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayLabel::Monday => "M",
            DayLabel::Tuesday => "T",
            DayLabel::Wednesday => "W",
            DayLabel::Thursday => "Th",
            DayLabel::Friday => "F",
            DayLabel::Weekend => "S/S",
        }
    }
}

/// One training day. The label is fixed at construction; only the
/// editable fields are public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    #[serde(alias = "day")]
    label: DayLabel,
    #[serde(default, deserialize_with = "text")]
    pub workout: String,
    #[serde(default, deserialize_with = "text")]
    pub cardio: String,
    #[serde(default, deserialize_with = "text")]
    pub notes: String,
    #[serde(default)]
    pub done: bool,
}

impl Day {
    pub fn new(label: DayLabel) -> Self {
        Self {
            label,
            workout: String::new(),
            cardio: String::new(),
            notes: String::new(),
            done: false,
        }
    }

    pub fn label(&self) -> DayLabel {
        self.label
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    #[serde(default, with = "start_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "text")]
    pub checkpoint: String,
    #[serde(default, deserialize_with = "text")]
    pub weight: String,
    pub days: [Day; DAYS_PER_WEEK],
}

impl Default for Week {
    fn default() -> Self {
        Self {
            start_date: None,
            checkpoint: String::new(),
            weight: String::new(),
            days: DayLabel::ALL.map(Day::new),
        }
    }
}

/// The whole twelve-week record of one user; persisted as a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tracker {
    pub(crate) weeks: [Week; WEEK_COUNT],
}

impl Tracker {
    pub fn weeks(&self) -> &[Week; WEEK_COUNT] {
        &self.weeks
    }

    pub fn week(&self, index: usize) -> Result<&Week, TrackerError> {
        self.weeks
            .get(index)
            .ok_or(TrackerError::WeekOutOfRange(index))
    }

    /// Checks the invariants serde cannot express: day labels in fixed order.
    pub fn validate(&self) -> Result<(), TrackerError> {
        for (index, week) in self.weeks.iter().enumerate() {
            let in_order = week
                .days
                .iter()
                .map(Day::label)
                .eq(DayLabel::ALL.iter().copied());
            if !in_order {
                return Err(TrackerError::LabelOrder { week: index });
            }
        }
        Ok(())
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod start_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    // Older documents store an unset date as "".
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), FORMAT)
                .map(Some)
                .map_err(D::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayField {
    Workout,
    Cardio,
    Notes,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekField {
    Checkpoint,
    Weight,
}

#[derive(Debug, Deserialize)]
pub struct DayEditRequest {
    pub week: usize,
    pub day: usize,
    pub field: DayField,
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct WeekEditRequest {
    pub week: usize,
    pub field: WeekField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct StartDateRequest {
    pub week: usize,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Navigation {
    Previous,
    Next,
    Select { week: usize },
}

#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub prompted: bool,
    pub saved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub saved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoadStatus {
    Restored,
    Fresh,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<Identity>,
    pub current_week: usize,
    pub dirty: bool,
    pub state: SaveState,
    pub load: Option<LoadStatus>,
    pub tracker: Tracker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub workouts: usize,
    pub done_days: usize,
    pub weight: String,
    pub checkpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_tracker_has_fixed_shape() {
        let tracker = Tracker::default();
        assert_eq!(tracker.weeks().len(), WEEK_COUNT);
        for week in tracker.weeks() {
            let labels: Vec<&str> = week.days.iter().map(|day| day.label().as_str()).collect();
            assert_eq!(labels, ["M", "T", "W", "Th", "F", "S/S"]);
            assert!(week.days.iter().all(|day| !day.done && day.workout.is_empty()));
            assert!(week.start_date.is_none());
        }
        assert!(tracker.validate().is_ok());
    }

    #[test]
    fn serializes_as_weeks_document() {
        let value = serde_json::to_value(Tracker::default()).unwrap();
        let week = &value["weeks"][0];
        assert_eq!(week["startDate"], serde_json::Value::Null);
        assert_eq!(week["checkpoint"], "");
        assert_eq!(
            week["days"][5],
            json!({ "label": "S/S", "workout": "", "cardio": "", "notes": "", "done": false })
        );
    }

    #[test]
    fn reads_legacy_day_key_and_empty_start_date() {
        let days: Vec<serde_json::Value> = ["M", "T", "W", "Th", "F", "S/S"]
            .iter()
            .map(|day| json!({ "day": day, "workout": "", "cardio": null, "notes": "", "done": false }))
            .collect();
        let legacy_week = json!({
            "startDate": "",
            "checkpoint": "felt strong",
            "weight": "82",
            "days": days,
        });
        let weeks = vec![legacy_week; WEEK_COUNT];
        let doc = json!({ "weeks": weeks });

        let tracker: Tracker = serde_json::from_value(doc).unwrap();
        assert!(tracker.validate().is_ok());
        let week = tracker.week(0).unwrap();
        assert_eq!(week.start_date, None);
        assert_eq!(week.checkpoint, "felt strong");
        assert_eq!(week.days[1].cardio, "");
    }

    #[test]
    fn parses_iso_start_date() {
        let mut doc = serde_json::to_value(Tracker::default()).unwrap();
        doc["weeks"][3]["startDate"] = json!("2025-01-06");
        let tracker: Tracker = serde_json::from_value(doc).unwrap();
        assert_eq!(
            tracker.week(3).unwrap().start_date,
            NaiveDate::from_ymd_opt(2025, 1, 6)
        );
    }

    #[test]
    fn rejects_wrong_week_count() {
        let mut doc = serde_json::to_value(Tracker::default()).unwrap();
        doc["weeks"].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<Tracker>(doc).is_err());
    }

    #[test]
    fn validate_flags_reordered_labels() {
        let mut doc = serde_json::to_value(Tracker::default()).unwrap();
        doc["weeks"][2]["days"][0]["label"] = json!("T");
        let tracker: Tracker = serde_json::from_value(doc).unwrap();
        assert!(matches!(
            tracker.validate(),
            Err(TrackerError::LabelOrder { week: 2 })
        ));
    }
}
