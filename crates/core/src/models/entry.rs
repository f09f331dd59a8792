use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Date format used on the wire and in the entries file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Absence reasons offered by the UI; anything else is free text.
pub const ABSENCE_REASONS: [&str; 3] = ["Malade", "Vacances", "Autre"];

/// One contiguous presence block within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSegment {
    pub id: String,
    pub arrival_time: Option<String>,
    pub leaving_time: Option<String>,
}

impl TimeSegment {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arrival_time: None,
            leaving_time: None,
        }
    }

    pub fn new(id: impl Into<String>, arrival: &str, leaving: &str) -> Self {
        Self {
            id: id.into(),
            arrival_time: Some(arrival.to_string()),
            leaving_time: Some(leaving.to_string()),
        }
    }

    /// True when at least one bound has been filled in.
    pub fn is_recorded(&self) -> bool {
        self.arrival_time.as_deref().is_some_and(|t| !t.is_empty())
            || self.leaving_time.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Entry-level meal or snack choice.
///
/// Serialized as `true` / `false` / `null`; `null` defers to the value
/// derived from the segments and then to the child's default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum MealChoice {
    Yes,
    No,
    #[default]
    UseDefault,
}

impl MealChoice {
    pub fn explicit(self) -> Option<bool> {
        self.into()
    }
}

impl From<Option<bool>> for MealChoice {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => MealChoice::Yes,
            Some(false) => MealChoice::No,
            None => MealChoice::UseDefault,
        }
    }
}

impl From<MealChoice> for Option<bool> {
    fn from(choice: MealChoice) -> Self {
        match choice {
            MealChoice::Yes => Some(true),
            MealChoice::No => Some(false),
            MealChoice::UseDefault => None,
        }
    }
}

/// Classification of the free-text absence reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsenceReason {
    Sick,
    Holiday,
    Other(String),
}

impl AbsenceReason {
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim() {
            "" => None,
            "Malade" => Some(AbsenceReason::Sick),
            "Vacances" => Some(AbsenceReason::Holiday),
            "Autre" => Some(AbsenceReason::Other(String::new())),
            other => Some(AbsenceReason::Other(other.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AbsenceReason::Sick => ABSENCE_REASONS[0],
            AbsenceReason::Holiday => ABSENCE_REASONS[1],
            AbsenceReason::Other(text) if text.is_empty() => ABSENCE_REASONS[2],
            AbsenceReason::Other(text) => text,
        }
    }
}

/// Derived surrogate id; `(child_id, date)` is the real key.
pub fn entry_id(child_id: &str, date: NaiveDate) -> String {
    format!("{}-{}", child_id, date.format(DATE_FORMAT))
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Attendance record for one child on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    #[serde(default)]
    pub id: String,
    pub child_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub segments: Vec<TimeSegment>,
    #[serde(default)]
    pub is_absent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absence_reason: Option<String>,
    #[serde(default)]
    pub has_meal: MealChoice,
    #[serde(default)]
    pub has_snack: MealChoice,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// The record a day cell starts from before anything is saved.
    pub fn blank(child_id: &str, date: NaiveDate) -> Self {
        Self {
            id: entry_id(child_id, date),
            child_id: child_id.to_string(),
            date,
            segments: vec![TimeSegment::empty("1")],
            is_absent: false,
            absence_reason: None,
            has_meal: MealChoice::UseDefault,
            has_snack: MealChoice::UseDefault,
            notes: String::new(),
            updated_at: None,
        }
    }

    pub fn key(&self) -> (&str, NaiveDate) {
        (&self.child_id, self.date)
    }

    pub fn matches(&self, child_id: &str, date: NaiveDate) -> bool {
        self.child_id == child_id && self.date == date
    }

    /// Any bound filled in, or marked absent.
    pub fn has_data(&self) -> bool {
        self.is_absent || self.segments.iter().any(TimeSegment::is_recorded)
    }

    /// Segments that count as presence; none while the child is absent.
    pub fn presence_segments(&self) -> &[TimeSegment] {
        if self.is_absent {
            &[]
        } else {
            &self.segments
        }
    }

    pub fn absence(&self) -> Option<AbsenceReason> {
        self.absence_reason.as_deref().and_then(AbsenceReason::from_text)
    }

    /// Recomputes the surrogate id and enforces the absence invariant.
    pub fn normalize(&mut self) {
        self.id = entry_id(&self.child_id, self.date);
        if self.is_absent {
            self.has_meal = MealChoice::UseDefault;
            self.has_snack = MealChoice::UseDefault;
        } else {
            self.absence_reason = None;
        }
    }
}

/// Body of `POST /api/entries`: the full entry to store under its key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntryRequest {
    pub child_id: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub segments: Vec<TimeSegment>,
    #[serde(default)]
    pub is_absent: bool,
    pub absence_reason: Option<String>,
    #[serde(default)]
    pub has_meal: MealChoice,
    #[serde(default)]
    pub has_snack: MealChoice,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SaveEntryRequest {
    pub fn into_entry(self, child_id: String, date: NaiveDate, now: DateTime<Utc>) -> TimeEntry {
        let mut entry = TimeEntry {
            id: String::new(),
            child_id,
            date,
            segments: self.segments,
            is_absent: self.is_absent,
            absence_reason: self.absence_reason.filter(|r| !r.is_empty()),
            has_meal: self.has_meal,
            has_snack: self.has_snack,
            notes: self.notes.unwrap_or_default(),
            updated_at: Some(now),
        };
        entry.normalize();
        entry
    }
}

impl From<&TimeEntry> for SaveEntryRequest {
    fn from(entry: &TimeEntry) -> Self {
        Self {
            child_id: Some(entry.child_id.clone()),
            date: Some(entry.date.format(DATE_FORMAT).to_string()),
            segments: entry.segments.clone(),
            is_absent: entry.is_absent,
            absence_reason: entry.absence_reason.clone(),
            has_meal: entry.has_meal,
            has_snack: entry.has_snack,
            notes: Some(entry.notes.clone()),
        }
    }
}

/// Body of `PUT /api/entries/:childId/:date`; absent fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub segments: Option<Vec<TimeSegment>>,
    pub is_absent: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub absence_reason: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub has_meal: Option<MealChoice>,
    #[serde(default, deserialize_with = "present")]
    pub has_snack: Option<MealChoice>,
    pub notes: Option<String>,
}

impl UpdateEntryRequest {
    pub fn apply_to(self, entry: &mut TimeEntry, now: DateTime<Utc>) {
        if let Some(segments) = self.segments {
            entry.segments = segments;
        }
        if let Some(is_absent) = self.is_absent {
            entry.is_absent = is_absent;
        }
        if let Some(reason) = self.absence_reason {
            entry.absence_reason = reason.filter(|r| !r.is_empty());
        }
        if let Some(has_meal) = self.has_meal {
            entry.has_meal = has_meal;
        }
        if let Some(has_snack) = self.has_snack {
            entry.has_snack = has_snack;
        }
        if let Some(notes) = self.notes {
            entry.notes = notes;
        }
        entry.updated_at = Some(now);
        entry.normalize();
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// Distinguishes a field sent as `null` from a field left out.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
