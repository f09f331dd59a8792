use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Weekdays a new child is expected on when nothing else is said (Mon-Fri).
pub const DEFAULT_EXPECTED_DAYS: [u8; 5] = [1, 2, 3, 4, 5];

pub const DEFAULT_ARRIVAL_TIME: &str = "08:00";
pub const DEFAULT_LEAVING_TIME: &str = "17:00";

/// Weekday index with Sunday = 0, the convention used by `expectedDays`.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// A recurring time block from a child's usual schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultSegment {
    pub id: String,
    pub arrival_time: String,
    pub leaving_time: String,
    /// Weekday indices (Sunday = 0) this block applies to.
    #[serde(default)]
    pub days: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    pub default_arrival_time: String,
    pub default_leaving_time: String,
    pub has_meal: bool,
    pub has_snack: bool,
    pub expected_days: Vec<u8>,
    #[serde(default)]
    pub default_segments: Vec<DefaultSegment>,
    #[serde(default)]
    pub absent_days: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Child {
    pub fn is_expected_on(&self, date: NaiveDate) -> bool {
        self.expected_days.contains(&weekday_index(date))
    }

    /// Schedule blocks that apply on the weekday of `date`.
    ///
    /// Children stored before day-scoped blocks existed only carry the
    /// single default pair; it is treated as one block over `expected_days`.
    pub fn default_segments_for(&self, date: NaiveDate) -> Vec<DefaultSegment> {
        let day = weekday_index(date);
        self.schedule()
            .into_iter()
            .filter(|segment| segment.days.contains(&day))
            .collect()
    }

    pub fn schedule(&self) -> Vec<DefaultSegment> {
        if !self.default_segments.is_empty() {
            return self.default_segments.clone();
        }
        vec![DefaultSegment {
            id: "1".to_string(),
            arrival_time: self.default_arrival_time.clone(),
            leaving_time: self.default_leaving_time.clone(),
            days: self.expected_days.clone(),
        }]
    }

    /// Keeps the legacy default pair in step with the first schedule block.
    pub fn sync_default_times(&mut self) {
        if let Some(first) = self.default_segments.first() {
            self.default_arrival_time = first.arrival_time.clone();
            self.default_leaving_time = first.leaving_time.clone();
        }
    }

    /// Applies the fields present in `update`, leaving the others untouched.
    pub fn apply(&mut self, update: UpdateChildRequest) {
        if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
            self.name = name;
        }
        if let Some(arrival) = update.default_arrival_time.filter(|t| !t.is_empty()) {
            self.default_arrival_time = arrival;
        }
        if let Some(leaving) = update.default_leaving_time.filter(|t| !t.is_empty()) {
            self.default_leaving_time = leaving;
        }
        if let Some(has_meal) = update.has_meal {
            self.has_meal = has_meal;
        }
        if let Some(has_snack) = update.has_snack {
            self.has_snack = has_snack;
        }
        if let Some(mut days) = update.expected_days {
            days.sort_unstable();
            days.dedup();
            self.expected_days = days;
        }
        if let Some(segments) = update.default_segments {
            self.default_segments = segments;
            self.sync_default_times();
        }
        if let Some(absent_days) = update.absent_days {
            self.absent_days = absent_days;
        }
        if let Some(photo_url) = update.photo_url {
            self.photo_url = Some(photo_url).filter(|url| !url.is_empty());
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildRequest {
    /// Accepted so the UI can pick its own identifier; generated otherwise.
    pub id: Option<String>,
    pub name: Option<String>,
    pub default_arrival_time: Option<String>,
    pub default_leaving_time: Option<String>,
    pub has_meal: Option<bool>,
    pub has_snack: Option<bool>,
    pub expected_days: Option<Vec<u8>>,
    pub default_segments: Option<Vec<DefaultSegment>>,
    pub absent_days: Option<Vec<String>>,
    pub photo_url: Option<String>,
}

impl CreateChildRequest {
    /// Builds the stored child, or names the first missing required field.
    pub fn into_child(self, id: String, now: DateTime<Utc>) -> Result<Child, &'static str> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or("name")?;
        let default_arrival_time = self
            .default_arrival_time
            .filter(|t| !t.is_empty())
            .ok_or("defaultArrivalTime")?;
        let default_leaving_time = self
            .default_leaving_time
            .filter(|t| !t.is_empty())
            .ok_or("defaultLeavingTime")?;
        let expected_days = self
            .expected_days
            .unwrap_or_else(|| DEFAULT_EXPECTED_DAYS.to_vec());

        let mut child = Child {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or(id),
            name,
            default_arrival_time,
            default_leaving_time,
            has_meal: self.has_meal.unwrap_or(true),
            has_snack: self.has_snack.unwrap_or(true),
            expected_days,
            default_segments: self.default_segments.unwrap_or_default(),
            absent_days: self.absent_days.unwrap_or_default(),
            photo_url: self.photo_url.filter(|url| !url.is_empty()),
            created_at: Some(now),
            updated_at: None,
        };
        if child.default_segments.is_empty() {
            child.default_segments = child.schedule();
        }
        child.sync_default_times();
        Ok(child)
    }
}

impl From<&Child> for CreateChildRequest {
    fn from(child: &Child) -> Self {
        Self {
            id: Some(child.id.clone()),
            name: Some(child.name.clone()),
            default_arrival_time: Some(child.default_arrival_time.clone()),
            default_leaving_time: Some(child.default_leaving_time.clone()),
            has_meal: Some(child.has_meal),
            has_snack: Some(child.has_snack),
            expected_days: Some(child.expected_days.clone()),
            default_segments: Some(child.default_segments.clone()),
            absent_days: Some(child.absent_days.clone()),
            photo_url: child.photo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub default_arrival_time: Option<String>,
    pub default_leaving_time: Option<String>,
    pub has_meal: Option<bool>,
    pub has_snack: Option<bool>,
    pub expected_days: Option<Vec<u8>>,
    pub default_segments: Option<Vec<DefaultSegment>>,
    pub absent_days: Option<Vec<String>>,
    pub photo_url: Option<String>,
}

/// Full replacement of every editable field, as the edit form sends it.
impl From<&Child> for UpdateChildRequest {
    fn from(child: &Child) -> Self {
        Self {
            name: Some(child.name.clone()),
            default_arrival_time: Some(child.default_arrival_time.clone()),
            default_leaving_time: Some(child.default_leaving_time.clone()),
            has_meal: Some(child.has_meal),
            has_snack: Some(child.has_snack),
            expected_days: Some(child.expected_days.clone()),
            default_segments: Some(child.default_segments.clone()),
            absent_days: Some(child.absent_days.clone()),
            photo_url: Some(child.photo_url.clone().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn child() -> Child {
        Child {
            id: "c1".to_string(),
            name: "Emma".to_string(),
            default_arrival_time: "08:00".to_string(),
            default_leaving_time: "17:00".to_string(),
            has_meal: true,
            has_snack: true,
            expected_days: vec![1, 2, 4],
            default_segments: Vec::new(),
            absent_days: Vec::new(),
            photo_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn weekday_index_starts_on_sunday() {
        assert_eq!(weekday_index(date("2024-01-07")), 0);
        assert_eq!(weekday_index(date("2024-01-01")), 1);
        assert_eq!(weekday_index(date("2024-01-06")), 6);
    }

    #[test]
    fn legacy_pair_acts_as_single_block() {
        let c = child();
        let monday = c.default_segments_for(date("2024-01-01"));
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].arrival_time, "08:00");
        assert!(c.default_segments_for(date("2024-01-03")).is_empty());
    }

    #[test]
    fn day_scoped_blocks_filter_by_weekday() {
        let mut c = child();
        c.default_segments = vec![
            DefaultSegment {
                id: "1".into(),
                arrival_time: "08:00".into(),
                leaving_time: "12:00".into(),
                days: vec![1, 2],
            },
            DefaultSegment {
                id: "2".into(),
                arrival_time: "13:30".into(),
                leaving_time: "17:00".into(),
                days: vec![2],
            },
        ];
        assert_eq!(c.default_segments_for(date("2024-01-01")).len(), 1);
        assert_eq!(c.default_segments_for(date("2024-01-02")).len(), 2);
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut c = child();
        c.apply(UpdateChildRequest {
            name: Some("Emma B".into()),
            expected_days: Some(vec![5, 1, 1]),
            default_segments: Some(vec![DefaultSegment {
                id: "1".into(),
                arrival_time: "09:00".into(),
                leaving_time: "16:00".into(),
                days: vec![1, 5],
            }]),
            ..Default::default()
        });
        assert_eq!(c.name, "Emma B");
        assert_eq!(c.expected_days, vec![1, 5]);
        assert_eq!(c.default_arrival_time, "09:00");
        assert_eq!(c.default_leaving_time, "16:00");
        assert!(c.has_meal);
    }

    #[test]
    fn create_request_requires_name_and_times() {
        let now = Utc::now();
        let missing = CreateChildRequest {
            name: Some("Lucas".into()),
            default_arrival_time: Some("08:30".into()),
            ..Default::default()
        };
        assert_eq!(
            missing.into_child("id".into(), now).unwrap_err(),
            "defaultLeavingTime"
        );

        let complete = CreateChildRequest {
            name: Some("Lucas".into()),
            default_arrival_time: Some("08:30".into()),
            default_leaving_time: Some("16:30".into()),
            ..Default::default()
        };
        let created = complete.into_child("generated".into(), now).unwrap();
        assert_eq!(created.id, "generated");
        assert_eq!(created.expected_days, DEFAULT_EXPECTED_DAYS.to_vec());
        assert_eq!(created.default_segments.len(), 1);
        assert_eq!(created.default_segments[0].days, DEFAULT_EXPECTED_DAYS.to_vec());
    }
}
