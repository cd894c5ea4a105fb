use std::convert::TryFrom;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::domain::errors::TimelineError;
use crate::domain::logging::LogComponent;
use crate::log_warn;
use crate::time_utils::parse_claim_date;

/// Claim category; unknown tags from the content store are kept verbatim.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString, AsRefStr,
)]
pub enum Category {
    #[display(fmt = "Reasoning")]
    #[strum(serialize = "reasoning")]
    Reasoning,
    #[display(fmt = "Creativity")]
    #[strum(serialize = "creativity")]
    Creativity,
    #[display(fmt = "Coding")]
    #[strum(serialize = "coding")]
    Coding,
    #[display(fmt = "Mathematics")]
    #[strum(serialize = "math")]
    Math,
    #[display(fmt = "Language")]
    #[strum(serialize = "language")]
    Language,
    #[display(fmt = "Vision")]
    #[strum(serialize = "vision")]
    Vision,
    #[display(fmt = "Agents")]
    #[strum(serialize = "agents")]
    Agents,
    #[display(fmt = "Compute")]
    #[strum(serialize = "compute")]
    Compute,
    #[display(fmt = "{}", _0)]
    #[strum(default)]
    Other(String),
}

impl Category {
    /// Stable key the stylesheet maps to a color.
    pub fn color_key(&self) -> &str {
        match self {
            Category::Other(_) => "other",
            known => known.as_ref(),
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().parse::<Category>() {
            Ok(Category::Other(_)) | Err(_) => Category::Other(tag.trim().to_string()),
            Ok(known) => known,
        }
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.color_key())
    }
}

/// Claim record as delivered by the content store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaimRecord {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub claim: String,
    pub category: String,
    pub source: String,
    pub value: f64,
}

/// A dated, plotted claim. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub id: String,
    /// Milliseconds since the Unix epoch (UTC midnight of the claim date).
    pub timestamp: f64,
    pub value: f64,
    pub category: Category,
    pub source_label: String,
    pub claim: String,
}

impl TryFrom<ClaimRecord> for DataPoint {
    type Error = TimelineError;

    fn try_from(record: ClaimRecord) -> Result<Self, Self::Error> {
        let timestamp = parse_claim_date(&record.date).ok_or_else(|| TimelineError::InvalidRecord {
            id: record.id.clone(),
            reason: format!("date '{}' is not YYYY-MM-DD", record.date),
        })?;
        if !record.value.is_finite() {
            return Err(TimelineError::InvalidRecord {
                id: record.id,
                reason: "value is not a finite number".to_string(),
            });
        }
        Ok(DataPoint {
            timestamp,
            value: record.value,
            category: Category::parse(&record.category),
            source_label: record.source,
            claim: record.claim,
            id: record.id,
        })
    }
}

/// Converts records, skipping (and logging) the ones that fail validation.
/// The result is sorted by timestamp, ties broken by id.
pub fn points_from_records(records: impl IntoIterator<Item = ClaimRecord>) -> Vec<DataPoint> {
    let mut points: Vec<DataPoint> = records
        .into_iter()
        .filter_map(|record| match DataPoint::try_from(record) {
            Ok(point) => Some(point),
            Err(err) => {
                log_warn!(LogComponent::Domain("Records"), "Skipping claim: {}", err);
                None
            }
        })
        .collect();
    points.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
    points
}

/// Group of nearby points rendered as one badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub member_ids: Vec<String>,
    pub primary_category: Category,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.member_ids.len()
    }

    /// Singletons render as ordinary points.
    pub fn is_badge(&self) -> bool {
        self.member_ids.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, value: f64) -> ClaimRecord {
        ClaimRecord {
            id: "c1".into(),
            date: date.into(),
            claim: "Machines will never write poetry".into(),
            category: "Creativity".into(),
            source: "Op-ed".into(),
            value,
        }
    }

    #[test]
    fn record_converts_to_point() {
        let point = DataPoint::try_from(record("2016-03-15", 0.4)).unwrap();
        assert_eq!(point.category, Category::Creativity);
        assert_eq!(point.timestamp, 1_458_000_000_000.0);
    }

    #[test]
    fn bad_dates_and_values_are_rejected() {
        assert!(DataPoint::try_from(record("15/03/2016", 0.4)).is_err());
        assert!(DataPoint::try_from(record("2016-03-15", f64::NAN)).is_err());
        assert_eq!(points_from_records(vec![record("soon", 1.0)]).len(), 0);
    }

    #[test]
    fn unknown_category_is_preserved() {
        let category = Category::parse(" Robotics ");
        assert_eq!(category, Category::Other("Robotics".into()));
        assert_eq!(category.color_key(), "other");
        assert_eq!(category.to_string(), "Robotics");
        assert_eq!(Category::parse("MATH").to_string(), "Mathematics");
    }
}
