//! Card types: Card, Owner, Priority, CardPatch

use super::ids::CardId;
use crate::error::{LeadsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lead priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Person responsible for a lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    /// Avatar locator (URL or asset path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Owner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// A lead card on the pipeline board.
///
/// The engine never edits a card's content on its own; only `updated_at` is
/// refreshed when an update is merged in. Position lives in the columns, not
/// on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    /// Company or context the lead belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Monetary value (chit value in rupees), non-negative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Free-form tags; order is kept and duplicates are allowed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Create a card with the given id and title, stamped now
    pub fn new(id: impl Into<CardId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: None,
            value: None,
            owner: None,
            priority: None,
            tags: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Value used by aggregates; a missing value counts as zero
    pub fn value_or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    /// Check the card's own fields
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(LeadsError::invalid_value("id", "card id must not be empty"));
        }
        if let Some(value) = self.value {
            check_value(value)?;
        }
        Ok(())
    }

    /// Merge a patch into this card and refresh `updated_at`
    pub fn apply_patch(&mut self, patch: &CardPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(company) = &patch.company {
            self.company = company.clone();
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(owner) = &patch.owner {
            self.owner = owner.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        self.updated_at = now;
    }
}

fn check_value(value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(LeadsError::invalid_value("value", "must be a finite number"));
    }
    if value < 0.0 {
        return Err(LeadsError::invalid_value("value", "must be non-negative"));
    }
    Ok(())
}

/// Partial card update.
///
/// `None` leaves a field alone. For optional card fields `Some(None)` clears
/// the field and `Some(Some(x))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    pub title: Option<String>,
    pub company: Option<Option<String>>,
    pub value: Option<Option<f64>>,
    pub owner: Option<Option<Owner>>,
    pub priority: Option<Option<Priority>>,
    pub tags: Option<Vec<String>>,
}

impl CardPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = Some(company);
        self
    }

    pub fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_owner(mut self, owner: Option<Owner>) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replace all tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Check that the patch would leave a card valid
    pub fn validate(&self) -> Result<()> {
        if let Some(Some(value)) = self.value {
            check_value(value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_card_serializes_camel_case() {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let card = Card::new("1", "Ramesh Kumar")
            .with_value(500_000.0)
            .with_priority(Priority::High)
            .with_updated_at(stamp);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["updatedAt"], "2024-03-01T10:00:00Z");
        assert!(json.get("company").is_none());
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn test_card_tags_keep_duplicates() {
        let json = r#"{"id":"x","title":"T","tags":["vip","vip","referral"],"updatedAt":"2024-01-01T00:00:00Z"}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.tags, vec!["vip", "vip", "referral"]);
    }

    #[test]
    fn test_validate_rejects_negative_value() {
        let card = Card::new("1", "T").with_value(-1.0);
        assert!(matches!(
            card.validate(),
            Err(LeadsError::InvalidValue { .. })
        ));
        assert!(Card::new("1", "T").with_value(f64::NAN).validate().is_err());
        assert!(Card::new("", "T").validate().is_err());
    }

    #[test]
    fn test_apply_patch_merges_and_stamps() {
        let old = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut card = Card::new("1", "Old")
            .with_company("Sri Lakshmi Traders")
            .with_value(100.0)
            .with_updated_at(old);

        let patch = CardPatch::new()
            .with_title("New")
            .with_company(None)
            .with_owner(Some(Owner::new("Priya")));
        card.apply_patch(&patch, now);

        assert_eq!(card.title, "New");
        assert_eq!(card.company, None);
        assert_eq!(card.value, Some(100.0));
        assert_eq!(card.owner.as_ref().map(|o| o.name.as_str()), Some("Priya"));
        assert_eq!(card.updated_at, now);
    }

    #[test]
    fn test_patch_validate() {
        assert!(CardPatch::new().with_value(Some(-5.0)).validate().is_err());
        assert!(CardPatch::new().with_value(None).validate().is_ok());
    }
}
