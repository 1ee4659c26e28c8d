//! Entity and contact record models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position of an entity on the page, taken from the provider's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Zero-based page index.
    pub page: u32,
    /// Normalized top edge (0.0 = top of page, 1.0 = bottom).
    pub top: f32,
}

/// A single typed value extracted from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Lowercase type tag (e.g. "name", "mobile").
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Trimmed mention text, empty when the provider sent none.
    pub value: String,

    /// Layout anchor, when the provider reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            value: value.into(),
            anchor: None,
        }
    }

    pub fn with_anchor(mut self, page: u32, top: f32) -> Self {
        self.anchor = Some(Anchor { page, top });
        self
    }

    /// The field kind this entity feeds, if it is one the assembler knows.
    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::from_tag(&self.entity_type)
    }
}

/// Entity type tags understood by record assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Name,
    Mobile,
    Address,
    Email,
    DateOfBirth,
    Landline,
    LastSeen,
}

impl EntityKind {
    /// All kinds in assembly order.
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Name,
        EntityKind::Mobile,
        EntityKind::Address,
        EntityKind::Email,
        EntityKind::DateOfBirth,
        EntityKind::Landline,
        EntityKind::LastSeen,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "name" => Some(EntityKind::Name),
            "mobile" => Some(EntityKind::Mobile),
            "address" => Some(EntityKind::Address),
            "email" => Some(EntityKind::Email),
            "dateofbirth" => Some(EntityKind::DateOfBirth),
            "landline" => Some(EntityKind::Landline),
            "lastseen" => Some(EntityKind::LastSeen),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Name => "name",
            EntityKind::Mobile => "mobile",
            EntityKind::Address => "address",
            EntityKind::Email => "email",
            EntityKind::DateOfBirth => "dateofbirth",
            EntityKind::Landline => "landline",
            EntityKind::LastSeen => "lastseen",
        }
    }

    /// The record field this kind fills. Names fill `first_name` and `last_name`.
    pub fn field(&self) -> Field {
        match self {
            EntityKind::Name => Field::FirstName,
            EntityKind::Mobile => Field::Mobile,
            EntityKind::Address => Field::Address,
            EntityKind::Email => Field::Email,
            EntityKind::DateOfBirth => Field::DateOfBirth,
            EntityKind::Landline => Field::Landline,
            EntityKind::LastSeen => Field::LastSeen,
        }
    }
}

/// Columns of a contact record, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "first_name")]
    FirstName,
    #[serde(rename = "last_name")]
    LastName,
    #[serde(rename = "mobile")]
    Mobile,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "dateofbirth")]
    DateOfBirth,
    #[serde(rename = "landline")]
    Landline,
    #[serde(rename = "lastseen")]
    LastSeen,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::FirstName,
        Field::LastName,
        Field::Mobile,
        Field::Address,
        Field::Email,
        Field::DateOfBirth,
        Field::Landline,
        Field::LastSeen,
    ];

    /// Column name used in tabular and structured exports.
    pub fn column(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Mobile => "mobile",
            Field::Address => "address",
            Field::Email => "email",
            Field::DateOfBirth => "dateofbirth",
            Field::Landline => "landline",
            Field::LastSeen => "lastseen",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.column() == column)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_column(&s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown record field: {}", s))
    }
}

/// An unvalidated contact assembled from entity lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub first_name: String,

    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dateofbirth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastseen: Option<String>,
}

impl RawRecord {
    /// Start a record from a full name.
    ///
    /// The first whitespace-separated token becomes `first_name`, the rest
    /// `last_name`. Returns `None` for a blank name.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut parts = name.split_whitespace();
        let first_name = parts.next()?.to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        Some(Self {
            first_name,
            last_name,
            ..Self::default()
        })
    }

    /// Set the field fed by a non-name entity kind.
    pub fn set(&mut self, kind: EntityKind, value: String) {
        let slot = match kind {
            EntityKind::Name => return,
            EntityKind::Mobile => &mut self.mobile,
            EntityKind::Address => &mut self.address,
            EntityKind::Email => &mut self.email,
            EntityKind::DateOfBirth => &mut self.dateofbirth,
            EntityKind::Landline => &mut self.landline,
            EntityKind::LastSeen => &mut self.lastseen,
        };
        *slot = Some(value);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => Some(self.first_name.as_str()),
            Field::LastName => Some(self.last_name.as_str()),
            Field::Mobile => self.mobile.as_deref(),
            Field::Address => self.address.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::DateOfBirth => self.dateofbirth.as_deref(),
            Field::Landline => self.landline.as_deref(),
            Field::LastSeen => self.lastseen.as_deref(),
        }
    }

    /// Whether the field holds a non-blank value.
    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A validated, canonical contact record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanRecord {
    pub first_name: String,
    pub last_name: String,
    /// Digits only; the deduplication key.
    pub mobile: String,
    pub address: String,
    pub email: String,
    /// `YYYY-MM-DD` or empty.
    pub dateofbirth: String,
    pub landline: String,
    /// `YYYY-MM-DD` or empty.
    pub lastseen: String,
}

impl CleanRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Mobile => &self.mobile,
            Field::Address => &self.address,
            Field::Email => &self.email,
            Field::DateOfBirth => &self.dateofbirth,
            Field::Landline => &self.landline,
            Field::LastSeen => &self.lastseen,
        }
    }
}

/// A clean record flagged as sharing its key with other records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    #[serde(flatten)]
    pub record: CleanRecord,

    /// The shared key value.
    pub duplicate_key: String,

    /// Number of records sharing the key.
    pub duplicate_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_splits_first_token() {
        let record = RawRecord::from_name("  Mary  Anne   Smith ").unwrap();
        assert_eq!(record.first_name, "Mary");
        assert_eq!(record.last_name, "Anne Smith");
        assert_eq!(record.full_name(), "Mary Anne Smith");
    }

    #[test]
    fn test_from_name_single_token_and_blank() {
        let record = RawRecord::from_name("Cher").unwrap();
        assert_eq!(record.first_name, "Cher");
        assert_eq!(record.last_name, "");

        assert!(RawRecord::from_name("   ").is_none());
    }

    #[test]
    fn test_raw_record_omits_absent_fields() {
        let mut record = RawRecord::from_name("Jane Smith").unwrap();
        record.set(EntityKind::Mobile, "0412 345 678".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mobile"], "0412 345 678");
        assert!(json.get("address").is_none());
        assert!(record.has(Field::Mobile));
        assert!(!record.has(Field::Email));
    }

    #[test]
    fn test_duplicate_record_flattens() {
        let duplicate = DuplicateRecord {
            record: CleanRecord {
                first_name: "Jane".into(),
                mobile: "0412345678".into(),
                ..CleanRecord::default()
            },
            duplicate_key: "0412345678".into(),
            duplicate_count: 2,
        };

        let json = serde_json::to_value(&duplicate).unwrap();
        assert_eq!(json["first_name"], "Jane");
        assert_eq!(json["duplicate_count"], 2);
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("mobile".parse::<Field>().unwrap(), Field::Mobile);
        assert_eq!(" DateOfBirth ".parse::<Field>().unwrap(), Field::DateOfBirth);
        assert!("phone".parse::<Field>().is_err());
        assert_eq!(EntityKind::from_tag("lastseen"), Some(EntityKind::LastSeen));
        assert_eq!(EntityKind::from_tag("fax"), None);
    }
}
