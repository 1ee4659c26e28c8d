//! Record validation and per-document deduplication.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::rules::{canonical_mobile, clean_name, has_leading_number, normalize_address, normalize_date};
use crate::models::config::ValidationConfig;
use crate::models::record::{CleanRecord, RawRecord};

/// Why a record was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Cleaned first name is empty or a single character.
    InvalidName,
    /// No mobile number.
    MissingMobile,
    /// Mobile is not 10 digits starting with 04.
    InvalidMobile,
    /// No street number near the start of the address.
    InvalidAddress,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::InvalidName => "invalid_name",
            Rejection::MissingMobile => "missing_mobile",
            Rejection::InvalidMobile => "invalid_mobile",
            Rejection::InvalidAddress => "invalid_address",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acceptance counts for one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Records that passed every rule, before deduplication.
    pub accepted: usize,

    /// Rejected records by reason.
    pub rejected: BTreeMap<Rejection, usize>,

    /// Accepted records dropped because an earlier record had the same mobile.
    pub duplicates_dropped: usize,
}

impl ValidationStats {
    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn reject(&mut self, reason: Rejection) {
        *self.rejected.entry(reason).or_default() += 1;
    }

    /// Add another pass's counts to this one.
    pub fn merge(&mut self, other: &ValidationStats) {
        self.accepted += other.accepted;
        self.duplicates_dropped += other.duplicates_dropped;
        for (reason, count) in &other.rejected {
            *self.rejected.entry(*reason).or_default() += count;
        }
    }
}

/// Turns raw records into canonical clean records, or rejects them.
#[derive(Debug, Clone)]
pub struct Validator {
    address_digit_window: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

impl Validator {
    pub fn new(address_digit_window: usize) -> Self {
        Self {
            address_digit_window,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.address_digit_window)
    }

    /// Validate one record. Rules run in order and the first failure wins.
    pub fn validate(&self, raw: &RawRecord) -> Result<CleanRecord, Rejection> {
        let first_name = clean_name(&raw.first_name);
        if first_name.chars().count() <= 1 {
            return Err(Rejection::InvalidName);
        }
        let last_name = clean_name(&raw.last_name);

        let mobile = raw.mobile.as_deref().map(str::trim).unwrap_or_default();
        if mobile.is_empty() {
            return Err(Rejection::MissingMobile);
        }
        let mobile = canonical_mobile(mobile).ok_or(Rejection::InvalidMobile)?;

        let address = normalize_address(raw.address.as_deref().unwrap_or_default());
        if !has_leading_number(&address, self.address_digit_window) {
            return Err(Rejection::InvalidAddress);
        }

        Ok(CleanRecord {
            first_name,
            last_name,
            mobile,
            address,
            email: trimmed(raw.email.as_deref()),
            dateofbirth: normalize_date(raw.dateofbirth.as_deref().unwrap_or_default()),
            landline: trimmed(raw.landline.as_deref()),
            lastseen: normalize_date(raw.lastseen.as_deref().unwrap_or_default()),
        })
    }

    /// Validate every record, then drop later records that repeat a mobile.
    pub fn validate_all(&self, raws: &[RawRecord]) -> (Vec<CleanRecord>, ValidationStats) {
        let mut stats = ValidationStats::default();
        let mut accepted = Vec::with_capacity(raws.len());

        for raw in raws {
            match self.validate(raw) {
                Ok(record) => accepted.push(record),
                Err(reason) => {
                    debug!("Rejected {:?}: {}", raw.full_name(), reason);
                    stats.reject(reason);
                }
            }
        }
        stats.accepted = accepted.len();

        let (records, dropped) = dedupe_by_mobile(accepted);
        stats.duplicates_dropped = dropped;

        info!(
            "Validated {} records: {} accepted, {} rejected, {} duplicates dropped",
            raws.len(),
            stats.accepted,
            stats.total_rejected(),
            stats.duplicates_dropped
        );
        (records, stats)
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Keep the first record for each mobile, preserving order.
///
/// Returns the survivors and how many records were dropped.
pub fn dedupe_by_mobile(records: Vec<CleanRecord>) -> (Vec<CleanRecord>, usize) {
    let before = records.len();
    let mut seen = HashSet::new();
    let kept: Vec<CleanRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.mobile.clone()))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
