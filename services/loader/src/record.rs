//! Record types shared across the load pipeline.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One of the three regional data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Cv,
    Cat,
    Gal,
}

impl Region {
    /// Parses a caller-supplied source code. Unrecognized codes return None
    /// and are treated as a per-source failure by the orchestrator.
    pub fn parse(code: &str) -> Option<Region> {
        match code.trim().to_uppercase().as_str() {
            "CV" => Some(Region::Cv),
            "CAT" => Some(Region::Cat),
            "GAL" => Some(Region::Gal),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Region::Cv => "CV",
            Region::Cat => "CAT",
            Region::Gal => "GAL",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Station classification after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StationKind {
    Fixed,
    Mobile,
    Other,
}

impl StationKind {
    pub fn parse(raw: &str) -> Option<StationKind> {
        match raw.trim().to_lowercase().as_str() {
            "fixed" => Some(StationKind::Fixed),
            "mobile" => Some(StationKind::Mobile),
            "other" => Some(StationKind::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StationKind::Fixed => "FIXED",
            StationKind::Mobile => "MOBILE",
            StationKind::Other => "OTHER",
        }
    }
}

/// An untyped scalar value in a raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Null,
}

/// Common field names produced by every format adapter.
pub mod fields {
    pub const NAME: &str = "name";
    pub const KIND: &str = "kind";
    pub const ADDRESS: &str = "address";
    pub const POSTAL_CODE: &str = "postal_code";
    pub const LOCALITY: &str = "locality";
    pub const PROVINCE: &str = "province";
    pub const DESCRIPTION: &str = "description";
    pub const SCHEDULE: &str = "schedule";
    pub const CONTACT: &str = "contact";
    pub const URL: &str = "url";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
}

/// Semi-structured record produced by a format adapter: a mapping of common
/// field names to untyped scalars, one per prospective station. Transient;
/// consumed by the sanitizer and validator, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, Scalar>,
}

impl RawRecord {
    pub fn new() -> RawRecord {
        RawRecord::default()
    }

    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), Scalar::Text(value.into()));
    }

    pub fn set_number(&mut self, field: &str, value: f64) {
        self.fields.insert(field.to_string(), Scalar::Number(value));
    }

    pub fn set_null(&mut self, field: &str) {
        self.fields.insert(field.to_string(), Scalar::Null);
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields.get(field)
    }

    /// Non-empty trimmed text, or None for missing, null or blank fields.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Scalar::Text(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field) {
            Some(Scalar::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// True when the field carries a value. Missing fields, explicit nulls
    /// and blank text all count as absent.
    pub fn has_value(&self, field: &str) -> bool {
        match self.fields.get(field) {
            Some(Scalar::Text(s)) => !s.trim().is_empty(),
            Some(Scalar::Number(_)) => true,
            _ => false,
        }
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&String, &mut Scalar)> {
        self.fields.iter_mut()
    }
}

/// Validated, cleaned projection of a raw record, ready for upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalStation {
    pub name: String,
    pub kind: StationKind,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub contact: Option<String>,
    pub url: Option<String>,
    pub locality: Option<String>,
    pub province: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairNote {
    pub source: String,
    pub station: String,
    pub locality: String,
    pub reason: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionNote {
    pub source: String,
    pub station: String,
    pub locality: String,
    pub reason: String,
}

/// A source whose fetch/adapt/pipeline step failed as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Aggregate report of a load run. Accumulates per-record classifications
/// within one region and merges across regions; note lists preserve source
/// record order within a region and region processing order across regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunOutcome {
    pub inserted: u32,
    pub repaired: u32,
    pub rejected: u32,
    pub repairs: Vec<RepairNote>,
    pub rejections: Vec<RejectionNote>,
    pub failures: Vec<SourceFailure>,
}

impl RunOutcome {
    pub fn record_inserted(&mut self) {
        self.inserted += 1;
    }

    pub fn record_repaired(&mut self, note: RepairNote) {
        self.repaired += 1;
        self.repairs.push(note);
    }

    pub fn record_rejected(&mut self, note: RejectionNote) {
        self.rejected += 1;
        self.rejections.push(note);
    }

    pub fn record_failure(&mut self, source: &str, error: String) {
        self.failures.push(SourceFailure {
            source: source.to_string(),
            error,
        });
    }

    /// Sums counts and concatenates note lists, preserving order.
    pub fn merge(&mut self, other: RunOutcome) {
        self.inserted += other.inserted;
        self.repaired += other.repaired;
        self.rejected += other.rejected;
        self.repairs.extend(other.repairs);
        self.rejections.extend(other.rejections);
        self.failures.extend(other.failures);
    }

    /// Total records classified; equals the batch size for a region run.
    pub fn processed(&self) -> u32 {
        self.inserted + self.repaired + self.rejected
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parse() {
        assert_eq!(Region::parse("CV"), Some(Region::Cv));
        assert_eq!(Region::parse(" gal "), Some(Region::Gal));
        assert_eq!(Region::parse("cat"), Some(Region::Cat));
        assert_eq!(Region::parse("XXX"), None);
        assert_eq!(Region::parse(""), None);
    }

    #[test]
    fn test_station_kind_parse() {
        assert_eq!(StationKind::parse("fixed"), Some(StationKind::Fixed));
        assert_eq!(StationKind::parse("MOBILE"), Some(StationKind::Mobile));
        assert_eq!(StationKind::parse("Other"), Some(StationKind::Other));
        assert_eq!(StationKind::parse("agricultural"), None);
        assert_eq!(StationKind::parse(""), None);
    }

    #[test]
    fn test_raw_record_text_blank_is_absent() {
        let mut rec = RawRecord::new();
        rec.set_text(fields::NAME, "  ");
        rec.set_null(fields::ADDRESS);
        assert_eq!(rec.text(fields::NAME), None);
        assert_eq!(rec.text(fields::ADDRESS), None);
        assert_eq!(rec.text(fields::LOCALITY), None);
        assert!(!rec.has_value(fields::NAME));
        assert!(!rec.has_value(fields::ADDRESS));
    }

    #[test]
    fn test_raw_record_text_is_trimmed() {
        let mut rec = RawRecord::new();
        rec.set_text(fields::NAME, "  Estación ITV de Xirivella  ");
        assert_eq!(rec.text(fields::NAME), Some("Estación ITV de Xirivella"));
        assert!(rec.has_value(fields::NAME));
    }

    #[test]
    fn test_raw_record_number() {
        let mut rec = RawRecord::new();
        rec.set_number(fields::LATITUDE, 39.47);
        rec.set_text(fields::LONGITUDE, "not a number");
        assert_eq!(rec.number(fields::LATITUDE), Some(39.47));
        assert_eq!(rec.number(fields::LONGITUDE), None);
        assert!(rec.has_value(fields::LATITUDE));
    }

    #[test]
    fn test_outcome_counts_and_merge() {
        let mut a = RunOutcome::default();
        a.record_inserted();
        a.record_inserted();
        a.record_rejected(RejectionNote {
            source: "CV".into(),
            station: "A".into(),
            locality: "X".into(),
            reason: "invalid postal code".into(),
        });

        let mut b = RunOutcome::default();
        b.record_repaired(RepairNote {
            source: "GAL".into(),
            station: "B".into(),
            locality: "Y".into(),
            reason: "duplicate record".into(),
            action: "ignored".into(),
        });
        b.record_failure("XXX", "unknown source code: XXX".into());

        a.merge(b);
        assert_eq!(a.inserted, 2);
        assert_eq!(a.repaired, 1);
        assert_eq!(a.rejected, 1);
        assert_eq!(a.processed(), 4);
        assert_eq!(a.rejections[0].source, "CV");
        assert_eq!(a.repairs[0].source, "GAL");
        assert_eq!(a.failures[0].source, "XXX");
    }

    #[test]
    fn test_merge_preserves_note_order() {
        let mut merged = RunOutcome::default();
        for source in ["CV", "CAT", "GAL"] {
            let mut part = RunOutcome::default();
            part.record_rejected(RejectionNote {
                source: source.into(),
                station: "S".into(),
                locality: "L".into(),
                reason: "unknown or null type".into(),
            });
            merged.merge(part);
        }
        let order: Vec<&str> = merged.rejections.iter().map(|n| n.source.as_str()).collect();
        assert_eq!(order, vec!["CV", "CAT", "GAL"]);
    }
}
