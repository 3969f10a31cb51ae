//! Region validation policies.
//!
//! One `RegionPolicy` value per source drives both the sanitizer (character
//! whitelist, coordinate plausibility box) and the validator. The three
//! regions share a single validation routine parameterized by the policy
//! data, so the pipeline wiring is identical for every source.

use crate::record::{fields, CanonicalStation, RawRecord, Region, StationKind};

/// Approximate geographic bounds of a region. Coordinates outside the box
/// are obviously wrong geocoding results, not borderline stations.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn contains_lat(&self, v: f64) -> bool {
        v >= self.lat_min && v <= self.lat_max
    }

    pub fn contains_lon(&self, v: f64) -> bool {
        v >= self.lon_min && v <= self.lon_max
    }
}

/// Per-region cleaning and validation rules.
pub struct RegionPolicy {
    pub region: Region,
    /// Characters kept by the sanitizer in addition to
    /// letters/digits/whitespace/`.,-`.
    pub extra_chars: &'static str,
    pub bbox: BoundingBox,
    /// Two-digit postal prefixes belonging to the region, each with the
    /// province it encodes (empty when the region does not map prefixes to
    /// province names).
    pub province_codes: &'static [(&'static str, &'static str)],
    /// Check the prefix's mapped province name against the declared one.
    pub enforce_province_match: bool,
    /// Whether the region distinguishes mobile/other stations with their own
    /// rule set. Regions without the concept validate every record under the
    /// fixed-station rules.
    pub mobile_concept: bool,
    /// Whether contact values must contain `@`.
    pub require_email: bool,
    /// Accumulate every failing reason into one note, or stop at the first.
    pub accumulate_reasons: bool,
}

pub const CV: RegionPolicy = RegionPolicy {
    region: Region::Cv,
    extra_chars: "@",
    bbox: BoundingBox {
        lat_min: 38.0,
        lat_max: 42.0,
        lon_min: -1.0,
        lon_max: 1.0,
    },
    province_codes: &[("03", ""), ("12", ""), ("46", "")],
    enforce_province_match: false,
    mobile_concept: true,
    require_email: true,
    accumulate_reasons: true,
};

pub const CAT: RegionPolicy = RegionPolicy {
    region: Region::Cat,
    extra_chars: "@",
    bbox: BoundingBox {
        lat_min: 40.0,
        lat_max: 43.0,
        lon_min: 0.0,
        lon_max: 4.0,
    },
    province_codes: &[
        ("08", "Barcelona"),
        ("17", "Girona"),
        ("25", "Lleida"),
        ("43", "Tarragona"),
    ],
    enforce_province_match: true,
    mobile_concept: false,
    require_email: false,
    accumulate_reasons: false,
};

pub const GAL: RegionPolicy = RegionPolicy {
    region: Region::Gal,
    extra_chars: "",
    bbox: BoundingBox {
        lat_min: 39.0,
        lat_max: 46.0,
        lon_min: -9.0,
        lon_max: -4.0,
    },
    province_codes: &[
        ("15", "A Coruña"),
        ("27", "Lugo"),
        ("32", "Ourense"),
        ("36", "Pontevedra"),
    ],
    enforce_province_match: true,
    mobile_concept: false,
    require_email: false,
    accumulate_reasons: false,
};

pub fn policy_for(region: Region) -> &'static RegionPolicy {
    match region {
        Region::Cv => &CV,
        Region::Cat => &CAT,
        Region::Gal => &GAL,
    }
}

const FIXED_MANDATORY: &[&str] = &[
    fields::NAME,
    fields::ADDRESS,
    fields::POSTAL_CODE,
    fields::LOCALITY,
    fields::PROVINCE,
    fields::CONTACT,
];

/// Fields a mobile/other station must not carry.
const LOCATION_BOUND: &[&str] = &[
    fields::POSTAL_CODE,
    fields::LOCALITY,
    fields::LATITUDE,
    fields::LONGITUDE,
];

impl RegionPolicy {
    /// Validates a sanitized record. Returns the canonical projection, or the
    /// rejection reason. Rules run in a fixed order (type, mandatory fields,
    /// postal shape, postal/province consistency, coordinate sanity); regions
    /// that do not accumulate keep only the first failing rule's message.
    pub fn validate(&self, record: &RawRecord) -> Result<CanonicalStation, String> {
        let kind = match record.text(fields::KIND).and_then(StationKind::parse) {
            Some(kind) => kind,
            None => return Err("unknown or null type".to_string()),
        };

        let mut reasons: Vec<String> = Vec::new();
        if !self.mobile_concept || kind == StationKind::Fixed {
            self.check_fixed(record, &mut reasons);
        } else {
            self.check_unfixed(record, &mut reasons);
        }

        if reasons.is_empty() {
            Ok(self.project(record, kind))
        } else {
            if !self.accumulate_reasons {
                reasons.truncate(1);
            }
            Err(reasons.join("; "))
        }
    }

    fn check_fixed(&self, record: &RawRecord, reasons: &mut Vec<String>) {
        let missing: Vec<&str> = FIXED_MANDATORY
            .iter()
            .copied()
            .filter(|f| record.text(f).is_none())
            .collect();
        if !missing.is_empty() {
            reasons.push(format!("missing mandatory fields: {}", missing.join(", ")));
        }

        if self.require_email {
            if let Some(contact) = record.text(fields::CONTACT) {
                if !contact.contains('@') {
                    reasons.push("invalid contact".to_string());
                }
            }
        }

        if let Some(cp) = record.text(fields::POSTAL_CODE) {
            if cp.len() != 5 || !cp.bytes().all(|b| b.is_ascii_digit()) {
                reasons.push("invalid postal code".to_string());
            } else {
                let prefix = &cp[..2];
                match self.province_codes.iter().find(|(p, _)| *p == prefix) {
                    None => {
                        reasons.push("postal code does not belong to the region".to_string());
                    }
                    Some((_, mapped)) if self.enforce_province_match && !mapped.is_empty() => {
                        if let Some(declared) = record.text(fields::PROVINCE) {
                            if !mapped.eq_ignore_ascii_case(declared) {
                                reasons.push(
                                    "postal code does not match declared province".to_string(),
                                );
                            }
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        if record.number(fields::LATITUDE).is_none() || record.number(fields::LONGITUDE).is_none()
        {
            reasons.push("coordinates missing or out of range".to_string());
        }
    }

    fn check_unfixed(&self, record: &RawRecord, reasons: &mut Vec<String>) {
        if record.text(fields::NAME).is_none() {
            reasons.push("missing mandatory fields: name".to_string());
        }
        if LOCATION_BOUND.iter().any(|f| record.has_value(f)) {
            reasons.push("mobile station with fixed location data".to_string());
        }
        match record.text(fields::CONTACT) {
            Some(contact) if contact.contains('@') => {}
            _ => reasons.push("invalid contact".to_string()),
        }
    }

    fn project(&self, record: &RawRecord, kind: StationKind) -> CanonicalStation {
        let owned = |field: &str| record.text(field).map(str::to_string);
        CanonicalStation {
            name: record.text(fields::NAME).unwrap_or_default().to_string(),
            kind,
            address: owned(fields::ADDRESS),
            postal_code: owned(fields::POSTAL_CODE),
            longitude: record.number(fields::LONGITUDE),
            latitude: record.number(fields::LATITUDE),
            description: owned(fields::DESCRIPTION),
            schedule: owned(fields::SCHEDULE),
            contact: owned(fields::CONTACT),
            url: owned(fields::URL),
            locality: owned(fields::LOCALITY),
            province: owned(fields::PROVINCE),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
