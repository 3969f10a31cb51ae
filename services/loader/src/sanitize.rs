//! Record sanitizer.
//!
//! Runs before validation: cleans every text field down to the region's
//! character whitelist, degrades explicit null markers to real nulls, and
//! drops coordinates that fall outside the region's plausibility box. The
//! sanitizer never rejects; it only normalizes what the validator then
//! judges.

use crate::record::{fields, RawRecord, Scalar};
use crate::policy::RegionPolicy;

/// Markers some sources use to spell "no value". Compared case-insensitively
/// after cleaning.
const NULL_MARKERS: &[&str] = &["", "null", "n/a", "-"];

/// Sanitizes one raw record in place and returns it.
pub fn sanitize(mut record: RawRecord, policy: &RegionPolicy) -> RawRecord {
    for (_, value) in record.fields_mut() {
        if let Scalar::Text(text) = value {
            // Marker check runs on the raw value; cleaning would mangle "n/a".
            if is_null_marker(text.trim()) {
                *value = Scalar::Null;
                continue;
            }
            let cleaned = clean_text(text, policy.extra_chars);
            if cleaned.is_empty() {
                *value = Scalar::Null;
            } else {
                *value = Scalar::Text(cleaned);
            }
        }
    }
    enforce_bbox(&mut record, policy);
    record
}

/// Keeps letters, digits, whitespace, `.,-` and the policy's extra
/// characters; everything else is removed. Result is trimmed.
fn clean_text(raw: &str, extra: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || ".,-".contains(*c) || extra.contains(*c)
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_null_marker(raw: &str) -> bool {
    NULL_MARKERS
        .iter()
        .any(|marker| raw.eq_ignore_ascii_case(marker))
}

/// Coordinates present but outside the region's bounding box (or present but
/// non-numeric) become Null. Absent coordinates stay absent.
fn enforce_bbox(record: &mut RawRecord, policy: &RegionPolicy) {
    let lat_ok = matches!(record.get(fields::LATITUDE), Some(Scalar::Number(v)) if policy.bbox.contains_lat(*v));
    if record.has_value(fields::LATITUDE) && !lat_ok {
        record.set_null(fields::LATITUDE);
    }
    let lon_ok = matches!(record.get(fields::LONGITUDE), Some(Scalar::Number(v)) if policy.bbox.contains_lon(*v));
    if record.has_value(fields::LONGITUDE) && !lon_ok {
        record.set_null(fields::LONGITUDE);
    }
}

// =============================================================================
// TESTS
// =============================================================================
