//! Core library for the ITV station load pipeline.
//!
//! Three regional sources (Comunitat Valenciana "CV", Catalunya "CAT",
//! Galicia "GAL") are fetched, adapted into a common semi-structured record,
//! sanitized, validated under region-specific rules and upserted into the
//! shared station store. Every record ends up classified as exactly one of
//! inserted, repaired or rejected, and the per-source outcomes are merged
//! into a single run-level report.

pub mod adapt;
pub mod fetch;
pub mod pipeline;
pub mod policy;
pub mod record;
pub mod sanitize;
pub mod store;
