//! Per-region load pipeline and the multi-source run orchestrator.
//!
//! Every record of a region batch flows sanitize → validate → resolve
//! dimensions → upsert, and lands in exactly one outcome bucket: inserted,
//! repaired (duplicate, kept the existing row) or rejected. The orchestrator
//! runs the requested sources in order, isolating each source's failures so
//! one broken feed never costs the others their load.

use anyhow::{anyhow, Context, Result};
use sqlx::postgres::PgPool;

use crate::adapt;
use crate::fetch::SourceFetcher;
use crate::policy::{policy_for, RegionPolicy};
use crate::record::{fields, RawRecord, Region, RejectionNote, RepairNote, RunOutcome};
use crate::sanitize::sanitize;
use crate::store::{
    self, create_job_run, finish_job_run, resolve_locality, resolve_province, DimensionCache,
    PgStore, StationStore, Upsert,
};

/// Dimension name used when a valid record legitimately carries no locality
/// or province (CV mobile units).
const FALLBACK_DIMENSION: &str = "Desconocida";

/// Runs one region batch against the store. Per-record store errors are
/// absorbed as rejections so the counts always sum to the batch size.
pub async fn run_region<S: StationStore>(
    store: &mut S,
    policy: &RegionPolicy,
    records: Vec<RawRecord>,
) -> RunOutcome {
    let source = policy.region.code();
    let mut outcome = RunOutcome::default();
    let mut cache = DimensionCache::new();

    for record in records {
        let record = sanitize(record, policy);
        let station_name = record.text(fields::NAME).unwrap_or("unknown").to_string();
        let locality_name = record
            .text(fields::LOCALITY)
            .unwrap_or("unknown")
            .to_string();

        let station = match policy.validate(&record) {
            Ok(station) => station,
            Err(reason) => {
                outcome.record_rejected(RejectionNote {
                    source: source.to_string(),
                    station: station_name,
                    locality: locality_name,
                    reason,
                });
                continue;
            }
        };

        let province = station.province.as_deref().unwrap_or(FALLBACK_DIMENSION);
        let locality = station.locality.as_deref().unwrap_or(FALLBACK_DIMENSION);
        let locality_id = match resolve_dimensions(store, &mut cache, province, locality).await {
            Ok(id) => id,
            Err(e) => {
                outcome.record_rejected(RejectionNote {
                    source: source.to_string(),
                    station: station_name,
                    locality: locality_name,
                    reason: format!("dimension resolution failed: {e:#}"),
                });
                continue;
            }
        };

        match store::upsert_station(store, &station, locality_id).await {
            Ok(Upsert::Inserted) => outcome.record_inserted(),
            Ok(Upsert::DuplicateSkipped) => outcome.record_repaired(RepairNote {
                source: source.to_string(),
                station: station_name,
                locality: locality_name,
                reason: "duplicate record".to_string(),
                action: "ignored".to_string(),
            }),
            Err(e) => outcome.record_rejected(RejectionNote {
                source: source.to_string(),
                station: station_name,
                locality: locality_name,
                reason: format!("insert failed: {e:#}"),
            }),
        }
    }

    outcome
}

async fn resolve_dimensions<S: StationStore>(
    store: &mut S,
    cache: &mut DimensionCache,
    province: &str,
    locality: &str,
) -> Result<i64> {
    let province_id = resolve_province(store, cache, province).await?;
    resolve_locality(store, cache, locality, province_id).await
}

// =============================================================================
// RUN ORCHESTRATOR
// =============================================================================

/// Loads the requested sources in order and merges their outcomes. A failing
/// source is logged and captured in the merged outcome's failure list; the
/// remaining sources still run.
pub async fn run_load(
    pool: &PgPool,
    fetcher: &SourceFetcher,
    sources: &str,
    dry_run: bool,
) -> RunOutcome {
    let mut merged = RunOutcome::default();
    for code in sources.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        println!("--- Loading source {code} ---");
        let result = load_source(pool, fetcher, code, dry_run).await;
        absorb(&mut merged, code, result);
    }
    merged
}

/// Folds one source's result into the merged outcome.
fn absorb(merged: &mut RunOutcome, source: &str, result: Result<RunOutcome>) {
    match result {
        Ok(outcome) => {
            println!(
                "  {source}: {} inserted, {} repaired, {} rejected",
                outcome.inserted, outcome.repaired, outcome.rejected
            );
            merged.merge(outcome);
        }
        Err(e) => {
            eprintln!("  {source}: load failed: {e:#}");
            merged.record_failure(source, format!("{e:#}"));
        }
    }
}

/// Fetches, adapts and loads one source inside its own transaction, with a
/// job_runs audit row around the whole attempt.
async fn load_source(
    pool: &PgPool,
    fetcher: &SourceFetcher,
    code: &str,
    dry_run: bool,
) -> Result<RunOutcome> {
    let region = Region::parse(code).ok_or_else(|| anyhow!("unknown source code: {code}"))?;
    let policy = policy_for(region);

    let job_id = create_job_run(pool, region.code()).await?;
    let result = async {
        let payload = fetcher.fetch(region).await?;
        let records = adapt::adapt(region, &payload)
            .with_context(|| format!("failed to adapt the {region} payload"))?;
        println!("  {region}: {} raw records", records.len());

        let mut store = PgStore::begin(pool).await?;
        let outcome = run_region(&mut store, policy, records).await;
        if dry_run {
            store.rollback().await?;
            println!("  {region}: dry run, batch rolled back");
        } else {
            store.commit().await?;
        }
        Ok::<RunOutcome, anyhow::Error>(outcome)
    }
    .await;

    match &result {
        Ok(outcome) => finish_job_run(pool, job_id, "ok", None, Some(outcome)).await?,
        Err(e) => finish_job_run(pool, job_id, "failed", Some(&format!("{e:#}")), None).await?,
    }
    result
}

// =============================================================================
// TESTS
// =============================================================================
