//! Station store: dimension lookups, duplicate-aware station inserts, and
//! the job-run audit table.
//!
//! The pipeline talks to the store through the `StationStore` trait so the
//! per-region logic can be exercised against an in-memory implementation in
//! tests. The production implementation wraps one Postgres transaction per
//! region batch; the batch commits or rolls back as a whole.

use anyhow::{Context, Result};
use serde_json::json;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::record::CanonicalStation;

/// Result of attempting to persist one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    /// A station with the same (name, locality) already exists; the existing
    /// row is kept untouched.
    DuplicateSkipped,
}

/// Persistence seam for the per-region pipeline.
#[allow(async_fn_in_trait)]
pub trait StationStore {
    async fn find_province(&mut self, name: &str) -> Result<Option<i64>>;
    async fn insert_province(&mut self, name: &str) -> Result<i64>;
    async fn find_locality(&mut self, name: &str, province_id: i64) -> Result<Option<i64>>;
    async fn insert_locality(&mut self, name: &str, province_id: i64) -> Result<i64>;
    async fn station_exists(&mut self, name: &str, locality_id: i64) -> Result<bool>;
    async fn insert_station(&mut self, station: &CanonicalStation, locality_id: i64)
        -> Result<()>;
}

// =============================================================================
// DIMENSION CACHE + RESOLVER
// =============================================================================

/// Run-scoped cache of dimension identities, so repeated provinces and
/// localities within one batch hit the store once.
#[derive(Debug, Default)]
pub struct DimensionCache {
    provinces: HashMap<String, i64>,
    localities: HashMap<(String, i64), i64>,
}

impl DimensionCache {
    pub fn new() -> DimensionCache {
        DimensionCache::default()
    }
}

/// Resolves a province name to its identity, creating the row on first
/// sight within the run.
pub async fn resolve_province<S: StationStore>(
    store: &mut S,
    cache: &mut DimensionCache,
    name: &str,
) -> Result<i64> {
    if let Some(id) = cache.provinces.get(name) {
        return Ok(*id);
    }
    let id = match store.find_province(name).await? {
        Some(id) => id,
        None => store.insert_province(name).await?,
    };
    cache.provinces.insert(name.to_string(), id);
    Ok(id)
}

/// Resolves a locality name within a province, creating the row on first
/// sight within the run.
pub async fn resolve_locality<S: StationStore>(
    store: &mut S,
    cache: &mut DimensionCache,
    name: &str,
    province_id: i64,
) -> Result<i64> {
    let key = (name.to_string(), province_id);
    if let Some(id) = cache.localities.get(&key) {
        return Ok(*id);
    }
    let id = match store.find_locality(name, province_id).await? {
        Some(id) => id,
        None => store.insert_locality(name, province_id).await?,
    };
    cache.localities.insert(key, id);
    Ok(id)
}

/// Inserts a station unless an identical (name, locality) row exists.
/// Existing rows are never updated.
pub async fn upsert_station<S: StationStore>(
    store: &mut S,
    station: &CanonicalStation,
    locality_id: i64,
) -> Result<Upsert> {
    if store.station_exists(&station.name, locality_id).await? {
        return Ok(Upsert::DuplicateSkipped);
    }
    store.insert_station(station, locality_id).await?;
    Ok(Upsert::Inserted)
}

// =============================================================================
// POSTGRES IMPLEMENTATION
// =============================================================================

/// Postgres-backed store on a single transaction. Dropped without commit,
/// the whole batch is rolled back.
pub struct PgStore {
    tx: Transaction<'static, Postgres>,
}

impl PgStore {
    pub async fn begin(pool: &PgPool) -> Result<PgStore> {
        let tx = pool
            .begin()
            .await
            .context("failed to open a database transaction")?;
        Ok(PgStore { tx })
    }

    pub async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .context("failed to commit the region batch")
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx
            .rollback()
            .await
            .context("failed to roll back the region batch")
    }
}

impl StationStore for PgStore {
    async fn find_province(&mut self, name: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT province_id FROM provinces WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row.map(|(id,)| id))
    }

    async fn insert_province(&mut self, name: &str) -> Result<i64> {
        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO provinces (name) VALUES ($1) RETURNING province_id")
                .bind(name)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(id)
    }

    async fn find_locality(&mut self, name: &str, province_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT locality_id FROM localities WHERE name = $1 AND province_id = $2",
        )
        .bind(name)
        .bind(province_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(|(id,)| id))
    }

    async fn insert_locality(&mut self, name: &str, province_id: i64) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO localities (name, province_id) VALUES ($1, $2) RETURNING locality_id",
        )
        .bind(name)
        .bind(province_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(id)
    }

    async fn station_exists(&mut self, name: &str, locality_id: i64) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT station_id FROM stations WHERE name = $1 AND locality_id = $2",
        )
        .bind(name)
        .bind(locality_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.is_some())
    }

    async fn insert_station(
        &mut self,
        station: &CanonicalStation,
        locality_id: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stations
                (name, kind, address, postal_code, longitude, latitude,
                 description, schedule, contact, url, locality_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&station.name)
        .bind(station.kind.as_str())
        .bind(&station.address)
        .bind(&station.postal_code)
        .bind(station.longitude)
        .bind(station.latitude)
        .bind(&station.description)
        .bind(&station.schedule)
        .bind(&station.contact)
        .bind(&station.url)
        .bind(locality_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }
}

// =============================================================================
// MAINTENANCE + AUDIT
// =============================================================================

/// Empties the station hierarchy and restarts identities. Used by the reset
/// endpoint and the CLI `--reset` flag.
pub async fn truncate_all(pool: &PgPool) -> Result<()> {
    sqlx::query("TRUNCATE stations, localities, provinces RESTART IDENTITY CASCADE")
        .execute(pool)
        .await
        .context("failed to truncate the station tables")?;
    Ok(())
}

/// Opens a job_runs audit row for one per-source load.
pub async fn create_job_run(pool: &PgPool, source: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO job_runs (job_run_id, component, source_id, started_at, status)
        VALUES ($1, 'loader', $2, now(), 'running')
        "#,
    )
    .bind(id)
    .bind(source)
    .execute(pool)
    .await
    .context("failed to create the job_runs row")?;
    Ok(id)
}

/// Closes a job_runs row with the final status, optional error text and the
/// per-source counts as JSON detail.
pub async fn finish_job_run(
    pool: &PgPool,
    id: Uuid,
    status: &str,
    error: Option<&str>,
    detail: Option<&crate::record::RunOutcome>,
) -> Result<()> {
    let detail_json = detail.map(|outcome| {
        json!({
            "inserted": outcome.inserted,
            "repaired": outcome.repaired,
            "rejected": outcome.rejected,
        })
    });
    sqlx::query(
        r#"
        UPDATE job_runs
        SET finished_at = now(), status = $2, error = $3, detail = $4
        WHERE job_run_id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(error)
    .bind(detail_json)
    .execute(pool)
    .await
    .context("failed to finish the job_runs row")?;
    Ok(())
}
