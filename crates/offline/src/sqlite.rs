//! SQLite-backed record store.
//!
//! Rows are upserted on `(seccion, fecha, item)`: saving the same sheet again
//! on the same day (for instance after a save failed halfway) overwrites the
//! earlier rows instead of duplicating them.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;
use uuid::Uuid;

use granja_capture::{FEED_HOUSES, FeedRow, PACKAGING_TYPES, PackagingRow, RecordStore, StoreError};
use granja_core::{Quantity, Section};

use crate::config::{StoreConfig, StoreLocation};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Offline store on a local SQLite database.
///
/// Cheap to clone; clones share the same pool.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    config: StoreConfig,
    /// Opened on first use.
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteRecordStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            pool: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the pool, connecting and creating the schema on first use.
    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let pool = self.connect().await?;
        create_schema(&pool).await?;
        *guard = Some(pool.clone());
        Ok(pool)
    }

    async fn connect(&self) -> anyhow::Result<SqlitePool> {
        let (options, max_connections) = match &self.config.location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create store directory at {:?}", parent))?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                (options, 4)
            }
            // Every connection to `:memory:` is a separate database.
            StoreLocation::Memory => (
                SqliteConnectOptions::from_str("sqlite::memory:")
                    .context("invalid in-memory SQLite options")?,
                1,
            ),
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite store at {:?}", self.config.location))?;

        tracing::info!(location = ?self.config.location, "offline store opened");
        Ok(pool)
    }

    async fn upsert_feed(&self, row: &FeedRow) -> anyhow::Result<()> {
        let pool = self.pool().await?;

        sqlx::query(
            r#"
            INSERT INTO alimento (
                id,
                seccion,
                fecha,
                caseta,
                existencia_inicial,
                entrada,
                consumo,
                tipo,
                edad,
                guardado_en
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(seccion, fecha, caseta)
            DO UPDATE SET
                existencia_inicial = excluded.existencia_inicial,
                entrada = excluded.entrada,
                consumo = excluded.consumo,
                tipo = excluded.tipo,
                edad = excluded.edad,
                guardado_en = excluded.guardado_en
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(section_key(row.seccion.as_ref()))
        .bind(row.fecha.format(DATE_FORMAT).to_string())
        .bind(&row.caseta)
        .bind(row.existencia_inicial.render())
        .bind(row.entrada.render())
        .bind(row.consumo.render())
        .bind(&row.tipo)
        .bind(&row.edad)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .context("failed to upsert feed row")?;

        Ok(())
    }

    async fn upsert_packaging(&self, row: &PackagingRow) -> anyhow::Result<()> {
        let pool = self.pool().await?;

        sqlx::query(
            r#"
            INSERT INTO envase (
                id,
                seccion,
                fecha,
                tipo,
                inicial,
                recibido,
                consumo,
                final,
                guardado_en
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(seccion, fecha, tipo)
            DO UPDATE SET
                inicial = excluded.inicial,
                recibido = excluded.recibido,
                consumo = excluded.consumo,
                final = excluded.final,
                guardado_en = excluded.guardado_en
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(section_key(row.seccion.as_ref()))
        .bind(row.fecha.format(DATE_FORMAT).to_string())
        .bind(&row.tipo)
        .bind(row.inicial.render())
        .bind(row.recibido.render())
        .bind(row.consumo.render())
        .bind(row.final_stock.render())
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .context("failed to upsert packaging row")?;

        Ok(())
    }

    /// Feed rows stored for a section and day, in house order.
    pub async fn list_feed(
        &self,
        section: Option<&Section>,
        fecha: NaiveDate,
    ) -> anyhow::Result<Vec<FeedRow>> {
        let pool = self.pool().await?;

        let rows = sqlx::query(
            r#"
            SELECT
                seccion,
                fecha,
                caseta,
                existencia_inicial,
                entrada,
                consumo,
                tipo,
                edad
            FROM alimento
            WHERE seccion = ?1
              AND fecha = ?2
            "#,
        )
        .bind(section_key(section))
        .bind(fecha.format(DATE_FORMAT).to_string())
        .fetch_all(&pool)
        .await
        .context("failed to list feed rows")?;

        let mut out = rows
            .into_iter()
            .map(row_to_feed)
            .collect::<anyhow::Result<Vec<_>>>()?;
        out.sort_by_key(|row| declaration_index(&FEED_HOUSES, &row.caseta));
        Ok(out)
    }

    /// Packaging rows stored for a section and day, in packaging type order.
    pub async fn list_packaging(
        &self,
        section: Option<&Section>,
        fecha: NaiveDate,
    ) -> anyhow::Result<Vec<PackagingRow>> {
        let pool = self.pool().await?;

        let rows = sqlx::query(
            r#"
            SELECT
                seccion,
                fecha,
                tipo,
                inicial,
                recibido,
                consumo,
                final
            FROM envase
            WHERE seccion = ?1
              AND fecha = ?2
            "#,
        )
        .bind(section_key(section))
        .bind(fecha.format(DATE_FORMAT).to_string())
        .fetch_all(&pool)
        .await
        .context("failed to list packaging rows")?;

        let mut out = rows
            .into_iter()
            .map(row_to_packaging)
            .collect::<anyhow::Result<Vec<_>>>()?;
        out.sort_by_key(|row| declaration_index(&PACKAGING_TYPES, &row.tipo));
        Ok(out)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert_feed(&self, row: &FeedRow) -> Result<(), StoreError> {
        self.upsert_feed(row).await.map_err(|err| {
            tracing::error!("failed to store feed row for {}: {err:?}", row.caseta);
            StoreError::backend(format!("{err:#}"))
        })
    }

    async fn insert_packaging(&self, row: &PackagingRow) -> Result<(), StoreError> {
        self.upsert_packaging(row).await.map_err(|err| {
            tracing::error!("failed to store packaging row for {}: {err:?}", row.tipo);
            StoreError::backend(format!("{err:#}"))
        })
    }
}

async fn create_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alimento (
            id                 TEXT PRIMARY KEY,
            seccion            TEXT NOT NULL,
            fecha              TEXT NOT NULL,
            caseta             TEXT NOT NULL,
            existencia_inicial TEXT NOT NULL,
            entrada            TEXT NOT NULL,
            consumo            TEXT NOT NULL,
            tipo               TEXT NOT NULL,
            edad               TEXT NOT NULL,
            guardado_en        TEXT NOT NULL,
            UNIQUE (seccion, fecha, caseta)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create alimento table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS envase (
            id          TEXT PRIMARY KEY,
            seccion     TEXT NOT NULL,
            fecha       TEXT NOT NULL,
            tipo        TEXT NOT NULL,
            inicial     TEXT NOT NULL,
            recibido    TEXT NOT NULL,
            consumo     TEXT NOT NULL,
            final       TEXT NOT NULL,
            guardado_en TEXT NOT NULL,
            UNIQUE (seccion, fecha, tipo)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create envase table")?;

    Ok(())
}

/// Unset sections are stored as `''`; SQLite treats NULLs as distinct in
/// unique keys, which would defeat the upsert.
fn section_key(section: Option<&Section>) -> String {
    section.map(|s| s.as_str().to_string()).unwrap_or_default()
}

fn declaration_index(labels: &[&str], item: &str) -> usize {
    labels
        .iter()
        .position(|label| *label == item)
        .unwrap_or(usize::MAX)
}

fn parse_section(row: &SqliteRow) -> anyhow::Result<Option<Section>> {
    let raw: String = row.try_get("seccion")?;
    if raw.is_empty() {
        return Ok(None);
    }
    let section = Section::new(&raw).with_context(|| format!("invalid seccion '{raw}' in store"))?;
    Ok(Some(section))
}

fn parse_fecha(row: &SqliteRow) -> anyhow::Result<NaiveDate> {
    let raw: String = row.try_get("fecha")?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .with_context(|| format!("invalid fecha '{raw}' in store"))
}

fn parse_quantity(row: &SqliteRow, column: &str) -> anyhow::Result<Quantity> {
    let raw: String = row.try_get(column)?;
    let value = Decimal::from_str(&raw)
        .with_context(|| format!("invalid {column} '{raw}' in store"))?;
    Ok(Quantity::new(value))
}

/// Map a database row into a `FeedRow`.
fn row_to_feed(row: SqliteRow) -> anyhow::Result<FeedRow> {
    Ok(FeedRow {
        seccion: parse_section(&row)?,
        fecha: parse_fecha(&row)?,
        caseta: row.try_get("caseta")?,
        existencia_inicial: parse_quantity(&row, "existencia_inicial")?,
        entrada: parse_quantity(&row, "entrada")?,
        consumo: parse_quantity(&row, "consumo")?,
        tipo: row.try_get("tipo")?,
        edad: row.try_get("edad")?,
    })
}

/// Map a database row into a `PackagingRow`.
fn row_to_packaging(row: SqliteRow) -> anyhow::Result<PackagingRow> {
    Ok(PackagingRow {
        seccion: parse_section(&row)?,
        fecha: parse_fecha(&row)?,
        tipo: row.try_get("tipo")?,
        inicial: parse_quantity(&row, "inicial")?,
        recibido: parse_quantity(&row, "recibido")?,
        consumo: parse_quantity(&row, "consumo")?,
        final_stock: parse_quantity(&row, "final")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_section_is_an_empty_key() {
        assert_eq!(section_key(None), "");
        let section = Section::new("SECCION 3").unwrap();
        assert_eq!(section_key(Some(&section)), "SECCION 3");
    }

    #[test]
    fn unknown_labels_sort_last() {
        assert_eq!(declaration_index(&FEED_HOUSES, "CASETA 1"), 0);
        assert_eq!(declaration_index(&PACKAGING_TYPES, "CINTA BLANCA"), 8);
        assert_eq!(declaration_index(&FEED_HOUSES, "CASETA 99"), usize::MAX);
    }
}
