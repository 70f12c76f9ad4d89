//! Postgres-backed warehouse client.
//!
//! Ledger reads and writes are parameterized queries against the ledger
//! table; bulk loads stream the prepared payload through `COPY FROM STDIN`.

use async_trait::async_trait;
use snafu::prelude::*;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolCopyExt};
use tracing::debug;

use crate::classify::TargetTable;
use crate::error::{SqlSnafu, WarehouseError};
use crate::ledger::LedgerEntry;

use super::copy::prepare_copy_payload;
use super::{LEDGER_COLUMNS, LoadFormat, LoadOutcome, Warehouse};

/// Warehouse client backed by a Postgres connection pool.
pub struct PostgresWarehouse {
    pool: PgPool,
}

impl PostgresWarehouse {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the warehouse at the given URL.
    pub async fn connect(url: &str) -> Result<Self, WarehouseError> {
        let pool = PgPool::connect(url).await.context(SqlSnafu)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Warehouse for PostgresWarehouse {
    async fn query_ledger(
        &self,
        table: &str,
        file_name: &str,
        business_date: &str,
    ) -> Result<Option<bool>, WarehouseError> {
        let sql = format!(
            "SELECT is_loaded FROM {table} \
             WHERE file_name = $1 AND file_business_date = $2 LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(file_name)
            .bind(business_date)
            .fetch_optional(&self.pool)
            .await
            .context(SqlSnafu)?;

        match row {
            None => Ok(None),
            Some(row) => {
                let flag: Option<bool> = row.try_get("is_loaded").context(SqlSnafu)?;
                Ok(Some(flag.unwrap_or(false)))
            }
        }
    }

    async fn insert_ledger_row(
        &self,
        table: &str,
        entry: &LedgerEntry,
    ) -> Result<(), WarehouseError> {
        let sql = format!(
            "INSERT INTO {table} ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            LEDGER_COLUMNS.join(", ")
        );
        sqlx::query(&sql)
            .bind(&entry.metadata.report_item_name)
            .bind(&entry.metadata.report_item_id)
            .bind(&entry.metadata.run_date)
            .bind(&entry.metadata.fund_id)
            .bind(&entry.metadata.advisor)
            .bind(&entry.metadata.business_date)
            .bind(entry.metadata.record_count as i64)
            .bind(&entry.metadata.file_name)
            .bind(entry.is_loaded)
            .bind(&entry.log_detail)
            .execute(&self.pool)
            .await
            .context(SqlSnafu)?;
        Ok(())
    }

    async fn update_ledger_row(
        &self,
        table: &str,
        file_name: &str,
        business_date: &str,
        is_loaded: bool,
        log_detail: &str,
    ) -> Result<(), WarehouseError> {
        let sql = format!(
            "UPDATE {table} SET is_loaded = $3, log_detail = $4 \
             WHERE file_name = $1 AND file_business_date = $2"
        );
        sqlx::query(&sql)
            .bind(file_name)
            .bind(business_date)
            .bind(is_loaded)
            .bind(log_detail)
            .execute(&self.pool)
            .await
            .context(SqlSnafu)?;
        Ok(())
    }

    async fn bulk_load(
        &self,
        table: TargetTable,
        contents: &str,
        format: LoadFormat,
    ) -> Result<LoadOutcome, WarehouseError> {
        let payload = match prepare_copy_payload(contents, &format, table.column_count()) {
            Ok(payload) => payload,
            Err(reject) => {
                return Ok(LoadOutcome::Failed {
                    message: reject.message(),
                });
            }
        };

        debug!(
            table = table.table_name(),
            rows = payload.row_count,
            "Starting bulk load"
        );

        let sql = format!(
            "COPY {} FROM STDIN WITH (FORMAT csv, DELIMITER '|')",
            table.table_name()
        );
        let mut copy = self.pool.copy_in_raw(&sql).await.context(SqlSnafu)?;
        if let Err(e) = copy.send(payload.data.as_bytes()).await {
            return Ok(LoadOutcome::Failed {
                message: e.to_string(),
            });
        }
        // COPY data errors surface at finish; they fail the job, not the run.
        match copy.finish().await {
            Ok(output_rows) => Ok(LoadOutcome::Completed { output_rows }),
            Err(e) => Ok(LoadOutcome::Failed {
                message: e.to_string(),
            }),
        }
    }
}
