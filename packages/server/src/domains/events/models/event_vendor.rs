use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{EventId, EventVendorId, VendorId};

/// EventVendor - join row linking one event and one vendor.
///
/// Unique on `(event_id, vendor_id)`: an event may not list the same vendor
/// twice. The merge executor resolves would-be duplicates by discarding the
/// duplicate record's copy before repointing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventVendor {
    pub id: EventVendorId,
    pub event_id: EventId,
    pub vendor_id: VendorId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl EventVendor {
    /// Find participation rows for a vendor
    pub async fn find_for_vendor(vendor_id: VendorId, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, EventVendor>(
            "SELECT * FROM event_vendors WHERE vendor_id = $1 ORDER BY id",
        )
        .bind(vendor_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Find participation rows for an event
    pub async fn find_for_event(event_id: EventId, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, EventVendor>(
            "SELECT * FROM event_vendors WHERE event_id = $1 ORDER BY id",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Delete specific participation rows by ID. Returns rows removed.
    pub async fn delete_by_ids<'e>(
        ids: &[EventVendorId],
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM event_vendors WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Move every remaining participation row from one vendor to another.
    /// Caller must have removed colliding rows first or the pair-uniqueness
    /// constraint aborts the transaction.
    pub async fn repoint_vendor<'e>(
        from: VendorId,
        to: VendorId,
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query("UPDATE event_vendors SET vendor_id = $2 WHERE vendor_id = $1")
            .bind(from)
            .bind(to)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Move every remaining participation row from one event to another.
    pub async fn repoint_event<'e>(
        from: EventId,
        to: EventId,
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query("UPDATE event_vendors SET event_id = $2 WHERE event_id = $1")
            .bind(from)
            .bind(to)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
