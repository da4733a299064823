use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{UserId, VendorId};

/// Vendor - a business that participates in events (food truck, craft
/// stall, equipment supplier, ...)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub business_name: String,
    pub vendor_type: Option<String>,
    pub description: Option<String>,
    /// Account that manages this profile, if claimed. Never merged -
    /// merging two vendors merges catalog data only.
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Vendor {
    /// Find vendor by ID
    pub async fn find_by_id(id: VendorId, pool: &PgPool) -> Result<Option<Self>> {
        let vendor = sqlx::query_as::<_, Vendor>("SELECT * FROM vendors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(vendor)
    }

    /// Find all vendors in stable (insertion) order
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let vendors = sqlx::query_as::<_, Vendor>("SELECT * FROM vendors ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(vendors)
    }

    /// Count all vendors
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vendors")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Delete a vendor row. Returns the number of rows removed.
    pub async fn delete<'e>(id: VendorId, executor: impl PgExecutor<'e>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
