use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{PromoterId, UserId};

/// Promoter - a company that organizes events
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Promoter {
    pub id: PromoterId,
    pub company_name: String,
    pub description: Option<String>,
    /// Account that manages this profile, if claimed. Never merged.
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Promoter {
    /// Find promoter by ID
    pub async fn find_by_id(id: PromoterId, pool: &PgPool) -> Result<Option<Self>> {
        let promoter = sqlx::query_as::<_, Promoter>("SELECT * FROM promoters WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(promoter)
    }

    /// Find all promoters in stable (insertion) order
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let promoters = sqlx::query_as::<_, Promoter>("SELECT * FROM promoters ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(promoters)
    }

    /// Count all promoters
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM promoters")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Delete a promoter row. Returns the number of rows removed.
    pub async fn delete<'e>(id: PromoterId, executor: impl PgExecutor<'e>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM promoters WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
