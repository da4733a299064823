use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::{EventId, PromoterId, VenueId};

/// Event - a scheduled happening at a venue, organized by a promoter
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub venue_id: VenueId,
    pub promoter_id: PromoterId,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub admission_price: Option<Decimal>,
    /// Monotonically increasing page-view counter. Additive across merges.
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Event {
    /// Find event by ID
    pub async fn find_by_id(id: EventId, pool: &PgPool) -> Result<Option<Self>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(event)
    }

    /// Find all events in stable (insertion) order
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(events)
    }

    /// Find events held at a venue
    pub async fn find_for_venue(venue_id: VenueId, pool: &PgPool) -> Result<Vec<Self>> {
        let events =
            sqlx::query_as::<_, Event>("SELECT * FROM events WHERE venue_id = $1 ORDER BY id")
                .bind(venue_id)
                .fetch_all(pool)
                .await?;
        Ok(events)
    }

    /// Find events organized by a promoter
    pub async fn find_for_promoter(promoter_id: PromoterId, pool: &PgPool) -> Result<Vec<Self>> {
        let events =
            sqlx::query_as::<_, Event>("SELECT * FROM events WHERE promoter_id = $1 ORDER BY id")
                .bind(promoter_id)
                .fetch_all(pool)
                .await?;
        Ok(events)
    }

    /// Count all events
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Move every event at one venue to another. Returns rows updated.
    pub async fn repoint_venue<'e>(
        from: VenueId,
        to: VenueId,
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE events SET venue_id = $2, updated_at = NOW() WHERE venue_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Move every event run by one promoter to another. Returns rows updated.
    pub async fn repoint_promoter<'e>(
        from: PromoterId,
        to: PromoterId,
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE events SET promoter_id = $2, updated_at = NOW() WHERE promoter_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Add views onto an event's counter (view counts are additive measures
    /// of independent observation, not a resource needing deduplication).
    pub async fn add_views<'e>(
        id: EventId,
        views: i64,
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE events SET view_count = view_count + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(views)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete an event row. Returns the number of rows removed.
    pub async fn delete<'e>(id: EventId, executor: impl PgExecutor<'e>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
