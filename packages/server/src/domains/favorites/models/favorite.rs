use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::common::{EntityKind, FavoriteId, UserId};

/// Favorite - polymorphic association from a user to any directory entity.
///
/// The target is a kind tag plus an id with no enforced foreign key; it is
/// resolved against the right table at the application layer. Unique on
/// `(user_id, favoritable_kind, favoritable_id)`: a user favorites a given
/// entity at most once.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub favoritable_kind: EntityKind,
    pub favoritable_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// The tagged target of this favorite.
    pub fn target(&self) -> FavoriteTarget {
        FavoriteTarget {
            kind: self.favoritable_kind,
            id: self.favoritable_id,
        }
    }
}

/// Tagged target of a favorite: explicit kind discriminant plus id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteTarget {
    pub kind: EntityKind,
    pub id: Uuid,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Favorite {
    /// Find every favorite pointing at a given entity
    pub async fn find_for_target(
        kind: EntityKind,
        target_id: Uuid,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let favorites = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT * FROM favorites
            WHERE favoritable_kind = $1 AND favoritable_id = $2
            ORDER BY id
            "#,
        )
        .bind(kind)
        .bind(target_id)
        .fetch_all(pool)
        .await?;
        Ok(favorites)
    }

    /// Delete specific favorite rows by ID. Returns rows removed.
    pub async fn delete_by_ids<'e>(
        ids: &[FavoriteId],
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Move every remaining favorite on one target to another target of the
    /// same kind. Caller must have removed colliding rows first or the
    /// triple-uniqueness constraint aborts the transaction.
    pub async fn repoint_target<'e>(
        kind: EntityKind,
        from: Uuid,
        to: Uuid,
        executor: impl PgExecutor<'e>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE favorites SET favoritable_id = $3
            WHERE favoritable_kind = $1 AND favoritable_id = $2
            "#,
        )
        .bind(kind)
        .bind(from)
        .bind(to)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
