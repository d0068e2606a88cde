//! PostgreSQL-based subscriber backend.
//!
//! Subscribers live in the `subscribers` table with tags as `TEXT[]`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::backend::{SubscriberBackend, SubscriberResult};
use super::types::Subscriber;

type SubscriberRow = (String, Vec<String>, DateTime<Utc>, DateTime<Utc>);

fn subscriber_from_row(row: SubscriberRow) -> Subscriber {
    let (email, tags, subscribed_at, updated_at) = row;
    Subscriber {
        email,
        tags,
        subscribed_at,
        updated_at,
    }
}

/// PostgreSQL-based subscriber backend.
pub struct PostgresSubscriberBackend {
    pool: PgPool,
}

impl PostgresSubscriberBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberBackend for PostgresSubscriberBackend {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, email: &str) -> SubscriberResult<Option<Subscriber>> {
        let row: Option<SubscriberRow> = sqlx::query_as(
            "SELECT email, tags, subscribed_at, updated_at FROM subscribers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(subscriber_from_row))
    }

    async fn save(&self, subscriber: &Subscriber) -> SubscriberResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (email, tags, subscribed_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET tags = EXCLUDED.tags, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&subscriber.email)
        .bind(&subscriber.tags)
        .bind(subscriber.subscribed_at)
        .bind(subscriber.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(email = %subscriber.email, "Subscriber saved to PostgreSQL");
        Ok(())
    }

    async fn delete(&self, email: &str) -> SubscriberResult<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> SubscriberResult<Vec<Subscriber>> {
        let rows: Vec<SubscriberRow> = sqlx::query_as(
            "SELECT email, tags, subscribed_at, updated_at FROM subscribers ORDER BY email ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(subscriber_from_row).collect())
    }

    async fn count(&self) -> SubscriberResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as usize)
    }
}
