//! PostgreSQL-based post backend.
//!
//! Table structure (see `migrations/`):
//! - `posts` - current state of each post, variables as JSONB
//! - `post_versions` - append-only history keyed by `(post_id, version)`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::template::variables_from_json;

use super::backend::{PostBackend, PostError, PostResult};
use super::types::{Post, PostStatus, PostVersion};

type PostRow = (
    Uuid,
    String,
    String,
    Option<String>,
    String,
    serde_json::Value,
    String,
    i32,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

type VersionRow = (
    Uuid,
    i32,
    String,
    Option<String>,
    String,
    serde_json::Value,
    Option<String>,
    DateTime<Utc>,
);

const POST_COLUMNS: &str = "id, slug, title, excerpt, content, variables, status, version, \
                            created_at, updated_at, published_at";

const VERSION_COLUMNS: &str = "post_id, version, title, excerpt, content, variables, note, created_at";

/// PostgreSQL-based post backend.
pub struct PostgresPostBackend {
    pool: PgPool,
}

impl PostgresPostBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn post_from_row(row: PostRow) -> PostResult<Post> {
    let (
        id,
        slug,
        title,
        excerpt,
        content,
        variables,
        status,
        version,
        created_at,
        updated_at,
        published_at,
    ) = row;

    Ok(Post {
        id,
        slug,
        title,
        excerpt,
        content,
        variables: variables
            .as_object()
            .map(variables_from_json)
            .unwrap_or_default(),
        status: status.parse().map_err(PostError::Validation)?,
        version,
        created_at,
        updated_at,
        published_at,
    })
}

fn version_from_row(row: VersionRow) -> PostVersion {
    let (post_id, version, title, excerpt, content, variables, note, created_at) = row;

    PostVersion {
        post_id,
        version,
        title,
        excerpt,
        content,
        variables: variables
            .as_object()
            .map(variables_from_json)
            .unwrap_or_default(),
        note,
        created_at,
    }
}

/// Map a unique-constraint violation on `posts.slug` to `SlugTaken`.
fn map_slug_conflict(err: sqlx::Error, slug: &str) -> PostError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PostError::SlugTaken(slug.to_string())
        }
        _ => PostError::Postgres(err),
    }
}

async fn insert_version(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    version: &PostVersion,
) -> PostResult<()> {
    sqlx::query(
        r#"
        INSERT INTO post_versions (post_id, version, title, excerpt, content, variables, note, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(version.post_id)
    .bind(version.version)
    .bind(&version.title)
    .bind(&version.excerpt)
    .bind(&version.content)
    .bind(serde_json::to_value(&version.variables)?)
    .bind(&version.note)
    .bind(version.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl PostBackend for PostgresPostBackend {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, post: &Post, initial: &PostVersion) -> PostResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, slug, title, excerpt, content, variables, status, version,
                               created_at, updated_at, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(serde_json::to_value(&post.variables)?)
        .bind(post.status.as_str())
        .bind(post.version)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.published_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_slug_conflict(e, &post.slug))?;

        insert_version(&mut tx, initial).await?;
        tx.commit().await?;

        tracing::trace!(post_id = %post.id, slug = %post.slug, "Post inserted into PostgreSQL");
        Ok(())
    }

    async fn save(&self, post: &Post, version: Option<&PostVersion>) -> PostResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET slug = $2, title = $3, excerpt = $4, content = $5, variables = $6,
                status = $7, version = $8, updated_at = $9, published_at = $10
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(serde_json::to_value(&post.variables)?)
        .bind(post.status.as_str())
        .bind(post.version)
        .bind(post.updated_at)
        .bind(post.published_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_slug_conflict(e, &post.slug))?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound(post.id.to_string()));
        }

        if let Some(version) = version {
            insert_version(&mut tx, version).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> PostResult<Option<Post>> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(post_from_row).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> PostResult<Option<Post>> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {} FROM posts WHERE slug = $1", POST_COLUMNS))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;

        row.map(post_from_row).transpose()
    }

    async fn list(&self, status: Option<PostStatus>) -> PostResult<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!(
            "SELECT {} FROM posts WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY updated_at DESC",
            POST_COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(post_from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> PostResult<bool> {
        // post_versions rows go with the post via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn versions(&self, id: Uuid) -> PostResult<Vec<PostVersion>> {
        let rows: Vec<VersionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM post_versions WHERE post_id = $1 ORDER BY version ASC",
            VERSION_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(version_from_row).collect())
    }

    async fn version(&self, id: Uuid, version: i32) -> PostResult<Option<PostVersion>> {
        let row: Option<VersionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM post_versions WHERE post_id = $1 AND version = $2",
            VERSION_COLUMNS
        ))
        .bind(id)
        .bind(version)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(version_from_row))
    }

    async fn count(&self) -> PostResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as usize)
    }
}
