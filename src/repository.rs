use crate::models::Drink;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// DrinkRepository Trait
///
/// Abstract contract for persistence of the drinks table. Handlers depend on
/// this trait rather than a concrete database, so tests substitute an
/// in-memory mock. Methods return `Result` so the caller can coerce any
/// persistence failure to a 422 response.
#[async_trait]
pub trait DrinkRepository: Send + Sync {
    /// All drinks, ordered by title.
    async fn list(&self) -> Result<Vec<Drink>, sqlx::Error>;

    /// Title-uniqueness probe, used before insert.
    async fn find_by_title(&self, title: &str) -> Result<Option<Drink>, sqlx::Error>;

    /// Inserts a new row with a freshly generated id.
    async fn insert(&self, title: &str, recipe: &str) -> Result<Drink, sqlx::Error>;

    /// Partial update: unspecified fields keep their current value.
    /// Returns None when the id does not exist.
    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> Result<Option<Drink>, sqlx::Error>;

    /// Removes a row; true when a row was actually deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn DrinkRepository>;

/// PostgresDrinkRepository
///
/// The concrete implementation of `DrinkRepository`, backed by Postgres.
pub struct PostgresDrinkRepository {
    pool: PgPool,
}

impl PostgresDrinkRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DrinkRepository for PostgresDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, sqlx::Error> {
        sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("list drinks error: {:?}", e))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Drink>, sqlx::Error> {
        sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks WHERE title = $1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("find drink by title error: {:?}", e))
    }

    async fn insert(&self, title: &str, recipe: &str) -> Result<Drink, sqlx::Error> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Drink>(
            "INSERT INTO drinks (id, title, recipe) VALUES ($1, $2, $3) RETURNING id, title, recipe",
        )
        .bind(new_id)
        .bind(title)
        .bind(recipe)
        .fetch_one(&self.pool)
        .await
        .inspect_err(|e| tracing::error!("insert drink error: {:?}", e))
    }

    /// COALESCE keeps the stored value for any field the caller did not supply.
    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> Result<Option<Drink>, sqlx::Error> {
        sqlx::query_as::<_, Drink>(
            r#"
            UPDATE drinks
            SET title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(recipe)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!("update drink error: {:?}", e))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("delete drink error: {:?}", e))?;
        Ok(result.rows_affected() > 0)
    }
}
