use spdlog::prelude::*;
use sqlx::sqlite::SqlitePool;

use crate::store::{self, KvStore};

pub struct Pool {
    pool: SqlitePool,
}

impl Pool {
    pub async fn connect(url: impl AsRef<str>) -> anyhow::Result<Self> {
        let url = url.as_ref();

        info!("connecting to database '{url}'");

        let pool = SqlitePool::connect(url).await?;

        info!("database connected");

        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl KvStore for Pool {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        store::ensure_key(key)?;

        let value = sqlx::query_scalar::<_, String>(
            r#"
SELECT value
FROM kv
WHERE key = ?1
        "#,
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        trace!("kv get '{key}': {value:?}");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        store::ensure_key(key)?;

        sqlx::query(
            r#"
INSERT OR REPLACE INTO kv ( key, value )
VALUES ( ?1, ?2 )
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await?;

        info!("kv set '{key}' to '{value}'");
        Ok(())
    }
}
