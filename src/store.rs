use std::{fmt, future::Future};

use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use teloxide::types::UserId;

use crate::countdown::{self, DateParseError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Neet,
    Jee,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Neet, Category::Jee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neet => "neet",
            Self::Jee => "jee",
        }
    }

    /// Key of the persisted target date, e.g. `countdowns/neet`.
    pub fn key(&self) -> String {
        format!("countdowns/{}", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value storage of the countdown targets.
pub trait KvStore {
    fn get(&self, key: &str) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub async fn load_target(
    store: &impl KvStore,
    category: Category,
) -> anyhow::Result<Option<DateTime<Utc>>> {
    let Some(value) = store.get(&category.key()).await? else {
        return Ok(None);
    };

    let target = DateTime::parse_from_rfc3339(&value)
        .map_err(|err| anyhow!("stored target '{value}' for {category} is malformed: {err}"))?;
    Ok(Some(target.with_timezone(&Utc)))
}

#[derive(Debug, thiserror::Error)]
pub enum SetTargetError {
    #[error("caller is not allowed to change countdown targets")]
    Unauthorized,
    #[error(transparent)]
    Date(#[from] DateParseError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Validates and persists a new target. Nothing is written unless `caller`
/// is `admin` and `input` is a valid `dd-mm-yyyy` date.
pub async fn set_target(
    store: &impl KvStore,
    admin: UserId,
    caller: UserId,
    category: Category,
    input: &str,
) -> Result<DateTime<Utc>, SetTargetError> {
    if caller != admin {
        return Err(SetTargetError::Unauthorized);
    }

    let target = countdown::parse_date(input)?;
    store.set(&category.key(), &target.to_rfc3339()).await?;
    Ok(target)
}

pub(crate) fn ensure_key(key: &str) -> anyhow::Result<()> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
        bail!("invalid store key '{key}'");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use chrono::TimeZone;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub(crate) struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        pub(crate) fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KvStore for MemoryStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            ensure_key(key)?;
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            ensure_key(key)?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.entries.lock().await.insert(key.into(), value.into());
            Ok(())
        }
    }

    const ADMIN: UserId = UserId(1000);

    #[test]
    fn category_keys() {
        assert_eq!(Category::Neet.key(), "countdowns/neet");
        assert_eq!(Category::Jee.key(), "countdowns/jee");
    }

    #[tokio::test]
    async fn absent_target_is_none() {
        let store = MemoryStore::default();
        assert_eq!(load_target(&store, Category::Neet).await.unwrap(), None);
    }

    #[tokio::test]
    async fn admin_sets_target() {
        let store = MemoryStore::default();

        let target = set_target(&store, ADMIN, ADMIN, Category::Neet, "03-05-2026")
            .await
            .unwrap();
        assert_eq!(target, Utc.with_ymd_and_hms(2026, 5, 3, 0, 0, 0).unwrap());
        assert_eq!(store.writes(), 1);

        assert_eq!(
            load_target(&store, Category::Neet).await.unwrap(),
            Some(target)
        );
        assert_eq!(load_target(&store, Category::Jee).await.unwrap(), None);

        // Last write wins.
        set_target(&store, ADMIN, ADMIN, Category::Neet, "10-05-2026")
            .await
            .unwrap();
        assert_eq!(
            load_target(&store, Category::Neet).await.unwrap(),
            Some(Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn unauthorized_never_writes() {
        let store = MemoryStore::default();

        for input in ["03-05-2026", "31-04-2025", "garbage"] {
            let res = set_target(&store, ADMIN, UserId(7), Category::Jee, input).await;
            assert!(matches!(res, Err(SetTargetError::Unauthorized)));
        }
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn malformed_date_never_writes() {
        let store = MemoryStore::default();

        let res = set_target(&store, ADMIN, ADMIN, Category::Jee, "2026-05-03").await;
        assert!(matches!(res, Err(SetTargetError::Date(DateParseError::Format(_)))));

        let res = set_target(&store, ADMIN, ADMIN, Category::Jee, "31-04-2025").await;
        assert!(matches!(
            res,
            Err(SetTargetError::Date(DateParseError::InvalidDate(_)))
        ));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn malformed_stored_value_is_error() {
        let store = MemoryStore::default();
        store.set("countdowns/neet", "soon").await.unwrap();
        assert!(load_target(&store, Category::Neet).await.is_err());
    }

    #[test]
    fn key_validation() {
        assert!(ensure_key("countdowns/neet").is_ok());
        assert!(ensure_key("").is_err());
        assert!(ensure_key("/countdowns").is_err());
        assert!(ensure_key("countdowns/").is_err());
    }
}
