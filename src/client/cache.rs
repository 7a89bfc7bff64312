//! SQLite-backed cache of archive responses, keyed by request URL.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub body: String,
    pub fetched_at: i64,
}

impl CachedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct ResponseCache {
    conn: Connection,
    expire_after: Option<Duration>,
}

impl ResponseCache {
    /// Open (or create) the cache file. `expire_after = None` keeps entries forever.
    pub fn open<P: AsRef<Path>>(path: P, expire_after: Option<Duration>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let cache = Self { conn, expire_after };
        cache.init_schema()?;
        Ok(cache)
    }

    pub fn in_memory(expire_after: Option<Duration>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn, expire_after };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                status INTEGER NOT NULL,
                body TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Fresh entry for `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        let entry = self
            .conn
            .query_row(
                "SELECT status, body, fetched_at FROM responses WHERE key = ?1",
                params![key],
                |row| {
                    Ok(CachedResponse {
                        status: row.get(0)?,
                        body: row.get(1)?,
                        fetched_at: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(entry.filter(|e| !self.is_expired(e.fetched_at, Utc::now().timestamp())))
    }

    pub fn store(&self, key: &str, status: u16, body: &str) -> Result<()> {
        self.store_at(key, status, body, Utc::now().timestamp())
    }

    fn store_at(&self, key: &str, status: u16, body: &str, fetched_at: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (key, status, body, fetched_at) VALUES (?1, ?2, ?3, ?4)",
            params![key, status, body, fetched_at],
        )?;
        Ok(())
    }

    /// Delete expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let Some(expire_after) = self.expire_after else {
            return Ok(0);
        };
        let cutoff = Utc::now().timestamp() - expire_after.as_secs() as i64;
        let removed = self
            .conn
            .execute("DELETE FROM responses WHERE fetched_at < ?1", params![cutoff])?;
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn is_expired(&self, fetched_at: i64, now: i64) -> bool {
        match self.expire_after {
            None => false,
            Some(expire_after) => now - fetched_at > expire_after.as_secs() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_and_get() {
        let cache = ResponseCache::in_memory(None).unwrap();
        assert!(cache.is_empty().unwrap());

        cache.store("https://example.test/a", 200, "{}").unwrap();

        let entry = cache.get("https://example.test/a").unwrap().unwrap();
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body, "{}");
        assert!(cache.get("https://example.test/b").unwrap().is_none());
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_success_status() {
        let cache = ResponseCache::in_memory(None).unwrap();
        cache.store("ok", 200, "{}").unwrap();
        cache.store("bad", 502, "Bad Gateway").unwrap();

        assert!(cache.get("ok").unwrap().unwrap().is_success());
        assert!(!cache.get("bad").unwrap().unwrap().is_success());
    }

    #[test]
    fn test_store_replaces_entry() {
        let cache = ResponseCache::in_memory(None).unwrap();
        cache.store("k", 200, "old").unwrap();
        cache.store("k", 200, "new").unwrap();

        assert_eq!(cache.get("k").unwrap().unwrap().body, "new");
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_never_expires_without_limit() {
        let cache = ResponseCache::in_memory(None).unwrap();
        cache.store_at("k", 200, "body", 0).unwrap();

        assert!(cache.get("k").unwrap().is_some());
        assert_eq!(cache.purge_expired().unwrap(), 0);
    }

    #[test]
    fn test_expired_entries_are_ignored_and_purged() {
        let cache = ResponseCache::in_memory(Some(Duration::from_secs(60))).unwrap();
        let now = Utc::now().timestamp();
        cache.store_at("old", 200, "stale", now - 3600).unwrap();
        cache.store_at("new", 200, "fresh", now).unwrap();

        assert!(cache.get("old").unwrap().is_none());
        assert!(cache.get("new").unwrap().is_some());

        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_persists_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(".cache.sqlite");

        {
            let cache = ResponseCache::open(&path, None).unwrap();
            cache.store("k", 200, "kept").unwrap();
        }

        let reopened = ResponseCache::open(&path, None).unwrap();
        assert_eq!(reopened.get("k").unwrap().unwrap().body, "kept");
    }
}
