//! Session row operations.
//!
//! A session exists from login until it is revoked or its expiry passes.
//! Expired rows are not garbage-collected; they simply never validate.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Result as SqliteResult};
use uuid::Uuid;

use super::Database;

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub token_hash: String,
}

impl Database {
    /// Insert a session for a freshly issued token.
    pub fn create_session(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> SqliteResult<SessionRow> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO sessions (id, created_at, expires_at, revoked_at, token_hash)
             VALUES (?1, ?2, ?3, NULL, ?4)",
            [
                &id,
                &created_at.to_rfc3339(),
                &expires_at.to_rfc3339(),
                &token_hash.to_string(),
            ],
        )?;

        Ok(SessionRow {
            id,
            created_at,
            expires_at,
            revoked_at: None,
            token_hash: token_hash.to_string(),
        })
    }

    /// Look up a session by token digest. Returns the row regardless of
    /// validity; revocation and expiry are judged by the caller.
    pub fn get_session_by_token_hash(&self, token_hash: &str) -> SqliteResult<Option<SessionRow>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, created_at, expires_at, revoked_at, token_hash
             FROM sessions WHERE token_hash = ?1",
            [token_hash],
            |row| {
                let created_at: String = row.get(1)?;
                let expires_at: String = row.get(2)?;
                let revoked_at: Option<String> = row.get(3)?;
                Ok(SessionRow {
                    id: row.get(0)?,
                    created_at: parse_ts(&created_at),
                    expires_at: parse_ts(&expires_at),
                    revoked_at: revoked_at.as_deref().map(parse_ts),
                    token_hash: row.get(4)?,
                })
            },
        )
        .optional()
    }

    /// Mark a session revoked (logout). Once set, the session is
    /// permanently invalid.
    pub fn revoke_session(&self, token_hash: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let rows = conn.execute(
            "UPDATE sessions SET revoked_at = ?1 WHERE token_hash = ?2",
            [&now, &token_hash.to_string()],
        )?;
        Ok(rows > 0)
    }
}

fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_and_lookup_session() {
        let db = Database::open_in_memory().unwrap();
        let expires_at = Utc::now() + Duration::hours(8);

        let created = db.create_session("abc123", expires_at).unwrap();
        assert!(created.revoked_at.is_none());

        let found = db.get_session_by_token_hash("abc123").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.expires_at.timestamp(), expires_at.timestamp());

        assert!(db.get_session_by_token_hash("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_token_hash_rejected() {
        let db = Database::open_in_memory().unwrap();
        let expires_at = Utc::now() + Duration::hours(8);

        db.create_session("same-hash", expires_at).unwrap();
        assert!(db.create_session("same-hash", expires_at).is_err());
    }

    #[test]
    fn test_revoke_session() {
        let db = Database::open_in_memory().unwrap();
        let expires_at = Utc::now() + Duration::hours(8);
        db.create_session("abc123", expires_at).unwrap();

        assert!(db.revoke_session("abc123").unwrap());
        let row = db.get_session_by_token_hash("abc123").unwrap().unwrap();
        assert!(row.revoked_at.is_some());

        assert!(!db.revoke_session("missing").unwrap());
    }
}
