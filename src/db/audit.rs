//! Append-only audit log and publish run records.

use chrono::Utc;
use rusqlite::Result as SqliteResult;

use super::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishRunStatus {
    Success,
    Error,
}

impl PublishRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishRunStatus::Success => "success",
            PublishRunStatus::Error => "error",
        }
    }
}

impl Database {
    /// Record an administrative action.
    pub fn record_audit(
        &self,
        user: &str,
        action: &str,
        target_path: Option<&str>,
        details: serde_json::Value,
    ) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO audit_logs (ts, user, action, target_path, details_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                Utc::now().to_rfc3339(),
                user,
                action,
                target_path,
                details.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Record one publish attempt. Rows are never mutated after insertion.
    pub fn record_publish_run(
        &self,
        status: PublishRunStatus,
        commit_hash: Option<&str>,
        output: Option<&str>,
        error: Option<&str>,
    ) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO publish_runs (ts, status, commit_hash, output, error)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                Utc::now().to_rfc3339(),
                status.as_str(),
                commit_hash,
                output,
                error,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_audit() {
        let db = Database::open_in_memory().unwrap();
        db.record_audit(
            "admin",
            "content.create",
            Some("/blog/content/notes/x.md"),
            serde_json::json!({"id": "note/x.md"}),
        )
        .unwrap();

        let conn = db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM audit_logs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_record_publish_runs() {
        let db = Database::open_in_memory().unwrap();
        db.record_publish_run(PublishRunStatus::Success, Some("abc123"), Some("out"), None)
            .unwrap();
        db.record_publish_run(PublishRunStatus::Error, None, None, Some("push failed"))
            .unwrap();

        let conn = db.conn.lock().unwrap();
        let (status, hash): (String, Option<String>) = conn
            .query_row(
                "SELECT status, commit_hash FROM publish_runs ORDER BY id LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(status, "success");
        assert_eq!(hash.as_deref(), Some("abc123"));

        let errors: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM publish_runs WHERE status = 'error'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(errors, 1);
    }
}
