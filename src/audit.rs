//! Audit logging — hash-chained ledger of all tool executions

use anyhow::Result;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::info;

/// Hash-chained audit ledger stored in SQLite
pub struct AuditLog {
    conn: Connection,
    last_hash: String,
}

impl AuditLog {
    pub fn new(db_path: &str) -> Result<Self> {
        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                execution_id TEXT NOT NULL,
                tool_name TEXT NOT NULL,
                session_id TEXT NOT NULL,
                reason TEXT NOT NULL,
                success INTEGER NOT NULL,
                duration_ms INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                prev_hash TEXT NOT NULL,
                hash TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_audit_tool ON audit_log(tool_name);
            CREATE INDEX IF NOT EXISTS idx_audit_session ON audit_log(session_id);
            CREATE INDEX IF NOT EXISTS idx_audit_time ON audit_log(timestamp);",
        )?;

        // Load last hash for chain continuity
        let last_hash = conn
            .query_row(
                "SELECT hash FROM audit_log ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .unwrap_or_else(|_| "genesis".to_string());

        Ok(Self { conn, last_hash })
    }

    /// Record an audit entry with hash chaining
    pub fn record(
        &mut self,
        execution_id: &str,
        tool_name: &str,
        session_id: &str,
        reason: &str,
        success: bool,
        duration_ms: i64,
    ) {
        let timestamp = chrono::Utc::now().to_rfc3339();

        // Hash: SHA256(prev_hash + execution_id + tool_name + session_id + timestamp)
        let mut hasher = Sha256::new();
        hasher.update(&self.last_hash);
        hasher.update(execution_id);
        hasher.update(tool_name);
        hasher.update(session_id);
        hasher.update(&timestamp);
        let hash = format!("{:x}", hasher.finalize());

        let result = self.conn.execute(
            "INSERT INTO audit_log (execution_id, tool_name, session_id, reason, success, duration_ms, timestamp, prev_hash, hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                execution_id,
                tool_name,
                session_id,
                reason,
                success as i32,
                duration_ms,
                timestamp,
                &self.last_hash,
                &hash,
            ],
        );

        match result {
            Ok(_) => {
                self.last_hash = hash;
                info!(
                    "Audit: tool={tool_name} session={session_id} success={success} duration={duration_ms}ms"
                );
            }
            Err(e) => {
                tracing::error!("Failed to write audit log: {e}");
            }
        }
    }

    /// Number of recorded entries
    pub fn entry_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Verify the audit chain integrity
    pub fn verify_chain(&self) -> Result<bool> {
        let mut stmt = self.conn.prepare(
            "SELECT execution_id, tool_name, session_id, timestamp, prev_hash, hash FROM audit_log ORDER BY id ASC",
        )?;

        let mut expected_prev = "genesis".to_string();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        for row in rows {
            let (exec_id, tool_name, session_id, timestamp, prev_hash, stored_hash) = row?;

            if prev_hash != expected_prev {
                return Ok(false);
            }

            let mut hasher = Sha256::new();
            hasher.update(&prev_hash);
            hasher.update(&exec_id);
            hasher.update(&tool_name);
            hasher.update(&session_id);
            hasher.update(&timestamp);
            let computed = format!("{:x}", hasher.finalize());

            if computed != stored_hash {
                return Ok(false);
            }

            expected_prev = stored_hash;
        }

        Ok(true)
    }
}
