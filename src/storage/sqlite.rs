//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the JobStore trait.
//! The connection sits behind a mutex that is only held for the duration of a
//! single statement or transaction, never across an `.await`.

use crate::crawler::{BrokenLink, CrawlResult, HeadingCounts, HtmlVersion};
use crate::state::JobStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobStore, StorageError, StorageResult};
use crate::storage::AnalysisJob;
use chrono::{SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const JOB_COLUMNS: &str = "id, url, status, error_message, html_version, page_title,
     h1_count, h2_count, h3_count, h4_count, h5_count, h6_count,
     internal_links, external_links, inaccessible_links, inaccessible_link_details,
     has_login_form, created_at, updated_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Maps a full `JOB_COLUMNS` row to an AnalysisJob
///
/// A stored `html_version` marks the presence of metrics.
fn job_from_row(row: &Row<'_>) -> rusqlite::Result<AnalysisJob> {
    let status_text: String = row.get(2)?;
    let status = JobStatus::from_db_string(&status_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown job status '{}'", status_text).into(),
        )
    })?;

    let html_version: Option<String> = row.get(4)?;

    let metrics = match html_version {
        Some(label) => {
            let details: Option<String> = row.get(15)?;
            let broken_links: Vec<BrokenLink> = match details {
                Some(json) if !json.is_empty() => serde_json::from_str(&json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(15, Type::Text, Box::new(e))
                })?,
                _ => Vec::new(),
            };

            Some(CrawlResult {
                html_version: HtmlVersion::from_label(&label).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        Type::Text,
                        format!("unknown HTML version '{}'", label).into(),
                    )
                })?,
                page_title: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                headings: HeadingCounts {
                    h1: row.get(6)?,
                    h2: row.get(7)?,
                    h3: row.get(8)?,
                    h4: row.get(9)?,
                    h5: row.get(10)?,
                    h6: row.get(11)?,
                },
                internal_links: row.get(12)?,
                external_links: row.get(13)?,
                inaccessible_links: row.get(14)?,
                broken_links,
                has_login_form: row.get::<_, i32>(16)? != 0,
            })
        }
        None => None,
    };

    Ok(AnalysisJob {
        id: row.get(0)?,
        url: row.get(1)?,
        status,
        error_message: row.get(3)?,
        metrics,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}

fn query_job_by_id(conn: &Connection, id: i64) -> StorageResult<Option<AnalysisJob>> {
    let sql = format!("SELECT {} FROM analysis_jobs WHERE id = ?1", JOB_COLUMNS);
    let job = conn
        .query_row(&sql, params![id], job_from_row)
        .optional()?;
    Ok(job)
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl JobStore for SqliteStorage {
    // ===== Lookup =====

    fn find_by_id(&self, id: i64) -> StorageResult<Option<AnalysisJob>> {
        let conn = self.conn()?;
        query_job_by_id(&conn, id)
    }

    fn find_by_url(&self, url: &str) -> StorageResult<Option<AnalysisJob>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM analysis_jobs WHERE url = ?1", JOB_COLUMNS);
        let job = conn
            .query_row(&sql, params![url], job_from_row)
            .optional()?;
        Ok(job)
    }

    fn list_all(&self) -> StorageResult<Vec<AnalysisJob>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM analysis_jobs ORDER BY created_at DESC, id DESC",
            JOB_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let jobs = stmt
            .query_map([], job_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(jobs)
    }

    fn count_by_status(&self, status: JobStatus) -> StorageResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM analysis_jobs WHERE status = ?1",
            params![status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ===== Mutation =====

    fn create(&self, url: &str) -> StorageResult<AnalysisJob> {
        let conn = self.conn()?;
        let now = now();

        conn.execute(
            "INSERT INTO analysis_jobs (url, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![url, JobStatus::Queued.to_db_string(), now],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::DuplicateUrl(url.to_string())
            } else {
                StorageError::Sqlite(e)
            }
        })?;

        let id = conn.last_insert_rowid();
        query_job_by_id(&conn, id)?.ok_or(StorageError::JobNotFound(id))
    }

    fn save(&self, job: &AnalysisJob) -> StorageResult<()> {
        let metrics = job.metrics.as_ref();
        let details = match metrics {
            Some(result) if !result.broken_links.is_empty() => {
                Some(serde_json::to_string(&result.broken_links)?)
            }
            _ => None,
        };
        let headings = metrics.map(|m| m.headings).unwrap_or_default();

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE analysis_jobs SET url = ?1, status = ?2, error_message = ?3,
             html_version = ?4, page_title = ?5,
             h1_count = ?6, h2_count = ?7, h3_count = ?8, h4_count = ?9, h5_count = ?10, h6_count = ?11,
             internal_links = ?12, external_links = ?13, inaccessible_links = ?14,
             inaccessible_link_details = ?15, has_login_form = ?16, updated_at = ?17
             WHERE id = ?18",
            params![
                job.url,
                job.status.to_db_string(),
                job.error_message,
                metrics.map(|m| m.html_version.label()),
                metrics.map(|m| m.page_title.as_str()),
                headings.h1,
                headings.h2,
                headings.h3,
                headings.h4,
                headings.h5,
                headings.h6,
                metrics.map(|m| m.internal_links).unwrap_or(0),
                metrics.map(|m| m.external_links).unwrap_or(0),
                metrics.map(|m| m.inaccessible_links).unwrap_or(0),
                details,
                metrics.map(|m| m.has_login_form).unwrap_or(false),
                now(),
                job.id,
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::JobNotFound(job.id));
        }

        Ok(())
    }

    fn delete(&self, ids: &[i64]) -> StorageResult<u64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut removed = 0u64;
        {
            let mut stmt = tx.prepare("DELETE FROM analysis_jobs WHERE id = ?1")?;
            for id in ids {
                removed += stmt.execute(params![id])? as u64;
            }
        }

        tx.commit()?;
        Ok(removed)
    }

    // ===== Atomic Transitions =====

    fn try_transition(&self, id: i64, from: JobStatus, to: JobStatus) -> StorageResult<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE analysis_jobs SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
            params![to.to_db_string(), now(), id, from.to_db_string()],
        )?;
        Ok(updated == 1)
    }

    fn requeue(&self, id: i64) -> StorageResult<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE analysis_jobs SET status = ?1, error_message = NULL,
             html_version = NULL, page_title = NULL,
             h1_count = 0, h2_count = 0, h3_count = 0, h4_count = 0, h5_count = 0, h6_count = 0,
             internal_links = 0, external_links = 0, inaccessible_links = 0,
             inaccessible_link_details = NULL, has_login_form = 0, updated_at = ?2
             WHERE id = ?3 AND status IN (?4, ?5)",
            params![
                JobStatus::Queued.to_db_string(),
                now(),
                id,
                JobStatus::Done.to_db_string(),
                JobStatus::Error.to_db_string(),
            ],
        )?;
        Ok(updated == 1)
    }
}
