//! SQLite-backed store for student records.
//!
//! Owns the `students` table, its uniqueness constraints, and all id and
//! timestamp management. Schema initialization runs on every connect and
//! is idempotent. The table-level UNIQUE constraints are the backstop for
//! the service-level uniqueness pre-check: when two concurrent writes
//! carry the same email or id number, the first one wins and the loser
//! surfaces as [`RegistryError::Conflict`], never as a generic failure.

use std::path::Path;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::models::{Student, StudentFields};

/// Message for conflicts detected by the unique constraint itself.
const BACKSTOP_CONFLICT: &str = "Email or ID number already in use";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    surname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL,
    id_number TEXT NOT NULL UNIQUE,
    course TEXT NOT NULL,
    address TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Cloneable handle over the connection pool.
#[derive(Clone)]
pub struct StudentStore {
    pool: SqlitePool,
}

impl StudentStore {
    /// Open the database file, creating it if missing, and make sure the
    /// schema exists. Safe to call on every process start.
    pub async fn connect(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory database (for testing). A single connection so
    /// every query sees the same database.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        info!("students schema ready");
        Ok(())
    }

    /// Insert a new record; the store assigns the id and sets both
    /// timestamps to the same instant.
    pub async fn insert(&self, fields: &StudentFields) -> Result<Student> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, surname, email, phone, id_number, course, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, surname, email, phone, id_number, course, address, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.surname)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.id_number)
        .bind(&fields.course)
        .bind(&fields.address)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        result.map_err(map_unique_violation)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, surname, email, phone, id_number, course, address, created_at, updated_at
            FROM students
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, surname, email, phone, id_number, course, address, created_at, updated_at
            FROM students
            ORDER BY datetime(created_at) DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Records whose name, surname, email, or id number contains `query`
    /// as a case-insensitive substring, newest first. LIKE wildcards in
    /// the query are escaped so they match literally.
    pub async fn search(&self, query: &str) -> Result<Vec<Student>> {
        let like = format!("%{}%", escape_like(query));
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, surname, email, phone, id_number, course, address, created_at, updated_at
            FROM students
            WHERE name LIKE ? ESCAPE '\'
               OR surname LIKE ? ESCAPE '\'
               OR email LIKE ? ESCAPE '\'
               OR id_number LIKE ? ESCAPE '\'
            ORDER BY datetime(created_at) DESC, id DESC
            "#,
        )
        .bind(&like)
        .bind(&like)
        .bind(&like)
        .bind(&like)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Whole-record replace of all mutable columns; `updated_at` moves to
    /// now. Returns `None` when no row has that id.
    pub async fn update(&self, id: i64, fields: &StudentFields) -> Result<Option<Student>> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET name = ?, surname = ?, email = ?, phone = ?, id_number = ?, course = ?, address = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, surname, email, phone, id_number, course, address, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.surname)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.id_number)
        .bind(&fields.course)
        .bind(&fields.address)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        result.map_err(map_unique_violation)
    }

    /// Returns false when no row had that id.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Uniqueness pre-check: does any record (other than `exclude_id`, if
    /// given) already use this email or id number?
    pub async fn conflict_exists(
        &self,
        email: &str,
        id_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let row = match exclude_id {
            Some(id) => {
                sqlx::query("SELECT 1 FROM students WHERE (email = ? OR id_number = ?) AND id != ?")
                    .bind(email)
                    .bind(id_number)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT 1 FROM students WHERE email = ? OR id_number = ?")
                    .bind(email)
                    .bind(id_number)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(row.is_some())
    }
}

fn map_unique_violation(err: sqlx::Error) -> RegistryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RegistryError::Conflict(BACKSTOP_CONFLICT.to_owned());
        }
    }
    err.into()
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
