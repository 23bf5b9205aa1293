//! Shared test infrastructure.
//!
//! - HTML fixture builders for roster parsing and import tests
//! - `setup_test_db()` for the PostgreSQL-backed tests. Each call gets its own
//!   schema so tests can run in parallel; it returns `None` when
//!   `DATABASE_URL` is not set and those tests skip themselves.

#![allow(dead_code)]

use rand::Rng;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use chapelle::models::roster::{ParsedRoster, RosterRow};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";

/// Pinned "current year" so plausibility checks do not drift with the calendar.
pub const THIS_YEAR: i32 = 2024;

// ============================================================================
// HTML FIXTURES
// ============================================================================

/// Build a pasted roster: `<h2>{title}</h2>` followed by a table.
pub fn roster_html(title: &str, headers: &[&str], rows: &[Vec<&str>]) -> String {
    let mut html = format!("<h2>{title}</h2>\n<table>\n<tr>");
    for h in headers {
        html.push_str(&format!("<th>{h}</th>"));
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{cell}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>");
    html
}

/// The March 2024 roster used across tests: four Sundays, three roles.
pub fn march_2024_html() -> String {
    roster_html(
        "Planning Mars 2024",
        &["Date", "Présidence", "Prédicateur", "Musique"],
        &[
            vec!["3 mars", "Jean", "Paul", "Marie"],
            vec!["10 mars", "Luc", "Pierre", ""],
            vec!["17 mars", "Jean", "Paul", "Anne"],
            vec!["24 mars", "Marc", "Étienne", "Marie"],
        ],
    )
}

/// A valid parsed roster with `n` rows, without going through the parser.
pub fn parsed_roster(month: u32, year: i32, n: usize) -> ParsedRoster {
    ParsedRoster {
        title: format!("Planning {month}/{year}"),
        month,
        year,
        rows: (1..=n)
            .map(|day| {
                let mut row = RosterRow::new(format!("{day}"));
                row.presidence = Some(format!("Présidence {day}"));
                row
            })
            .collect(),
    }
}

// ============================================================================
// DATABASE SETUP
// ============================================================================

pub struct TestDb {
    pool: PgPool,
    schema: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Drop the per-test schema. Call at the end of a test.
    pub async fn teardown(self) {
        let admin = self.pool.clone();
        sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
            .execute(&admin)
            .await
            .ok();
        admin.close().await;
    }
}

/// Connect to `DATABASE_URL`, create a private schema and run migrations in it.
///
/// Returns `None` (and the caller should return early) when no database is configured.
pub async fn setup_test_db() -> Option<TestDb> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set; skipping database test");
            return None;
        }
    };

    let suffix: u64 = rand::rng().random();
    let schema = format!("test_{suffix:016x}");

    let bootstrap = PgPool::connect(&url).await.expect("Failed to connect to test DB");
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&bootstrap)
        .await
        .expect("Failed to create test schema");
    bootstrap.close().await;

    let options: PgConnectOptions = url.parse().expect("Invalid DATABASE_URL");
    let options = options.options([("search_path", schema.as_str())]);
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .expect("Failed to open test pool");

    chapelle::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(TestDb { pool, schema })
}
