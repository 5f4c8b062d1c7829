use crate::model::{Category, ProductReport, StorageError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

/// A report as persisted, with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub report: ProductReport,
    pub analyzed_at: DateTime<Utc>,
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and creates the schema if needed.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS product_reports (
                product_id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                confidence REAL NOT NULL,
                seasonality_score REAL NOT NULL,
                slope REAL NOT NULL,
                r_squared REAL NOT NULL,
                report_json TEXT NOT NULL,
                analyzed_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self { conn })
    }

    /// Inserts or replaces the latest report for a product.
    pub fn save_report(&self, report: &ProductReport) -> Result<(), StorageError> {
        self.save_report_at(report, Utc::now())
    }

    pub fn save_report_at(&self, report: &ProductReport, analyzed_at: DateTime<Utc>) -> Result<(), StorageError> {
        let json = serde_json::to_string(report)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO product_reports (
                product_id, category, confidence, seasonality_score,
                slope, r_squared, report_json, analyzed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &report.product_id,
                report.classification.category.as_str(),
                report.classification.confidence,
                report.seasonality.seasonality_score,
                report.trend.slope,
                report.trend.r_squared,
                json,
                analyzed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Latest stored report for a product, if any.
    pub fn get_report(&self, product_id: &str) -> Result<Option<StoredReport>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT report_json, analyzed_at FROM product_reports WHERE product_id = ?1",
        )?;
        let mut rows = stmt.query(params![product_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::map_report(row)?)),
            None => Ok(None),
        }
    }

    /// All stored reports, ordered by product id.
    pub fn get_all_reports(&self) -> Result<Vec<StoredReport>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT report_json, analyzed_at FROM product_reports ORDER BY product_id ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next()? {
            reports.push(Self::map_report(row)?);
        }
        Ok(reports)
    }

    /// Number of products per category, most common first.
    pub fn category_counts(&self) -> Result<Vec<(Category, usize)>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM product_reports GROUP BY category
             ORDER BY COUNT(*) DESC, category ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let category: String = row.get(0)?;
            let count: usize = row.get(1)?;
            Ok((category, count))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (name, count) = row?;
            let category = Category::parse(&name)
                .ok_or_else(|| StorageError::Corrupt(format!("unknown category '{name}'")))?;
            counts.push((category, count));
        }
        Ok(counts)
    }

    fn map_report(row: &Row) -> Result<StoredReport, StorageError> {
        let json: String = row.get(0)?;
        let analyzed_at_str: String = row.get(1)?;
        let analyzed_at = DateTime::parse_from_rfc3339(&analyzed_at_str)
            .map_err(|e| StorageError::Corrupt(format!("invalid analyzed_at: {e}")))?
            .with_timezone(&Utc);
        Ok(StoredReport {
            report: serde_json::from_str(&json)?,
            analyzed_at,
        })
    }
}
