// Core structs: SalesRecord, SalesTable, analysis results and error types
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// One reporting period of sales for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_id: String,
    pub timestamp: NaiveDate,
    pub units_sold: f64,
}

impl SalesRecord {
    pub fn new(product_id: impl Into<String>, timestamp: NaiveDate, units_sold: f64) -> Self {
        Self {
            product_id: product_id.into(),
            timestamp,
            units_sold,
        }
    }
}

/// Normalized, read-only sales table shared between analyses.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct product ids, sorted.
    pub fn product_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.iter().map(|r| r.product_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Copies out the rows of one product, in table order.
    pub fn series_for(&self, product_id: &str) -> Vec<SalesRecord> {
        self.records
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityResult {
    pub seasonality_score: f64,
    pub seasonal_strength: f64,
    pub is_seasonal: bool,
    /// Up to three months, highest mean first.
    pub peak_months: Vec<u32>,
    /// Up to three months, lowest mean first.
    pub low_months: Vec<u32>,
    pub monthly_means: BTreeMap<u32, f64>,
    pub months_observed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendStrength::Strong => "STRONG",
            TrendStrength::Moderate => "MODERATE",
            TrendStrength::Weak => "WEAK",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Rising,
    Declining,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Rising => "RISING",
            TrendDirection::Declining => "DECLINING",
            TrendDirection::Stable => "STABLE",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Units per period.
    pub slope: f64,
    pub r_squared: f64,
    pub recent_slope: f64,
    pub recent_r_squared: f64,
    pub total_change_pct: f64,
    pub strength: TrendStrength,
    pub direction: TrendDirection,
    pub points: usize,
    pub first_value: f64,
    pub last_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    RisingStar,
    FadingOut,
    SeasonalHero,
    Evergreen,
    RandomErratic,
    DecliningSeasonal,
    Stable,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::RisingStar,
        Category::FadingOut,
        Category::SeasonalHero,
        Category::Evergreen,
        Category::RandomErratic,
        Category::DecliningSeasonal,
        Category::Stable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::RisingStar => "RISING_STAR",
            Category::FadingOut => "FADING_OUT",
            Category::SeasonalHero => "SEASONAL_HERO",
            Category::Evergreen => "EVERGREEN",
            Category::RandomErratic => "RANDOM_ERRATIC",
            Category::DecliningSeasonal => "DECLINING_SEASONAL",
            Category::Stable => "STABLE",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f64,
    pub insight: String,
}

/// Combined output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub product_id: String,
    pub seasonality: SeasonalityResult,
    pub trend: TrendResult,
    pub classification: ClassificationResult,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("product not found: {0}")]
    ProductNotFound(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("division by zero: {0}")]
    DivisionByZero(String),
    /// The worker thread running the analysis crashed before returning.
    #[error("analysis worker failed: {0}")]
    WorkerFailed(String),
}

impl AnalysisError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            AnalysisError::InsufficientData(_) => "INSUFFICIENT_DATA",
            AnalysisError::DivisionByZero(_) => "DIVISION_BY_ZERO",
            AnalysisError::WorkerFailed(_) => "WORKER_FAILED",
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    InvalidResponse(u16),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid {field} value '{value}'")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("report encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}
