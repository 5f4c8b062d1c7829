// Analyzer module: seasonality, trend and the classifier that combines them.

pub mod stats;
pub mod seasonality;
pub mod trend;
pub mod classifier;

pub use seasonality::SeasonalityAnalyzer;
pub use trend::TrendAnalyzer;
pub use classifier::Classifier;
