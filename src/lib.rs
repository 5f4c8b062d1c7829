pub mod analyzer;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod sample;
pub mod source;
pub mod storage;
pub mod utils;

pub use model::{
    AnalysisError, Category, ClassificationResult, ProductReport, SalesRecord, SalesTable,
    SeasonalityResult, TrendDirection, TrendResult, TrendStrength,
};
pub use pipeline::{run_batch, PipelineRunner};
