use sales_profiler::config::{load_config, AppConfig};
use sales_profiler::model::{AnalysisError, ProductReport, SalesTable};
use sales_profiler::parser::{CsvSalesParser, Parser};
use sales_profiler::pipeline::run_batch;
use sales_profiler::sample;
use sales_profiler::source::{source_for, FileSource};
use sales_profiler::storage::SqliteStorage;
use sales_profiler::utils::is_url;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());

    // Load configuration from file
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config load error ({}): {}", config_path, e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    if let Err(e) = run(config).await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    ensure_sample_data(&config).await?;

    let source = source_for(&config.data_source)?;
    let parser = CsvSalesParser::new();
    let text = source.fetch().await?;
    let table = Arc::new(parser.parse(&text)?);

    let all_products = table.product_ids();
    info!(
        "Data loaded: {} records, {} products from {}",
        table.len(),
        all_products.len(),
        source.location()
    );

    let products = if config.products.is_empty() {
        all_products
    } else {
        config.products.clone()
    };
    info!("Products to analyze: {}", products.len());

    let mut results = run_batch(Arc::clone(&table), &products).await;
    results.sort_by(|a, b| a.0.cmp(&b.0));

    let storage = SqliteStorage::new(&config.db_path)?;
    for (product_id, result) in &results {
        match result {
            Ok(report) => record_report(&storage, report),
            Err(e) => warn!("{}: skipped ({})", product_id, e.kind()),
        }
    }

    info!("Portfolio summary:");
    for (category, count) in storage.category_counts()? {
        info!("  {}: {}", category, count);
    }

    if let Some(path) = &config.output_path {
        write_output(path, &table, &results).await?;
    }

    Ok(())
}

/// Writes demo data when the configured file does not exist yet.
async fn ensure_sample_data(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if is_url(&config.data_source) || !config.generate_sample_if_missing {
        return Ok(());
    }
    let file = FileSource::new(&config.data_source);
    if file.exists() {
        return Ok(());
    }

    warn!("Data file not found: {}. Creating sample data...", config.data_source);
    let seed = config.sample_seed.unwrap_or(sample::DEFAULT_SEED);
    let records = sample::generate(seed, sample::default_start(), sample::DEFAULT_WEEKS);
    tokio::fs::write(&config.data_source, sample::to_csv(&records)?).await?;
    info!("Sample data created: {} ({} records)", config.data_source, records.len());
    Ok(())
}

/// Logs the result against the previous run and stores it.
fn record_report(storage: &SqliteStorage, report: &ProductReport) {
    let category = report.classification.category;
    match storage.get_report(&report.product_id) {
        Ok(Some(prev)) if prev.report.classification.category != category => {
            info!(
                "{}: category changed {} -> {} (previous run {})",
                report.product_id, prev.report.classification.category, category, prev.analyzed_at
            );
        }
        Ok(_) => {}
        Err(e) => warn!("Previous report lookup failed: {}", e),
    }

    info!(
        "{}: slope {:.3} (r2 {:.3}, {}), seasonality {:.3}{}, change {:+.1}%",
        report.product_id,
        report.trend.slope,
        report.trend.r_squared,
        report.trend.strength,
        report.seasonality.seasonality_score,
        if report.seasonality.is_seasonal { " seasonal" } else { "" },
        report.trend.total_change_pct,
    );

    if let Err(e) = storage.save_report(report) {
        warn!("Report save failed: {}", e);
    }
}

async fn write_output(
    path: &str,
    table: &SalesTable,
    results: &[(String, Result<ProductReport, AnalysisError>)],
) -> Result<(), Box<dyn std::error::Error>> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|(product_id, result)| match result {
            Ok(report) => json!({ "product_id": product_id, "report": report }),
            Err(e) => json!({
                "product_id": product_id,
                "error": e.kind(),
                "message": e.to_string(),
            }),
        })
        .collect();

    let payload = json!({
        "records": table.len(),
        "products": entries,
    });
    tokio::fs::write(path, serde_json::to_string_pretty(&payload)?).await?;
    info!("Report written to {}", path);
    Ok(())
}
