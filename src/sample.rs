// Synthetic weekly sales for trying the profiler without real data.
use crate::model::{ParserError, SalesRecord};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

pub const DEFAULT_WEEKS: usize = 104;
pub const DEFAULT_SEED: u64 = 42;

pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 2).unwrap_or_default()
}

/// Three products with distinct shapes: a steady riser, a stable product
/// with a mild wave, and a strongly seasonal one.
pub fn generate(seed: u64, start: NaiveDate, weeks: usize) -> Vec<SalesRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(weeks * 3);

    for product in ["GlowCandle_X", "ClassicMug_Y", "RoseBox_Z"] {
        for i in 0..weeks {
            let t = i as f64;
            let base = match product {
                "GlowCandle_X" => 20.0 + t * 0.5 + gaussian(&mut rng, 5.0),
                "ClassicMug_Y" => 50.0 + (t / 8.0).sin() * 10.0 + gaussian(&mut rng, 8.0),
                _ => 30.0 + (t / 26.0).sin() * 20.0 + gaussian(&mut rng, 10.0),
            };
            let units = base.trunc().max(1.0);
            let date = start + Duration::weeks(i as i64);
            records.push(SalesRecord::new(product, date, units));
        }
    }

    records
}

/// Writes records in the raw export layout (`Product,Date,Units_Sold`).
pub fn to_csv(records: &[SalesRecord]) -> Result<String, ParserError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Product", "Date", "Units_Sold"])?;
    for r in records {
        writer.write_record([
            r.product_id.clone(),
            r.timestamp.format("%Y-%m-%d").to_string(),
            r.units_sold.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ParserError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// Box-Muller transform.
fn gaussian(rng: &mut StdRng, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * std_dev
}
