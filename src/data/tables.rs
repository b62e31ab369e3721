//! Plan, rate and benefit tables

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::open_reader;
use crate::errors::CoverwiseError;
use crate::errors::Result;
use crate::models::BenefitRecord;
use crate::models::PlanRecord;
use crate::models::RateRecord;
use crate::plans::base_plan_id;
use crate::plans::coverage::DEFAULT_INDIVIDUAL_RATE;
use crate::plans::CoverageRule;

const DEFAULT_METAL_LEVEL: &str = "Bronze";
const DEFAULT_PLAN_TYPE: &str = "HMO";
const RATE_COLUMN: &str = "IndividualRate";

/// One row of the rate table as published
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRate {
    pub plan_id: String,
    pub age: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub individual_rate: Option<f64>,
}

pub fn load_plans(path: &Path) -> Result<Vec<PlanRecord>> {
    let plans: Vec<PlanRecord> = read_csv(path)?;
    info!("Loaded {} plan variants from {}", plans.len(), path.display());
    Ok(plans)
}

pub fn load_benefits(path: &Path) -> Result<Vec<BenefitRecord>> {
    let benefits: Vec<BenefitRecord> = read_csv(path)?;
    info!("Loaded {} benefit rows from {}", benefits.len(), path.display());
    Ok(benefits)
}

/// Load the rate table and attach predicted coverage
pub fn load_rates(
    path: &Path,
    plans: &[PlanRecord],
    rule: &dyn CoverageRule,
) -> Result<Vec<RateRecord>> {
    let mut reader = csv_reader(path)?;
    let has_rate_column = reader.headers()?.iter().any(|h| h == RATE_COLUMN);
    let raw: Vec<RawRate> = read_rows(path, &mut reader)?;
    let rates = build_rates(raw, plans, rule, has_rate_column);
    info!("Loaded {} rate rows from {}", rates.len(), path.display());
    Ok(rates)
}

/// Resolve metal level and plan type from the plan table and predict
/// coverage for every rate row.
///
/// Each rate takes its attributes from the first plan variant sharing its
/// base plan id. Rates with no such plan fall back to Bronze / HMO.
///
/// Without an `IndividualRate` column every row is priced at
/// [`DEFAULT_INDIVIDUAL_RATE`]. With the column, rows whose premium is blank,
/// unparseable or not finite are dropped.
#[must_use]
pub fn build_rates(
    raw: Vec<RawRate>,
    plans: &[PlanRecord],
    rule: &dyn CoverageRule,
    has_rate_column: bool,
) -> Vec<RateRecord> {
    let mut by_base: HashMap<&str, &PlanRecord> = HashMap::new();
    for plan in plans {
        if let Some(base) = base_plan_id(&plan.plan_id) {
            by_base.entry(base).or_insert(plan);
        }
    }

    let total = raw.len();
    let rates: Vec<RateRecord> = raw
        .into_iter()
        .filter_map(|row| {
            let individual_rate = if has_rate_column {
                row.individual_rate.filter(|r| r.is_finite())?
            } else {
                DEFAULT_INDIVIDUAL_RATE
            };
            let plan = by_base.get(row.plan_id.as_str());
            let metal_level = plan
                .and_then(|p| p.metal_level.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_METAL_LEVEL.to_string());
            let plan_type = plan
                .map(|p| p.plan_type.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_PLAN_TYPE.to_string());

            Some(RateRecord {
                predicted_coverage: rule.predict(individual_rate),
                plan_id: row.plan_id,
                age: row.age,
                individual_rate,
                metal_level,
                plan_type,
            })
        })
        .collect();

    if !has_rate_column && total > 0 {
        warn!(
            "Rate table has no {} column; pricing {} rows at {}",
            RATE_COLUMN, total, DEFAULT_INDIVIDUAL_RATE
        );
    }
    let dropped = total - rates.len();
    if dropped > 0 {
        warn!("Dropped {} rate rows with a missing or invalid {}", dropped, RATE_COLUMN);
    }
    rates
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv_reader(path)?;
    read_rows(path, &mut reader)
}

fn csv_reader(path: &Path) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader = open_reader(path)?;
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader))
}

fn read_rows<T: DeserializeOwned>(path: &Path, reader: &mut csv::Reader<Box<dyn Read>>) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for (line, record) in reader.deserialize().enumerate() {
        let row: T = record.map_err(|e| {
            CoverwiseError::DataError(format!(
                "{} row {}: {e}",
                path.display(),
                line + 2
            ))
        })?;
        rows.push(row);
    }
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
