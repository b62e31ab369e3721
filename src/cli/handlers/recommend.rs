//! Recommend command handler

use std::sync::Arc;

use tracing::warn;

use super::build_search_engine;
use crate::advisor::Catalog;
use crate::advisor::PlanAdvisor;
use crate::cli::output::print_recommendation;
use crate::cli::output::print_warning;
use crate::models::MatchCriteria;
use crate::AppConfig;
use crate::Result;

/// Arguments of the `recommend` command
#[derive(Debug, Clone)]
pub struct RecommendArgs {
    pub age: u32,
    pub state: String,
    pub coverage: f64,
    pub plan_type: String,
    pub tolerance: Option<f64>,
    pub top: Option<usize>,
    pub json: bool,
}

impl RecommendArgs {
    /// `Any` (or blank) disables the plan type filter
    #[must_use]
    pub fn criteria(&self, config: &AppConfig) -> MatchCriteria {
        let criteria = MatchCriteria::new(self.age, self.state.trim(), self.coverage)
            .with_tolerance(self.tolerance.unwrap_or_else(|| config.tolerance_pct()));
        let plan_type = self.plan_type.trim();
        if plan_type.is_empty() || plan_type.eq_ignore_ascii_case("any") {
            criteria
        } else {
            criteria.with_plan_type(plan_type)
        }
    }
}

pub async fn handle_recommend_command(config: &AppConfig, args: RecommendArgs) -> Result<()> {
    let catalog = Arc::new(Catalog::from_config(config)?);
    let mut advisor =
        PlanAdvisor::new(catalog, config).with_top_n(args.top.unwrap_or_else(|| config.top_n()));

    match build_search_engine(config) {
        Ok(search) => advisor = advisor.with_search(search),
        Err(e) => warn!("Regulatory corpus unavailable, skipping rules lookup: {}", e),
    }

    let recommendation = advisor.recommend(&args.criteria(config)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else if recommendation.is_empty() {
        print_warning("No matching plans found.");
    } else {
        print_recommendation(&recommendation);
    }
    Ok(())
}
