//! Join of plan metadata against rate-by-age records

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::debug;

use super::plan_id::base_plan_id;
use crate::errors::CoverwiseError;
use crate::errors::Result;
use crate::models::MatchCriteria;
use crate::models::MatchedPlan;
use crate::models::PlanRecord;
use crate::models::RateRecord;

/// Matches plan variants to rate rows sharing their base plan id
pub struct PlanCatalogJoiner<'a> {
    plans: &'a [PlanRecord],
    rates: &'a [RateRecord],
}

impl<'a> PlanCatalogJoiner<'a> {
    #[must_use]
    pub const fn new(plans: &'a [PlanRecord], rates: &'a [RateRecord]) -> Self {
        Self { plans, rates }
    }

    /// Find every plan variant whose rate at `criteria.age` predicts a
    /// coverage inside the tolerance band.
    ///
    /// A base plan with several rate rows at the same age fans out into one
    /// row per combination. Exact duplicate rows are collapsed, keeping the
    /// first occurrence. No match is an empty result, not an error.
    pub fn match_plans(&self, criteria: &MatchCriteria) -> Result<Vec<MatchedPlan>> {
        validate(criteria)?;

        let age = criteria.age.to_string();
        let mut rates_by_plan: HashMap<&str, Vec<&RateRecord>> = HashMap::new();
        for rate in self.rates.iter().filter(|rate| rate.age == age) {
            rates_by_plan
                .entry(rate.plan_id.as_str())
                .or_default()
                .push(rate);
        }
        if rates_by_plan.is_empty() {
            debug!("No rate rows for age {}", age);
            return Ok(Vec::new());
        }

        let state = criteria.state_code.to_uppercase();
        let plan_type = criteria
            .plan_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        let (lower, upper) = criteria.coverage_bounds();

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        let mut in_scope = 0usize;

        for plan in self.plans {
            if plan.state_code.to_uppercase() != state {
                continue;
            }
            if let Some(plan_type) = &plan_type {
                if plan.plan_type.to_lowercase() != *plan_type {
                    continue;
                }
            }
            in_scope += 1;

            let Some(base_id) = base_plan_id(&plan.plan_id) else {
                continue;
            };
            let Some(rates) = rates_by_plan.get(base_id) else {
                continue;
            };

            for rate in rates {
                if !(lower..=upper).contains(&rate.predicted_coverage) {
                    continue;
                }
                let row = MatchedPlan {
                    plan_id: plan.plan_id.clone(),
                    plan_marketing_name: plan.plan_marketing_name.clone(),
                    plan_type: plan.plan_type.clone(),
                    age: rate.age.clone(),
                    individual_rate: rate.individual_rate,
                    predicted_coverage: rate.predicted_coverage,
                    standard_component_id: plan.standard_component_id.clone(),
                };
                if seen.insert(RowKey::of(&row)) {
                    matched.push(row);
                }
            }
        }

        debug!(
            "Matched {} rows from {} in-scope plans (coverage band {:.2}..={:.2})",
            matched.len(),
            in_scope,
            lower,
            upper
        );
        Ok(matched)
    }
}

fn validate(criteria: &MatchCriteria) -> Result<()> {
    if !criteria.tolerance_pct.is_finite() || criteria.tolerance_pct < 0.0 {
        return Err(CoverwiseError::invalid(format!(
            "tolerance_pct must be a non-negative number, got {}",
            criteria.tolerance_pct
        )));
    }
    if !criteria.target_coverage.is_finite() || criteria.target_coverage < 0.0 {
        return Err(CoverwiseError::invalid(format!(
            "target_coverage must be a non-negative number, got {}",
            criteria.target_coverage
        )));
    }
    Ok(())
}

/// Identity of a projected row, floats compared bitwise
#[derive(PartialEq, Eq, Hash)]
struct RowKey {
    plan_id: String,
    name: String,
    plan_type: String,
    age: String,
    rate: u64,
    coverage: u64,
    standard_component_id: Option<String>,
}

impl RowKey {
    fn of(row: &MatchedPlan) -> Self {
        Self {
            plan_id: row.plan_id.clone(),
            name: row.plan_marketing_name.clone(),
            plan_type: row.plan_type.clone(),
            age: row.age.clone(),
            rate: row.individual_rate.to_bits(),
            coverage: row.predicted_coverage.to_bits(),
            standard_component_id: row.standard_component_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, state: &str, plan_type: &str) -> PlanRecord {
        PlanRecord {
            plan_id: id.to_string(),
            plan_marketing_name: format!("Plan {id}"),
            plan_type: plan_type.to_string(),
            state_code: state.to_string(),
            metal_level: Some("Silver".to_string()),
            standard_component_id: base_plan_id(id).map(str::to_string),
        }
    }

    fn rate(id: &str, age: &str, premium: f64, coverage: f64) -> RateRecord {
        RateRecord {
            plan_id: id.to_string(),
            age: age.to_string(),
            individual_rate: premium,
            predicted_coverage: coverage,
            metal_level: "Silver".to_string(),
            plan_type: "HMO".to_string(),
        }
    }

    #[test]
    fn test_single_match_inside_band() {
        let plans = vec![plan("12345TX0000001-01", "TX", "HMO")];
        let rates = vec![rate("12345TX0000001", "30", 250.0, 20000.0)];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].plan_id, "12345TX0000001-01");
        assert_eq!(matched[0].age, "30");
        assert_eq!(
            matched[0].standard_component_id.as_deref(),
            Some("12345TX0000001")
        );
    }

    #[test]
    fn test_band_is_inclusive() {
        let plans = vec![plan("12345TX0000001-01", "TX", "HMO")];
        let rates = vec![
            rate("12345TX0000001", "30", 225.0, 18000.0),
            rate("12345TX0000001", "30", 275.0, 22000.0),
            rate("12345TX0000001", "30", 200.0, 17999.0),
            rate("12345TX0000001", "30", 300.0, 22001.0),
        ];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();

        let coverages: Vec<f64> = matched.iter().map(|m| m.predicted_coverage).collect();
        assert_eq!(coverages, vec![18000.0, 22000.0]);
    }

    #[test]
    fn test_no_rate_at_age_is_empty() {
        let plans = vec![plan("12345TX0000001-01", "TX", "HMO")];
        let rates = vec![rate("12345TX0000001", "31", 250.0, 20000.0)];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();
        assert!(matched.is_empty());
    }

    #[test]
    fn test_state_and_type_are_case_insensitive() {
        let plans = vec![
            plan("12345TX0000001-01", "tx", "hmo"),
            plan("12345TX0000001-02", "TX", "PPO"),
        ];
        let rates = vec![rate("12345TX0000001", "30", 250.0, 20000.0)];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "Tx", 20000.0).with_plan_type("HMO"))
            .unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].plan_id, "12345TX0000001-01");
    }

    #[test]
    fn test_empty_plan_type_does_not_filter() {
        let plans = vec![
            plan("12345TX0000001-01", "TX", "HMO"),
            plan("12345TX0000001-02", "TX", "PPO"),
        ];
        let rates = vec![rate("12345TX0000001", "30", 250.0, 20000.0)];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0).with_plan_type(""))
            .unwrap();
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_malformed_plan_id_is_skipped() {
        let plans = vec![
            plan("BADID-01", "TX", "HMO"),
            plan("12345TX0000001-01", "TX", "HMO"),
        ];
        let rates = vec![rate("12345TX0000001", "30", 250.0, 20000.0)];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_multiple_rates_per_age_fan_out() {
        let plans = vec![
            plan("12345TX0000001-01", "TX", "HMO"),
            plan("12345TX0000001-02", "TX", "HMO"),
        ];
        let rates = vec![
            rate("12345TX0000001", "30", 250.0, 20000.0),
            rate("12345TX0000001", "30", 255.0, 20400.0),
        ];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();

        // Left order first, then rate order
        let ids: Vec<(&str, f64)> = matched
            .iter()
            .map(|m| (m.plan_id.as_str(), m.individual_rate))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("12345TX0000001-01", 250.0),
                ("12345TX0000001-01", 255.0),
                ("12345TX0000001-02", 250.0),
                ("12345TX0000001-02", 255.0),
            ]
        );
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let plans = vec![
            plan("12345TX0000001-01", "TX", "HMO"),
            plan("12345TX0000001-01", "TX", "HMO"),
        ];
        let rates = vec![
            rate("12345TX0000001", "30", 250.0, 20000.0),
            rate("12345TX0000001", "30", 250.0, 20000.0),
        ];

        let matched = PlanCatalogJoiner::new(&plans, &rates)
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_invalid_tolerance_is_rejected() {
        let plans = vec![plan("12345TX0000001-01", "TX", "HMO")];
        let rates = vec![rate("12345TX0000001", "30", 250.0, 20000.0)];
        let joiner = PlanCatalogJoiner::new(&plans, &rates);

        let err = joiner
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0).with_tolerance(-5.0))
            .unwrap_err();
        assert!(matches!(err, CoverwiseError::InvalidArgument(_)));

        let err = joiner
            .match_plans(&MatchCriteria::new(30, "TX", f64::NAN))
            .unwrap_err();
        assert!(matches!(err, CoverwiseError::InvalidArgument(_)));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let plans = vec![plan("12345TX0000001-01", "TX", "HMO")];
        let rates = vec![rate("12345TX0000001", "30", 250.0, 20000.0)];
        let plans_before = plans.clone();
        let rates_before = rates.clone();

        let joiner = PlanCatalogJoiner::new(&plans, &rates);
        let first = joiner
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();
        let second = joiner
            .match_plans(&MatchCriteria::new(30, "TX", 20000.0))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(plans, plans_before);
        assert_eq!(rates, rates_before);
    }
}
