//! Covered-benefit summaries per standard component id

use std::collections::BTreeSet;
use std::collections::HashMap;

use tracing::debug;

use crate::models::BenefitRecord;
use crate::models::EnrichedPlan;
use crate::models::RankedPlan;
use crate::models::NOT_AVAILABLE;

/// Attaches covered-benefit lists to ranked plans.
///
/// Built once from the benefit table; only rows flagged exactly `"Yes"` with a
/// non-blank name contribute. Names are trimmed, deduplicated and kept sorted.
#[derive(Debug, Clone, Default)]
pub struct BenefitEnricher {
    covered: HashMap<String, BTreeSet<String>>,
}

impl BenefitEnricher {
    #[must_use]
    pub fn new(benefits: &[BenefitRecord]) -> Self {
        let mut covered: HashMap<String, BTreeSet<String>> = HashMap::new();
        for benefit in benefits.iter().filter(|b| b.is_covered()) {
            let Some(name) = benefit.benefit_name.as_deref().map(str::trim) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            covered
                .entry(benefit.standard_component_id.clone())
                .or_default()
                .insert(name.to_string());
        }
        debug!("Indexed covered benefits for {} components", covered.len());
        Self { covered }
    }

    /// Number of standard component ids with at least one covered benefit
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.covered.len()
    }

    /// Comma-joined covered benefits for one component, or `N/A`
    #[must_use]
    pub fn summary(&self, standard_component_id: Option<&str>) -> String {
        standard_component_id
            .and_then(|id| self.covered.get(id))
            .filter(|names| !names.is_empty())
            .map_or_else(
                || NOT_AVAILABLE.to_string(),
                |names| names.iter().map(String::as_str).collect::<Vec<_>>().join(", "),
            )
    }

    /// Pair every ranked plan with its benefit summary, preserving order
    #[must_use]
    pub fn enrich(&self, ranked: &[RankedPlan]) -> Vec<EnrichedPlan> {
        if ranked.iter().all(|p| p.standard_component_id.is_none()) {
            debug!("Ranked plans carry no standard component ids, benefits unavailable");
        }
        ranked
            .iter()
            .map(|plan| EnrichedPlan {
                covered_benefits: self.summary(plan.standard_component_id.as_deref()),
                plan: plan.clone(),
            })
            .collect()
    }
}
