//! Price ranking and per-variant deduplication

use std::collections::HashSet;

use tracing::debug;

use crate::models::MatchedPlan;
use crate::models::RankedPlan;

/// Keeps the cheapest row per underlying plan, cheapest first
#[derive(Debug, Clone, Copy)]
pub struct RankDeduplicator {
    top_n: usize,
}

impl Default for RankDeduplicator {
    fn default() -> Self {
        Self::new(crate::config::default_top_n())
    }
}

impl RankDeduplicator {
    #[must_use]
    pub const fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Collapse `matched` to at most `top_n` rows ordered by ascending premium.
    ///
    /// The cheapest row per `DedupKey` survives. Equal premiums keep their
    /// input order.
    #[must_use]
    pub fn top_unique(&self, matched: &[MatchedPlan]) -> Vec<RankedPlan> {
        let mut sorted: Vec<&MatchedPlan> = matched.iter().collect();
        sort_by_rate(&mut sorted);

        let mut seen: HashSet<DedupKey<'_>> = HashSet::new();
        let mut ranked: Vec<RankedPlan> = sorted
            .into_iter()
            .filter(|m| seen.insert(DedupKey::of(*m)))
            .cloned()
            .collect();

        ranked.truncate(self.top_n);
        debug!(
            "Ranked {} unique plans from {} matches (top {})",
            ranked.len(),
            matched.len(),
            self.top_n
        );
        ranked
    }
}

/// Identity of an underlying plan, chosen per row.
///
/// Rows with a standard component id collapse on that id. Rows without one
/// collapse on name, type and premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DedupKey<'a> {
    Component(&'a str),
    Listing(&'a str, &'a str, u64),
}

impl<'a> DedupKey<'a> {
    fn of(plan: &'a MatchedPlan) -> Self {
        match plan.standard_component_id.as_deref() {
            Some(id) => Self::Component(id),
            None => Self::Listing(
                plan.plan_marketing_name.as_str(),
                plan.plan_type.as_str(),
                plan.individual_rate.to_bits(),
            ),
        }
    }
}

/// Stable ascending sort on premium
fn sort_by_rate(plans: &mut [&MatchedPlan]) {
    plans.sort_by(|a, b| a.individual_rate.total_cmp(&b.individual_rate));
}
