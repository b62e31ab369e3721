//! Plan recommendation pipeline
//!
//! [`Catalog`] holds the tables loaded once at startup. [`PlanAdvisor`] runs
//! match, rank, enrich and explain against it and attaches a regulation
//! summary from the document corpus. Requests share the catalog read-only.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::EnrichedPlan;
use crate::models::MatchCriteria;
use crate::models::PlanRecord;
use crate::models::RateRecord;
use crate::plans::BenefitEnricher;
use crate::plans::ExplanationFormatter;
use crate::plans::LinearCoverageRule;
use crate::plans::PlanCatalogJoiner;
use crate::plans::RankDeduplicator;
use crate::rag::SemanticSearchEngine;

pub const NO_REGULATION_FOUND: &str = "No regulation found.";

/// Immutable plan catalog shared by every request
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    plans: Vec<PlanRecord>,
    rates: Vec<RateRecord>,
    benefits: BenefitEnricher,
}

impl Catalog {
    #[must_use]
    pub fn new(plans: Vec<PlanRecord>, rates: Vec<RateRecord>, benefits: BenefitEnricher) -> Self {
        Self {
            plans,
            rates,
            benefits,
        }
    }

    /// Load the plan, rate and benefit tables named in the config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let plans = crate::data::load_plans(&config.data.plans_path)?;
        let rule = LinearCoverageRule::new(config.coverage_multiplier());
        let rates = crate::data::load_rates(&config.data.rates_path, &plans, &rule)?;
        let benefits = BenefitEnricher::new(&crate::data::load_benefits(&config.data.benefits_path)?);

        info!(
            "Catalog ready: {} plans, {} rates, {} benefit components",
            plans.len(),
            rates.len(),
            benefits.component_count()
        );
        Ok(Self::new(plans, rates, benefits))
    }

    #[must_use]
    pub fn plans(&self) -> &[PlanRecord] {
        &self.plans
    }

    #[must_use]
    pub fn rates(&self) -> &[RateRecord] {
        &self.rates
    }

    #[must_use]
    pub const fn benefits(&self) -> &BenefitEnricher {
        &self.benefits
    }
}

/// Ranked plans with explanations and the applicable rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub plans: Vec<EnrichedPlan>,
    pub explanations: Vec<String>,
    /// Regulation excerpt; `None` when no plan matched or no corpus is loaded
    pub rules: Option<String>,
}

impl Recommendation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Runs the recommendation pipeline for one request at a time
#[derive(Clone)]
pub struct PlanAdvisor {
    catalog: Arc<Catalog>,
    search: Option<SemanticSearchEngine>,
    ranker: RankDeduplicator,
    rules_top_k: usize,
    answer_chars: usize,
}

impl PlanAdvisor {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: &AppConfig) -> Self {
        Self {
            catalog,
            search: None,
            ranker: RankDeduplicator::new(config.top_n()),
            rules_top_k: config.search.rules_top_k,
            answer_chars: config.search.answer_chars,
        }
    }

    /// Attach the regulatory search used for the rules summary
    #[must_use]
    pub fn with_search(mut self, search: SemanticSearchEngine) -> Self {
        self.search = Some(search);
        self
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.ranker = RankDeduplicator::new(top_n);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn recommend(&self, criteria: &MatchCriteria) -> Result<Recommendation> {
        let matched = PlanCatalogJoiner::new(&self.catalog.plans, &self.catalog.rates)
            .match_plans(criteria)?;
        if matched.is_empty() {
            info!(
                "No plans matched age {} in {} around {}",
                criteria.age, criteria.state_code, criteria.target_coverage
            );
            return Ok(Recommendation {
                plans: Vec::new(),
                explanations: Vec::new(),
                rules: None,
            });
        }

        let ranked = self.ranker.top_unique(&matched);
        let plans = self.catalog.benefits.enrich(&ranked);
        let explanations = ExplanationFormatter.explain(&plans, criteria.age);
        debug!(
            "Pipeline: {} matched, {} ranked, {} explained",
            matched.len(),
            ranked.len(),
            explanations.len()
        );

        let rules = match &self.search {
            Some(search) => Some(self.rules_for(search, criteria).await?),
            None => None,
        };

        Ok(Recommendation {
            plans,
            explanations,
            rules,
        })
    }

    async fn rules_for(&self, search: &SemanticSearchEngine, criteria: &MatchCriteria) -> Result<String> {
        let query = rules_query(criteria);
        let docs = search.search(&query, self.rules_top_k).await?;
        Ok(docs.first().map_or_else(
            || NO_REGULATION_FOUND.to_string(),
            |doc| {
                let excerpt: String = doc.content.chars().take(self.answer_chars).collect();
                format!("{excerpt}...")
            },
        ))
    }
}

/// Question used to look up the rules relevant to a request
#[must_use]
pub fn rules_query(criteria: &MatchCriteria) -> String {
    let plan_type = criteria
        .plan_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Any");
    format!(
        "What are the important insurance rules for age {}, state {}, plan type {}?",
        criteria.age, criteria.state_code, plan_type
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::embeddings::TextEmbedder;
    use crate::models::BenefitRecord;
    use crate::models::Document;
    use crate::rag::VectorIndex;

    struct RecordingEmbedder {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextEmbedder for RecordingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.queries.lock().unwrap().push(text.to_string());
            Ok(vec![1.0, 0.0])
        }
    }

    fn catalog() -> Catalog {
        let plan = |id: &str, name: &str, component: &str| PlanRecord {
            plan_id: id.to_string(),
            plan_marketing_name: name.to_string(),
            plan_type: "HMO".to_string(),
            state_code: "TX".to_string(),
            metal_level: Some("Silver".to_string()),
            standard_component_id: Some(component.to_string()),
        };
        let rate = |id: &str, premium: f64| RateRecord {
            plan_id: id.to_string(),
            age: "30".to_string(),
            individual_rate: premium,
            predicted_coverage: premium * 80.0,
            metal_level: "Silver".to_string(),
            plan_type: "HMO".to_string(),
        };
        Catalog::new(
            vec![
                plan("12345TX0000001-01", "Silver Care", "12345TX0000001"),
                plan("12345TX0000002-01", "Silver Saver", "12345TX0000002"),
            ],
            vec![rate("12345TX0000001", 250.0), rate("12345TX0000002", 240.0)],
            BenefitEnricher::new(&[BenefitRecord {
                standard_component_id: "12345TX0000001".to_string(),
                benefit_name: Some("Primary Care".to_string()),
                is_covered: Some("Yes".to_string()),
            }]),
        )
    }

    fn advisor(documents: Vec<Document>) -> (PlanAdvisor, Arc<RecordingEmbedder>) {
        let embedder = Arc::new(RecordingEmbedder {
            queries: Mutex::new(Vec::new()),
        });
        let embeddings = vec![vec![1.0, 0.0]; documents.len()];
        let index = VectorIndex::from_aligned(documents, embeddings).unwrap();
        let search = SemanticSearchEngine::new(Arc::new(index), embedder.clone());
        let advisor = PlanAdvisor::new(Arc::new(catalog()), &AppConfig::default()).with_search(search);
        (advisor, embedder)
    }

    #[test]
    fn test_rules_query() {
        let criteria = MatchCriteria::new(30, "TX", 20000.0);
        assert_eq!(
            rules_query(&criteria),
            "What are the important insurance rules for age 30, state TX, plan type Any?"
        );
        assert_eq!(
            rules_query(&criteria.with_plan_type("PPO")),
            "What are the important insurance rules for age 30, state TX, plan type PPO?"
        );
    }

    #[tokio::test]
    async fn test_recommend_full_pipeline() {
        let (advisor, embedder) = advisor(vec![Document::new("Plans must cover essential benefits.")]);
        let rec = advisor
            .recommend(&MatchCriteria::new(30, "TX", 20000.0))
            .await
            .unwrap();

        assert_eq!(rec.plans.len(), 2);
        assert_eq!(rec.plans[0].plan.plan_marketing_name, "Silver Saver");
        assert_eq!(rec.plans[0].covered_benefits, "N/A");
        assert_eq!(rec.plans[1].covered_benefits, "Primary Care");
        assert_eq!(rec.explanations.len(), 2);
        assert_eq!(
            rec.rules.as_deref(),
            Some("Plans must cover essential benefits....")
        );
        assert_eq!(
            embedder.queries.lock().unwrap().as_slice(),
            ["What are the important insurance rules for age 30, state TX, plan type Any?"]
        );
    }

    #[tokio::test]
    async fn test_no_match_skips_search() {
        let (advisor, embedder) = advisor(vec![Document::new("Rule")]);
        let rec = advisor
            .recommend(&MatchCriteria::new(30, "FL", 20000.0))
            .await
            .unwrap();
        assert!(rec.is_empty());
        assert!(rec.explanations.is_empty());
        assert_eq!(rec.rules, None);
        assert!(embedder.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_corpus_reports_no_regulation() {
        let (advisor, _) = advisor(Vec::new());
        let rec = advisor
            .recommend(&MatchCriteria::new(30, "TX", 20000.0))
            .await
            .unwrap();
        assert_eq!(rec.rules.as_deref(), Some(NO_REGULATION_FOUND));
    }

    #[tokio::test]
    async fn test_recommend_is_idempotent() {
        let (advisor, _) = advisor(vec![Document::new("Rule")]);
        let criteria = MatchCriteria::new(30, "TX", 20000.0).with_tolerance(5.0);
        let first = advisor.recommend(&criteria).await.unwrap();
        let second = advisor.recommend(&criteria).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(advisor.catalog().plans().len(), 2);
    }

    #[tokio::test]
    async fn test_top_n_override() {
        let (advisor, _) = advisor(Vec::new());
        let rec = advisor
            .with_top_n(1)
            .recommend(&MatchCriteria::new(30, "TX", 20000.0))
            .await
            .unwrap();
        assert_eq!(rec.plans.len(), 1);
    }
}
