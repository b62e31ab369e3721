//! Plan matching pipeline
//!
//! The four stages run in order for every recommendation request:
//! - [`PlanCatalogJoiner`] joins plan variants with rates at the requested age
//!   and keeps rows inside the coverage tolerance band
//! - [`RankDeduplicator`] keeps the cheapest row per underlying plan
//! - [`BenefitEnricher`] attaches covered-benefit summaries
//! - [`ExplanationFormatter`] renders a rationale per plan
//!
//! Every stage reads the shared tables by reference and returns new
//! collections, so concurrent requests never observe each other.
//!
//! # Examples
//!
//! ```rust
//! use coverwise::models::{MatchCriteria, PlanRecord, RateRecord};
//! use coverwise::plans::{BenefitEnricher, ExplanationFormatter, PlanCatalogJoiner, RankDeduplicator};
//!
//! let plans = vec![PlanRecord {
//!     plan_id: "12345TX0000001-01".to_string(),
//!     plan_marketing_name: "Silver Care".to_string(),
//!     plan_type: "HMO".to_string(),
//!     state_code: "TX".to_string(),
//!     metal_level: None,
//!     standard_component_id: Some("12345TX0000001".to_string()),
//! }];
//! let rates = vec![RateRecord {
//!     plan_id: "12345TX0000001".to_string(),
//!     age: "30".to_string(),
//!     individual_rate: 250.0,
//!     predicted_coverage: 20000.0,
//!     metal_level: "Silver".to_string(),
//!     plan_type: "HMO".to_string(),
//! }];
//!
//! let matched = PlanCatalogJoiner::new(&plans, &rates)
//!     .match_plans(&MatchCriteria::new(30, "TX", 20000.0))?;
//! let ranked = RankDeduplicator::default().top_unique(&matched);
//! let enriched = BenefitEnricher::default().enrich(&ranked);
//! let explanations = ExplanationFormatter.explain(&enriched, 30);
//! assert_eq!(explanations.len(), 1);
//! # Ok::<(), coverwise::CoverwiseError>(())
//! ```

pub mod benefits;
pub mod coverage;
pub mod explain;
pub mod joiner;
pub mod plan_id;
pub mod ranking;

pub use benefits::BenefitEnricher;
pub use coverage::CoverageRule;
pub use coverage::LinearCoverageRule;
pub use explain::ExplanationFormatter;
pub use joiner::PlanCatalogJoiner;
pub use plan_id::base_plan_id;
pub use ranking::RankDeduplicator;
