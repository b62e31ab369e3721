use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Placeholder shown wherever a plan has no covered-benefit summary
pub const NOT_AVAILABLE: &str = "N/A";

/// One plan variant from the plan metadata table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlanRecord {
    /// Compound identifier: base plan id plus a variant suffix, e.g. `12345TX0000001-01`
    pub plan_id: String,
    pub plan_marketing_name: String,
    pub plan_type: String,
    pub state_code: String,
    #[serde(default)]
    pub metal_level: Option<String>,
    #[serde(default)]
    pub standard_component_id: Option<String>,
}

/// Premium of a base plan at one age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RateRecord {
    /// Base plan id (coarser than `PlanRecord::plan_id`)
    pub plan_id: String,
    /// Age as it appears in the source table; matched by exact string comparison
    pub age: String,
    pub individual_rate: f64,
    pub predicted_coverage: f64,
    pub metal_level: String,
    pub plan_type: String,
}

/// One benefit row of a plan's benefit-coverage table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BenefitRecord {
    pub standard_component_id: String,
    #[serde(default)]
    pub benefit_name: Option<String>,
    /// Covered only when exactly `"Yes"`
    #[serde(default)]
    pub is_covered: Option<String>,
}

impl BenefitRecord {
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.is_covered.as_deref() == Some("Yes")
    }
}

/// A plan variant joined with a rate row that falls inside the coverage band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPlan {
    pub plan_id: String,
    pub plan_marketing_name: String,
    pub plan_type: String,
    pub age: String,
    pub individual_rate: f64,
    pub predicted_coverage: f64,
    pub standard_component_id: Option<String>,
}

/// A matched plan that survived ranking and deduplication
pub type RankedPlan = MatchedPlan;

/// A ranked plan with its covered-benefit summary attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPlan {
    #[serde(flatten)]
    pub plan: RankedPlan,
    /// Sorted, comma-joined benefit names, or [`NOT_AVAILABLE`]
    pub covered_benefits: String,
}

/// Immutable regulatory passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "page_content")]
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Document {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A document paired with its precomputed embedding
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub document: Document,
    pub embedding: Vec<f32>,
}

/// Request parameters for plan matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    pub age: u32,
    pub state_code: String,
    pub target_coverage: f64,
    pub plan_type: Option<String>,
    #[serde(default = "crate::config::default_tolerance_pct")]
    pub tolerance_pct: f64,
}

impl MatchCriteria {
    #[must_use]
    pub fn new(age: u32, state_code: impl Into<String>, target_coverage: f64) -> Self {
        Self {
            age,
            state_code: state_code.into(),
            target_coverage,
            plan_type: None,
            tolerance_pct: crate::config::default_tolerance_pct(),
        }
    }

    #[must_use]
    pub fn with_plan_type(mut self, plan_type: impl Into<String>) -> Self {
        self.plan_type = Some(plan_type.into());
        self
    }

    #[must_use]
    pub const fn with_tolerance(mut self, tolerance_pct: f64) -> Self {
        self.tolerance_pct = tolerance_pct;
        self
    }

    /// Inclusive `[lower, upper]` coverage band
    #[must_use]
    pub fn coverage_bounds(&self) -> (f64, f64) {
        let ratio = self.tolerance_pct / 100.0;
        (
            self.target_coverage * (1.0 - ratio),
            self.target_coverage * (1.0 + ratio),
        )
    }
}
