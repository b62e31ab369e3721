//! Premium-to-coverage prediction rules

/// Premium used when a rate row carries no `IndividualRate`
pub const DEFAULT_INDIVIDUAL_RATE: f64 = 300.0;

/// Predicts a coverage amount from a monthly premium.
///
/// Any deterministic scoring function works; no statistical validity is implied.
pub trait CoverageRule: Send + Sync {
    fn predict(&self, individual_rate: f64) -> f64;
}

/// Coverage as a fixed multiple of the premium
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCoverageRule {
    multiplier: f64,
}

impl LinearCoverageRule {
    #[must_use]
    pub const fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Default for LinearCoverageRule {
    fn default() -> Self {
        Self::new(crate::config::default_coverage_multiplier())
    }
}

impl CoverageRule for LinearCoverageRule {
    fn predict(&self, individual_rate: f64) -> f64 {
        individual_rate * self.multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_multiplier() {
        let rule = LinearCoverageRule::default();
        assert!((rule.predict(250.0) - 20000.0).abs() < f64::EPSILON);
        assert!((rule.predict(DEFAULT_INDIVIDUAL_RATE) - 24000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_multiplier() {
        let rule = LinearCoverageRule::new(100.0);
        assert!((rule.predict(12.5) - 1250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rule_is_object_safe() {
        let rule: Box<dyn CoverageRule> = Box::new(LinearCoverageRule::default());
        assert!((rule.predict(1.0) - 80.0).abs() < f64::EPSILON);
    }
}
