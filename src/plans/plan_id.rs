//! Base plan identifier extraction

use once_cell::sync::Lazy;
use regex::Regex;

/// Issuer digits, two-letter state code, seven-digit plan number
static BASE_PLAN_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[A-Z]{2}\d{7}").expect("base plan id pattern is valid"));

/// Extract the base plan id shared by all rate-tier variants of a plan.
///
/// Returns `None` when the id does not start with the expected pattern; such
/// plans cannot be joined against rates and are skipped.
#[must_use]
pub fn base_plan_id(plan_id: &str) -> Option<&str> {
    BASE_PLAN_ID.find(plan_id).map(|m| m.as_str())
}
