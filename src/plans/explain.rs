//! Human-readable rationale for each recommended plan

use crate::models::EnrichedPlan;

/// Renders one fixed-template explanation per plan
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplanationFormatter;

impl ExplanationFormatter {
    /// One explanation per plan, same order, nothing filtered
    #[must_use]
    pub fn explain(&self, enriched: &[EnrichedPlan], age: u32) -> Vec<String> {
        enriched.iter().map(|plan| self.explain_one(plan, age)).collect()
    }

    #[must_use]
    pub fn explain_one(&self, enriched: &EnrichedPlan, age: u32) -> String {
        let plan = &enriched.plan;
        format!(
            "🔹 **Plan ID:** {plan_id}\n\
             🔹 **Plan Name:** {name} ({plan_type})\n\
             🔹 **Premium:** ${premium} for age {age}\n\
             🔹 **Predicted Coverage:** ${coverage}\n\
             🔹 **Why this plan?**\n   \
             - It is among the most affordable options for your age\n   \
             - Offered as a {plan_type} plan (consider network/referral rules)\n   \
             - Covers major services such as: {benefits}",
            plan_id = plan.plan_id,
            name = plan.plan_marketing_name,
            plan_type = plan.plan_type,
            premium = format_amount(plan.individual_rate),
            coverage = format_thousands(plan.predicted_coverage),
            benefits = enriched.covered_benefits,
        )
    }
}

/// Premium as written in the rate table: shortest round-trip form, at
/// least one decimal place
#[must_use]
pub fn format_amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Two decimal places with comma thousands separators, e.g. `1,234,567.89`
#[must_use]
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{cents}")
}
