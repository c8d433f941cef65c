//! Reasoning request text sent to the chat-completion service

use std::fmt::Write;

use crate::models::{NearbySite, SiteParameters};

/// Everything the prompt embeds about one prediction
#[derive(Debug)]
pub struct PromptContext<'a> {
    pub is_existing_shop: bool,
    pub parameters: &'a SiteParameters,
    pub baseline_traffic: u32,
    pub nearby_sites: &'a [NearbySite],
}

impl PromptContext<'_> {
    fn site_type(&self) -> &'static str {
        if self.is_existing_shop {
            "Existing Shop"
        } else {
            "Simulated New Site"
        }
    }
}

/// Build the user message asking for a JSON forecast
#[must_use]
pub fn build_prompt(context: &PromptContext<'_>) -> String {
    let parameters = context.parameters;
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Role: Senior Urban Economist.");
    let _ = writeln!(prompt, "Task: Analyze a coffee shop location.");
    let _ = writeln!(prompt, "Site Type: {}", context.site_type());
    let _ = writeln!(
        prompt,
        "Parameters: Area {}sqm, Style {}, Price Tier {}.",
        parameters.area, parameters.style, parameters.price_tier
    );
    let _ = writeln!(
        prompt,
        "Baseline Data: {} pax/hr (Spatial Gravity).",
        context.baseline_traffic
    );
    let _ = writeln!(
        prompt,
        "Competitors: {} within immediate vicinity.",
        context.nearby_sites.len()
    );
    for site in context.nearby_sites {
        let _ = writeln!(
            prompt,
            "- {} at {:.0} m{}",
            site.name.as_deref().unwrap_or("Unnamed site"),
            site.distance_meters,
            site.rating
                .as_deref()
                .map(|rating| format!(", rating {rating}"))
                .unwrap_or_default()
        );
    }

    prompt.push_str(
        r#"
Requirement:
1. Calculate 'est_monthly_revenue' using: (Traffic * Conversion * Avg_Check * 30 days * 10 hours).
2. Adjust conversion rate based on 'Style' and 'Competition'.
3. Do not return 0 unless the site is completely non-viable.

Output JSON:
{
    "predicted_traffic": int,
    "est_monthly_revenue": int (CNY),
    "payback_months": float,
    "radar_scores": { "traffic": 0-100, "competition": 0-100, "brand": 0-100 },
    "swot": { "strength": "str", "risk": "str" },
    "reasoning": "A professional deduction focusing on style-location fit and pricing strategy."
}
"#,
    );

    prompt
}
