//! Prompt construction and canned replies for the language model.

use oa_protocol::{Domain, FarmData, PredictionOutcome};

const BASE_PROMPT: &str = "You are an expert macadamia farming advisor with deep knowledge of organic farming practices. \
You provide practical, actionable advice to farmers in a friendly and easy-to-understand manner. \
Always prioritize organic and sustainable farming methods.";

const CLOSING: &str = "Provide helpful, practical advice in a conversational tone.";

pub const EXPLAIN_SYSTEM_PROMPT: &str = "You are an expert macadamia farming advisor. \
Provide detailed, educational explanations for farming recommendations. \
Explain the science behind the advice and include practical implementation tips.";

/// Topic focus appended to the base prompt.
pub fn domain_focus(domain: Domain) -> &'static str {
    match domain {
        Domain::Planting => {
            "Focus on macadamia planting advice including:
- Site selection and soil preparation
- Optimal planting times and spacing
- Tree variety selection
- Early care and establishment
- Organic soil amendments"
        }
        Domain::PestManagement => {
            "Focus on organic pest management for macadamia trees including:
- Pest identification and monitoring
- Organic treatment options
- Integrated pest management strategies
- Beneficial insect conservation
- Prevention methods"
        }
        Domain::Fertilization => {
            "Focus on organic fertilization for macadamia trees including:
- Organic fertilizer recommendations
- Soil testing and nutrient management
- Composting and organic amendments
- Foliar feeding programs
- Seasonal fertilization schedules"
        }
        Domain::Harvesting => {
            "Focus on macadamia harvesting including:
- Harvest timing and maturity indicators
- Harvesting methods and equipment
- Post-harvest handling and processing
- Quality assessment and grading
- Storage recommendations"
        }
        Domain::Certification => {
            "Focus on organic certification for macadamia farming including:
- Certification requirements and process
- Record keeping and documentation
- Approved organic inputs
- Transition period management
- Maintaining certification compliance"
        }
        Domain::General => "",
    }
}

/// One-sentence summary of a pest-risk outcome.
pub fn prediction_summary(outcome: &PredictionOutcome) -> String {
    format!(
        "Based on current conditions: Pest risk is currently {}.",
        outcome.risk_level()
    )
}

/// Base prompt, domain focus, prediction context and closing instruction.
pub fn system_prompt(domain: Domain, prediction: Option<&PredictionOutcome>) -> String {
    let mut prompt = String::from(BASE_PROMPT);

    let focus = domain_focus(domain);
    if !focus.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(focus);
    }

    if let Some(outcome) = prediction {
        prompt.push_str("\n\nCurrent predictions: ");
        prompt.push_str(&prediction_summary(outcome));
    }

    prompt.push_str("\n\n");
    prompt.push_str(CLOSING);
    prompt
}

/// The farmer's question, with their farm details appended as JSON.
pub fn user_message(query: &str, farm_data: Option<&FarmData>) -> String {
    let mut message = query.to_string();
    if let Some(data) = farm_data {
        match serde_json::to_string(data) {
            Ok(json) => {
                message.push_str("\n\nMy farm details: ");
                message.push_str(&json);
            }
            Err(e) => tracing::warn!(error = %e, "could not serialize farm data for prompt"),
        }
    }
    message
}

pub fn explain_message(recommendation: &str, context: Option<&serde_json::Value>) -> String {
    let mut message =
        format!("Please explain this macadamia farming recommendation in detail: {recommendation}");
    if let Some(context) = context
        && let Ok(pretty) = serde_json::to_string_pretty(context)
    {
        message.push_str("\nContext: ");
        message.push_str(&pretty);
    }
    message
}

pub fn fallback_explanation(recommendation: &str) -> String {
    format!(
        "This recommendation ({recommendation}) is based on established macadamia farming best practices. \
For detailed scientific explanations, consult agricultural research publications or extension resources."
    )
}

/// Canned conversational reply used when the model is disabled or unreachable.
pub fn fallback_reply(domain: Domain) -> &'static str {
    match domain {
        Domain::Planting => {
            "For macadamia planting, I recommend:
1. Choose well-draining soil with pH 6.0-6.5
2. Plant in spring after last frost or autumn before first frost
3. Space trees 8m x 8m for good air circulation
4. Prepare planting holes with compost and organic matter
5. Water regularly during establishment period

For specific variety recommendations and detailed planting guides, consult your local agricultural extension office."
        }
        Domain::PestManagement => {
            "For organic pest management:
1. Regular monitoring is key - inspect trees weekly
2. Use pheromone traps for early pest detection
3. Encourage beneficial insects with diverse plantings
4. Apply neem oil or insecticidal soap for soft-bodied pests
5. Maintain good orchard sanitation

For severe pest issues, consider consulting an organic farming specialist."
        }
        Domain::Fertilization => {
            "For organic fertilization:
1. Test soil annually to determine nutrient needs
2. Apply compost in spring and autumn (10-20kg per mature tree)
3. Use organic fertilizers like blood meal, bone meal, and kelp meal
4. Consider foliar feeding with fish emulsion during growing season
5. Maintain soil pH between 6.0-6.5

Adjust fertilization based on tree age and soil test results."
        }
        Domain::Harvesting => {
            "For macadamia harvesting:
1. Harvest when nuts fall naturally from trees
2. Collect nuts within 2-3 days to maintain quality
3. Remove husks promptly after collection
4. Dry nuts to 1.5-3.5% moisture content
5. Store in cool, dry conditions with good ventilation

Proper timing and handling are crucial for nut quality."
        }
        Domain::Certification => {
            "For organic certification:
1. Choose an accredited certification body
2. Maintain detailed records of all inputs and practices
3. Allow 3-year transition period from conventional farming
4. Use only approved organic inputs
5. Undergo annual inspections

Start record-keeping immediately, even before formal certification begins."
        }
        Domain::General => {
            "I'd be happy to help with your macadamia farming question!
For the most accurate and up-to-date advice, I recommend:
1. Consulting your local agricultural extension office
2. Connecting with other organic macadamia farmers in your area
3. Reviewing organic farming resources and publications
4. Considering soil and plant tissue testing for specific recommendations

Feel free to ask more specific questions about macadamia farming practices!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oa_protocol::{FallbackReport, Season};

    #[test]
    fn system_prompt_layers() {
        let prompt = system_prompt(Domain::Harvesting, None);
        assert!(prompt.starts_with("You are an expert macadamia farming advisor"));
        assert!(prompt.contains("Harvest timing and maturity indicators"));
        assert!(prompt.ends_with("in a conversational tone."));
        assert!(!prompt.contains("Current predictions"));
    }

    #[test]
    fn general_prompt_has_no_focus() {
        let prompt = system_prompt(Domain::General, None);
        assert!(!prompt.contains("Focus on"));
    }

    #[test]
    fn prediction_context_included() {
        let outcome = PredictionOutcome::Fallback(FallbackReport::new("no data"));
        let prompt = system_prompt(Domain::PestManagement, Some(&outcome));
        assert!(prompt.contains(
            "Current predictions: Based on current conditions: Pest risk is currently medium."
        ));
    }

    #[test]
    fn user_message_appends_farm_details() {
        let data = FarmData {
            season: Some(Season::Autumn),
            tree_age: Some(7),
            ..Default::default()
        };
        let message = user_message("when to harvest?", Some(&data));
        assert_eq!(
            message,
            r#"when to harvest?

My farm details: {"season":"autumn","tree_age":7}"#
        );
        assert_eq!(user_message("hi", None), "hi");
    }

    #[test]
    fn explain_message_with_context() {
        let context = serde_json::json!({"season": "summer"});
        let message = explain_message("Use kaolin clay", Some(&context));
        assert!(message.starts_with(
            "Please explain this macadamia farming recommendation in detail: Use kaolin clay"
        ));
        assert!(message.contains("\nContext: {\n  \"season\": \"summer\"\n}"));
        assert!(!explain_message("x", None).contains("Context"));
    }

    #[test]
    fn every_domain_has_fallback_reply() {
        for domain in Domain::ALL {
            assert!(!fallback_reply(domain).is_empty());
        }
        assert!(fallback_reply(Domain::General).contains("extension office"));
    }
}
