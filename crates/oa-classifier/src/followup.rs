//! Canned follow-up questions offered after a reply.

use oa_protocol::Domain;

const MAX_FOLLOWUPS: usize = 3;

const PLANTING: &[&str] = &[
    "What's your soil type and pH level?",
    "Which macadamia variety are you considering?",
    "What's your local climate like?",
    "How large is your planting area?",
];

const PEST_MANAGEMENT: &[&str] = &[
    "What specific pest symptoms are you seeing?",
    "How old are your trees?",
    "What's the current weather been like?",
    "Are you seeing beneficial insects in your orchard?",
];

const FERTILIZATION: &[&str] = &[
    "When did you last test your soil?",
    "What's the age of your trees?",
    "What fertilizers have you used recently?",
    "Are you seeing any nutrient deficiency symptoms?",
];

const HARVESTING: &[&str] = &[
    "What variety of macadamias do you have?",
    "Are nuts starting to fall naturally?",
    "What's your typical harvest season?",
    "How do you currently assess nut maturity?",
];

const CERTIFICATION: &[&str] = &[
    "Are you currently farming conventionally?",
    "Which certification are you interested in?",
    "How long have you been avoiding synthetic inputs?",
    "Do you have detailed farm records?",
];

const GENERAL: &[&str] = &[
    "Can you tell me more about your farm?",
    "What specific challenges are you facing?",
    "What's your experience level with macadamia farming?",
];

/// Up to three follow-up questions for a domain.
pub fn followup_questions(domain: Domain) -> Vec<String> {
    let questions = match domain {
        Domain::Planting => PLANTING,
        Domain::PestManagement => PEST_MANAGEMENT,
        Domain::Fertilization => FERTILIZATION,
        Domain::Harvesting => HARVESTING,
        Domain::Certification => CERTIFICATION,
        Domain::General => GENERAL,
    };
    questions
        .iter()
        .take(MAX_FOLLOWUPS)
        .map(|q| q.to_string())
        .collect()
}
