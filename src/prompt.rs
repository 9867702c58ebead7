//! Classification prompt builder
//!
//! Formats the instruction prompt handed to the external classification
//! model. The model is an opaque oracle; the contract is a strict-JSON
//! reply that `classify::parse_classification` can recover.

use crate::taxonomy::Taxonomy;

fn theme_definition(theme: &str) -> &'static str {
    match theme {
        "Feature Request" => {
            "The user asks for a capability the product does not have yet, \
             or an extension of an existing one."
        }
        "Bug Report" => {
            "Something behaves incorrectly: errors, wrong results, broken \
             flows, crashes."
        }
        "Usability" => {
            "The product works but is confusing or cumbersome: unclear \
             navigation, too many steps, poor discoverability."
        }
        "Performance" => {
            "Slowness, timeouts, latency, or resource issues affecting \
             day-to-day use."
        }
        "Integration" => {
            "Connecting the product to external systems: imports, exports, \
             APIs, single sign-on, third-party tools."
        }
        "Other" => "Feedback that fits none of the categories above.",
        _ => "",
    }
}

fn impact_definition(impact: &str) -> &'static str {
    match impact {
        "High" => "Blocks core workflows or affects a large user base; needs urgent attention.",
        "Medium" => "Disruptive but there are workarounds or the scope is limited.",
        "Low" => "Minor annoyance, cosmetic issue, or nice-to-have enhancement.",
        _ => "",
    }
}

/// Strip characters that could break the reply-format contract.
fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build the instruction prompt for classifying one feedback row.
pub fn classification_prompt(taxonomy: &Taxonomy, subject: &str, description: &str) -> String {
    let theme_list = taxonomy
        .themes
        .iter()
        .map(|t| format!("  - {}: {}", t, theme_definition(t)))
        .collect::<Vec<_>>()
        .join("\n");
    let impact_list = taxonomy
        .impacts
        .iter()
        .map(|i| format!("  - {}: {}", i, impact_definition(i)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a feedback classification assistant.\n\
         \n\
         Your task is to analyze one piece of feedback and classify it with exactly one theme and one impact level.\n\
         \n\
         THEMES (choose exactly one):\n{theme_list}\n\
         \n\
         IMPACT LEVELS (choose exactly one):\n{impact_list}\n\
         \n\
         IMPORTANT INSTRUCTIONS:\n\
         1. Return your response as valid JSON only\n\
         2. Use the exact label names as provided above\n\
         3. Include a confidence score between 0.0 and 1.0\n\
         4. Do not add any explanation or additional text\n\
         \n\
         FEEDBACK TO CLASSIFY:\n\
         Subject: {subject}\n\
         Description: {description}\n\
         \n\
         Required JSON format:\n\
         {{\"theme\":\"<exact_theme_name>\",\"impact\":\"<exact_impact_level>\",\"confidence\":<number>}}",
        subject = sanitize(subject),
        description = sanitize(description),
    )
}
