//! Prompt sent to the model

/// Only the closest pubs are offered to the model
pub const PROMPT_CANDIDATES: usize = 5;

/// Build the vibe prompt for the given pub names (in distance order)
#[must_use]
pub fn build_prompt(vibe: &str, pub_names: &[&str], region: &str) -> String {
    let names = pub_names
        .iter()
        .take(PROMPT_CANDIDATES)
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let count = pub_names.len().min(PROMPT_CANDIDATES);

    format!(
        "Given the vibe: '{vibe}'. With these {count} pubs located in {region}: [{names}] that are closest to me.

1. Which ONE pub best matches the '{vibe}' vibe? Just give me the name.
2. Also provide a brief explanation for why this pub matches the vibe.

Format your response as:
PUB NAME: [name of the selected pub]
EXPLANATION: [your explanation]
"
    )
}
