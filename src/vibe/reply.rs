//! Parsing the model's two-line answer

const NAME_PREFIX: &str = "PUB NAME:";
const EXPLANATION_PREFIX: &str = "EXPLANATION:";

/// What the model picked, as far as we could read it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    pub pub_name: Option<String>,
    pub explanation: String,
}

/// Outcome of one round trip to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    Selected(ModelSelection),
    /// The call itself failed; carries the error description
    Failed(String),
}

/// Read `PUB NAME:` / `EXPLANATION:` lines out of free text.
///
/// The first non-empty name wins, as does the first explanation line. Once a
/// name or an explanation has been seen, lines without a prefix are appended
/// to the explanation, space-joined. The first `EXPLANATION:` line replaces
/// anything collected before it.
#[must_use]
pub fn parse_reply(text: &str) -> ModelSelection {
    let mut selection = ModelSelection::default();
    let mut explanation_seen = false;

    for line in text.trim().lines() {
        let line = line.trim_start();

        if let Some(rest) = line.strip_prefix(NAME_PREFIX) {
            let name = rest.trim();
            if selection.pub_name.is_none() && !name.is_empty() {
                selection.pub_name = Some(name.to_string());
            }
        } else if let Some(rest) = line.strip_prefix(EXPLANATION_PREFIX) {
            if !explanation_seen {
                selection.explanation = rest.trim().to_string();
                explanation_seen = true;
            }
        } else if explanation_seen || selection.pub_name.is_some() {
            let continuation = line.trim();
            if continuation.is_empty() {
                continue;
            }
            if !selection.explanation.is_empty() {
                selection.explanation.push(' ');
            }
            selection.explanation.push_str(continuation);
        }
    }

    selection
}
