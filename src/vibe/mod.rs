//! Vibe matching
//!
//! Asks a text-generation model which of the closest pubs fits a described
//! vibe, then maps its free-text answer back onto a candidate. Every path
//! yields a usable [`VibeMatchResult`]: without a model the first candidate is
//! returned with a placeholder, a failed call is reported in the explanation,
//! and an unknown pub name falls back to the first candidate with a note.
//!
//! Names are matched by substring containment, so a reply of "Engel" picks
//! "Café Den Engel". When several candidate names contain the reply the
//! closest pub wins, which can be the wrong one.

pub mod gemini;
pub mod prompt;
pub mod reply;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

pub use gemini::GeminiClient;
pub use prompt::{PROMPT_CANDIDATES, build_prompt};
pub use reply::{ModelReply, ModelSelection, parse_reply};

use crate::config::{GOOGLE_API_KEY_ENV, GeminiConfig};
use crate::models::{RankedPub, VibeMatchResult};
use crate::{Result, VibeFinderError};

pub const MISSING_KEY_EXPLANATION: &str = "API key not set. Unable to match vibe.";
pub const NO_EXPLANATION: &str = "No explanation provided by AI";
pub const NO_PICK_NOTE: &str = "AI did not name a pub, showing the closest one instead";

/// A hosted model that turns a prompt into free text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the configured generator, or `None` when no API key is available
pub fn generator_from_config(config: &GeminiConfig) -> Result<Option<Arc<dyn TextGenerator>>> {
    match &config.api_key {
        Some(key) => {
            info!("Vibe matching enabled with model {}", config.model);
            let generator: Arc<dyn TextGenerator> =
                Arc::new(GeminiClient::new(key.clone(), config)?);
            Ok(Some(generator))
        }
        None => {
            warn!(
                "{} environment variable not set. Vibe matching will not work.",
                GOOGLE_API_KEY_ENV
            );
            Ok(None)
        }
    }
}

/// Picks the best pub for a vibe
pub struct VibeMatcher {
    generator: Option<Arc<dyn TextGenerator>>,
    region: String,
}

impl VibeMatcher {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, region: impl Into<String>) -> Self {
        Self {
            generator,
            region: region.into(),
        }
    }

    /// Choose among `candidates` (closest first). Errors only on an empty list.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn match_vibe(
        &self,
        vibe: &str,
        candidates: &[RankedPub],
    ) -> Result<VibeMatchResult> {
        let first = candidates.first().ok_or(VibeFinderError::NoCandidates)?;

        let Some(generator) = &self.generator else {
            return Ok(VibeMatchResult::new(first.clone(), MISSING_KEY_EXPLANATION));
        };

        let names: Vec<&str> = candidates.iter().map(|pub_| pub_.name.as_str()).collect();
        let prompt = build_prompt(vibe, &names, &self.region);

        let reply = match generator.generate(&prompt).await {
            Ok(text) => ModelReply::Selected(parse_reply(&text)),
            Err(e) => ModelReply::Failed(e.to_string()),
        };

        Ok(match reply {
            ModelReply::Selected(selection) => resolve_selection(selection, candidates, first),
            ModelReply::Failed(message) => {
                warn!("Vibe matching failed: {}", message);
                VibeMatchResult::new(first.clone(), format!("Error matching vibe: {message}"))
            }
        })
    }
}

/// Map the model's pick back onto a candidate by substring containment
fn resolve_selection(
    selection: ModelSelection,
    candidates: &[RankedPub],
    first: &RankedPub,
) -> VibeMatchResult {
    let ModelSelection {
        pub_name,
        explanation,
    } = selection;

    if let Some(name) = pub_name.as_deref()
        && let Some(chosen) = candidates.iter().find(|pub_| pub_.name.contains(name))
    {
        info!("Model picked {}", chosen.name);
        return VibeMatchResult::new(chosen.clone(), explanation);
    }

    let note = match pub_name {
        Some(suggestion) => {
            warn!("Model suggestion '{}' matched no candidate", suggestion);
            format!("AI suggested '{suggestion}' but it couldn't be matched to our data")
        }
        None => {
            warn!("Model reply named no pub");
            NO_PICK_NOTE.to_string()
        }
    };

    let explanation = if explanation.is_empty() {
        NO_EXPLANATION.to_string()
    } else {
        explanation
    };
    VibeMatchResult::new(first.clone(), explanation).with_note(note)
}
