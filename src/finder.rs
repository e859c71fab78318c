//! The request pipeline: load, filter, rank, match, render

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::VibeFinderConfig;
use crate::dataset::{self, PoiSource, TagFilter};
use crate::map::MapWriter;
use crate::models::{Location, RankedPub, VibeMatchResult};
use crate::ranking;
use crate::vibe::{self, VibeMatcher};
use crate::{Result, VibeFinderError};

/// One user search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub location: Location,
    pub vibe: String,
}

impl SearchQuery {
    pub fn new(location: Location, vibe: impl Into<String>) -> Self {
        Self {
            location,
            vibe: vibe.into(),
        }
    }
}

/// Closest pubs plus the one the model liked best
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub location: Location,
    pub vibe: String,
    pub pubs: Vec<RankedPub>,
    pub vibe_match: VibeMatchResult,
    /// Set once the map page has been written
    pub map_file: Option<String>,
}

pub struct PubFinder {
    source: Arc<dyn PoiSource>,
    filter: TagFilter,
    matcher: VibeMatcher,
    map: MapWriter,
    max_pubs: usize,
}

impl PubFinder {
    pub fn new(
        source: Arc<dyn PoiSource>,
        filter: TagFilter,
        matcher: VibeMatcher,
        map: MapWriter,
        max_pubs: usize,
    ) -> Self {
        Self {
            source,
            filter,
            matcher,
            map,
            max_pubs,
        }
    }

    /// Wire up the dataset source, the model client and the map writer
    pub fn from_config(config: &VibeFinderConfig) -> Result<Self> {
        let source = dataset::source_from_config(&config.dataset)?;
        let generator = vibe::generator_from_config(&config.gemini)?;
        let matcher = VibeMatcher::new(generator, config.dataset.region.clone());
        let filter = TagFilter::new(
            config.dataset.filter_key.clone(),
            config.dataset.filter_value.clone(),
        );
        let map = MapWriter::new(
            Path::new(&config.server.static_dir),
            config.server.map_file.clone(),
        );

        info!(
            "Pub finder ready: source {}, top {} results",
            source.describe(),
            config.defaults.max_pubs
        );
        Ok(Self::new(
            source,
            filter,
            matcher,
            map,
            config.defaults.max_pubs as usize,
        ))
    }

    /// The closest matching rows, nearest first
    #[instrument(skip(self), fields(location = %location.format_coordinates()))]
    pub async fn top_pubs(&self, location: &Location) -> Result<Vec<RankedPub>> {
        let candidates = dataset::load_filtered(self.source.as_ref(), &self.filter).await?;
        Ok(ranking::rank(candidates, location, self.max_pubs))
    }

    #[instrument(skip(self, query), fields(vibe = %query.vibe))]
    pub async fn recommend(&self, query: &SearchQuery) -> Result<Recommendation> {
        let pubs = self.top_pubs(&query.location).await?;
        if pubs.is_empty() {
            return Err(VibeFinderError::NoCandidates);
        }

        let vibe_match = self.matcher.match_vibe(&query.vibe, &pubs).await?;
        info!(
            "Recommending {} out of {} nearby pubs",
            vibe_match.venue.name,
            pubs.len()
        );

        Ok(Recommendation {
            location: query.location,
            vibe: query.vibe.clone(),
            pubs,
            vibe_match,
            map_file: None,
        })
    }

    /// Like [`Self::recommend`], also writing the map page
    pub async fn recommend_with_map(&self, query: &SearchQuery) -> Result<Recommendation> {
        let mut recommendation = self.recommend(query).await?;
        let file = self
            .map
            .write(
                &recommendation.location,
                &recommendation.pubs,
                Some(&recommendation.vibe_match),
            )
            .await?;
        recommendation.map_file = Some(file);
        Ok(recommendation)
    }
}
