//! Interactive pub map
//!
//! Renders a Leaflet page with the user's position, the ranked pubs (in a
//! marker cluster) and the vibe match highlighted, and writes it to a fixed
//! path under the static directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::html;
use crate::models::{Location, RankedPub, VibeMatchResult};
use crate::{Result, VibeFinderError};

const USER_COLOR: &str = "red";
const PUB_COLOR: &str = "green";
const SELECTED_COLOR: &str = "blue";
const ZOOM: u8 = 15;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Pubs near you</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>
html, body, #map { height: 100%; margin: 0; }
.pin { width: 28px; height: 28px; border-radius: 50%; border: 2px solid #fff;
       box-shadow: 0 0 4px rgba(0,0,0,.5); text-align: center; line-height: 28px; font-size: 15px; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const view = __VIEW__;
const map = L.map('map').setView([view.user.lat, view.user.lon], view.zoom);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  maxZoom: 19,
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
function pin(marker) {
  return L.divIcon({
    className: '',
    html: '<div class="pin" style="background:' + marker.color + '">' + marker.symbol + '</div>',
    iconSize: [28, 28],
    iconAnchor: [14, 14]
  });
}
L.marker([view.user.lat, view.user.lon], { icon: pin(view.user) })
  .bindPopup(view.user.popup)
  .addTo(map);
const cluster = L.markerClusterGroup();
for (const marker of view.pubs) {
  cluster.addLayer(L.marker([marker.lat, marker.lon], { icon: pin(marker) }).bindPopup(marker.popup));
}
map.addLayer(cluster);
</script>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct Marker {
    lat: f64,
    lon: f64,
    color: &'static str,
    symbol: &'static str,
    /// Pre-escaped popup HTML
    popup: String,
}

#[derive(Debug, Serialize)]
struct MapView {
    zoom: u8,
    user: Marker,
    pubs: Vec<Marker>,
}

/// Writes the map page to `{dir}/{file_name}`
#[derive(Debug, Clone)]
pub struct MapWriter {
    dir: PathBuf,
    file_name: String,
}

impl MapWriter {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Render and save the map, returning the file name to embed
    #[instrument(skip_all, fields(pubs = pubs.len()))]
    pub async fn write(
        &self,
        user: &Location,
        pubs: &[RankedPub],
        selected: Option<&VibeMatchResult>,
    ) -> Result<String> {
        let page = render_map(user, pubs, selected)?;
        ensure_dir(&self.dir).await?;

        let path = self.path();
        tokio::fs::write(&path, page).await?;
        debug!("Wrote map to {}", path.display());
        Ok(self.file_name.clone())
    }
}

async fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

fn popup_for(pub_: &RankedPub, explanation: Option<&str>) -> String {
    let mut popup = format!(
        "<b>Name:</b> {}<br><b>Distance:</b> {}<br>",
        html::escape(&pub_.name),
        html::escape(&pub_.formatted_distance())
    );

    if let Some(explanation) = explanation {
        popup.push_str(&format!(
            "<b>Matches Your Vibe:</b> {}<br>",
            html::escape(explanation)
        ));
    }

    for (key, value) in pub_.extra_tags() {
        popup.push_str(&format!(
            "<b>{}:</b> {}<br>",
            html::escape(key),
            html::escape(value)
        ));
    }
    popup
}

/// Build the full HTML page
pub fn render_map(
    user: &Location,
    pubs: &[RankedPub],
    selected: Option<&VibeMatchResult>,
) -> Result<String> {
    let markers = pubs
        .iter()
        .filter_map(|pub_| {
            let coordinates = pub_.coordinates()?;
            let chosen = selected.filter(|choice| choice.venue.id == pub_.id);
            Some(Marker {
                lat: coordinates.latitude,
                lon: coordinates.longitude,
                color: if chosen.is_some() {
                    SELECTED_COLOR
                } else {
                    PUB_COLOR
                },
                symbol: "🍺",
                popup: popup_for(pub_, chosen.map(|choice| choice.explanation.as_str())),
            })
        })
        .collect();

    let view = MapView {
        zoom: ZOOM,
        user: Marker {
            lat: user.latitude,
            lon: user.longitude,
            color: USER_COLOR,
            symbol: "👤",
            popup: "Your Location".to_string(),
        },
        pubs: markers,
    };

    let json = html::script_json(&view)
        .map_err(|e| VibeFinderError::general(format!("Failed to encode map data: {e}")))?;
    Ok(TEMPLATE.replace("__VIEW__", &json))
}
