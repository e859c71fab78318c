//! Server-rendered HTML views: the search form, results and errors

use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tracing::warn;

use crate::finder::{Recommendation, SearchQuery};
use crate::html::escape;
use crate::models::Location;
use crate::web::AppState;
use crate::{Result, VibeFinderError};

const STYLE: &str = r#"<style>
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { color: #b5651d; }
label { display: block; margin-top: .8rem; }
input { padding: .4rem; width: 100%; max-width: 420px; }
button { margin-top: 1rem; padding: .5rem 1.2rem; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border: 1px solid #ddd; padding: .4rem .6rem; text-align: left; }
.match { background: #fff6e5; border-left: 4px solid #b5651d; padding: .8rem 1rem; }
.note, .error { color: #a33; }
iframe { width: 100%; height: 480px; border: 0; margin-top: 1rem; }
</style>"#;

/// Raw form fields, validated by [`SearchForm::into_query`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub latitude: String,
    pub longitude: String,
    pub vibe: String,
}

impl SearchForm {
    pub fn into_query(self) -> Result<SearchQuery> {
        let location = Location::parse(&self.latitude, &self.longitude)?;
        Ok(SearchQuery::new(location, self.vibe))
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index).post(search))
}

async fn index() -> Html<String> {
    Html(form_page())
}

async fn search(
    State(state): State<AppState>,
    form: std::result::Result<Form<SearchForm>, FormRejection>,
) -> Html<String> {
    let outcome = match form {
        Ok(Form(form)) => match form.into_query() {
            Ok(query) => state.finder.recommend_with_map(&query).await,
            Err(e) => Err(e),
        },
        Err(rejection) => Err(VibeFinderError::validation(rejection.body_text())),
    };

    match outcome {
        Ok(recommendation) => Html(results_page(&recommendation)),
        Err(e) => {
            warn!("Search failed: {}", e);
            Html(error_page(&error_text(&e)))
        }
    }
}

/// The message shown on the error view
#[must_use]
pub fn error_text(error: &VibeFinderError) -> String {
    match error {
        VibeFinderError::NoCandidates => error.to_string(),
        other => format!("Error: {other}"),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n<title>{}</title>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

#[must_use]
pub fn form_page() -> String {
    let body = r#"<h1>Vibe Beer Finder</h1>
<p>Tell us where you are and what you're in the mood for.</p>
<form method="post" action="/">
  <label for="latitude">Latitude</label>
  <input id="latitude" name="latitude" value="51.2194" required>
  <label for="longitude">Longitude</label>
  <input id="longitude" name="longitude" value="4.4025" required>
  <button type="button" onclick="locate()">Use my location</button>
  <label for="vibe">Vibe</label>
  <input id="vibe" name="vibe" placeholder="cozy, quiet, lots of Belgian beers">
  <button type="submit">Find my pub</button>
</form>
<script>
function locate() {
  if (!navigator.geolocation) { return; }
  navigator.geolocation.getCurrentPosition(function (position) {
    document.getElementById('latitude').value = position.coords.latitude.toFixed(6);
    document.getElementById('longitude').value = position.coords.longitude.toFixed(6);
  });
}
</script>"#;
    layout("Vibe Beer Finder", body)
}

#[must_use]
pub fn results_page(recommendation: &Recommendation) -> String {
    let choice = &recommendation.vibe_match;
    let mut body = format!(
        "<h1>Your vibe: {}</h1>\n<p>Searching around {}</p>\n<div class=\"match\">\n<h2>{}</h2>\n<p>{}</p>\n<p>{}</p>\n",
        escape(&recommendation.vibe),
        escape(&recommendation.location.format_coordinates()),
        escape(&choice.venue.name),
        escape(&choice.venue.formatted_distance()),
        escape(&choice.explanation)
    );
    if let Some(note) = &choice.note {
        body.push_str(&format!("<p class=\"note\">{}</p>\n", escape(note)));
    }
    body.push_str("</div>\n");

    body.push_str("<table>\n<tr><th>Name</th><th>Distance</th><th>Details</th></tr>\n");
    for pub_ in &recommendation.pubs {
        let details: Vec<String> = pub_
            .extra_tags()
            .map(|(key, value)| format!("{}: {}", escape(key), escape(value)))
            .collect();
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&pub_.name),
            escape(&pub_.formatted_distance()),
            details.join("<br>")
        ));
    }
    body.push_str("</table>\n");

    if let Some(file) = &recommendation.map_file {
        body.push_str(&format!(
            "<iframe src=\"/static/{}\" title=\"Pub map\"></iframe>\n",
            escape(file)
        ));
    }
    body.push_str("<p><a href=\"/\">New search</a></p>");

    layout("Your pub match", &body)
}

#[must_use]
pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Try again</a></p>",
        escape(message)
    );
    layout("Vibe Beer Finder", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RankedPub, Tags, VibeMatchResult};

    fn recommendation() -> Recommendation {
        let venue = RankedPub {
            id: 7,
            name: "Den <Engel>".to_string(),
            latitude: Some(51.2211),
            longitude: Some(4.3997),
            distance_km: 1.2345,
            tags: Tags::from([("website".to_string(), "https://example.org".to_string())]),
        };
        Recommendation {
            location: Location::new(51.2271, 4.4132),
            vibe: "lively".to_string(),
            pubs: vec![venue.clone()],
            vibe_match: VibeMatchResult::new(venue, "Always busy").with_note("check this"),
            map_file: Some("pub_map.html".to_string()),
        }
    }

    #[test]
    fn test_form_fields() {
        let page = form_page();
        for field in ["name=\"latitude\"", "name=\"longitude\"", "name=\"vibe\""] {
            assert!(page.contains(field));
        }
    }

    #[test]
    fn test_results_page() {
        let page = results_page(&recommendation());
        assert!(page.contains("Den &lt;Engel&gt;"));
        assert!(page.contains("1.23 km"));
        assert!(page.contains("Always busy"));
        assert!(page.contains("check this"));
        assert!(page.contains("website: https://example.org"));
        assert!(page.contains("src=\"/static/pub_map.html\""));
    }

    #[test]
    fn test_error_text() {
        assert_eq!(
            error_text(&VibeFinderError::NoCandidates),
            "No pubs found in this area."
        );
        assert!(error_text(&VibeFinderError::validation("bad")).starts_with("Error: "));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = error_page("Error: <script>");
        assert!(page.contains("Error: &lt;script&gt;"));
    }

    #[test]
    fn test_form_parsing() {
        let form = SearchForm {
            latitude: "abc".to_string(),
            longitude: "4.4".to_string(),
            vibe: String::new(),
        };
        assert!(form.into_query().is_err());
    }
}
