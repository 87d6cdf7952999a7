// API client module: a small blocking HTTP client for the PokeAPI
// catalog. Every call is a single GET that decodes one JSON shape.
//
// The `Catalog` trait is the seam the command handlers talk to, so the
// REPL can be driven against an in-memory catalog in tests.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Failure kinds of a single catalog request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("bad response: {status} - {body}")]
    Status { status: StatusCode, body: String },

    /// The body did not match the expected JSON shape.
    #[error("failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A `{name, url}` pair, the catalog's generic reference type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One page of a paginated listing. A missing or null cursor means there
/// is no page in that direction.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationArea {
    pub pokemon_encounters: Vec<Encounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Encounter {
    pub pokemon: NamedResource,
}

/// Creature detail. `base_experience` is null for some entries upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonDetail {
    pub name: String,
    #[serde(default)]
    pub base_experience: Option<i64>,
    pub height: i64,
    pub weight: i64,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub stat: NamedResource,
    pub base_stat: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Read access to the remote catalog.
pub trait Catalog {
    /// Cursor used by `map` when no next page has been recorded yet.
    fn first_page_url(&self) -> String;

    fn fetch_page(&self, url: &str) -> Result<PageResponse, ApiError>;

    fn fetch_location(&self, id: &str) -> Result<LocationArea, ApiError>;

    fn fetch_pokemon(&self, id: &str) -> Result<PokemonDetail, ApiError>;
}

/// Decode a response body into `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

/// Blocking client for the public catalog service.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pokedex-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ApiClient { client, config })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let spinner = spinner("Fetching...");
        let result = self.get_body(url);
        spinner.finish_and_clear();
        decode(&result?)
    }

    fn get_body(&self, url: &str) -> Result<String, ApiError> {
        debug!(%url, "GET");
        let res = self.client.get(url).send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            warn!(%url, %status, "catalog returned an error status");
            return Err(ApiError::Status { status, body });
        }
        let body = res.text()?;
        debug!(%url, %status, bytes = body.len(), "response received");
        Ok(body)
    }
}

impl Catalog for ApiClient {
    fn first_page_url(&self) -> String {
        self.config.first_page_url()
    }

    fn fetch_page(&self, url: &str) -> Result<PageResponse, ApiError> {
        self.get_json(url)
    }

    fn fetch_location(&self, id: &str) -> Result<LocationArea, ApiError> {
        self.get_json(&self.config.location_url(id))
    }

    fn fetch_pokemon(&self, id: &str) -> Result<PokemonDetail, ApiError> {
        self.get_json(&self.config.pokemon_url(id))
    }
}

/// Spinner shown on stderr while a request is in flight. indicatif hides
/// it when stderr is not a terminal.
fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_page_with_null_previous() {
        let body = r#"{
            "count": 1089,
            "next": "https://pokeapi.co/api/v2/location-area?offset=20&limit=20",
            "previous": null,
            "results": [
                {"name": "canalave-city-area", "url": "https://pokeapi.co/api/v2/location-area/1/"},
                {"name": "eterna-city-area", "url": "https://pokeapi.co/api/v2/location-area/2/"}
            ]
        }"#;
        let page: PageResponse = decode(body).unwrap();
        assert_eq!(
            page.next.as_deref(),
            Some("https://pokeapi.co/api/v2/location-area?offset=20&limit=20")
        );
        assert!(page.previous.is_none());
        let names: Vec<_> = page.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["canalave-city-area", "eterna-city-area"]);
    }

    #[test]
    fn decodes_pokemon_detail() {
        let body = r#"{
            "name": "pidgey",
            "base_experience": 50,
            "height": 3,
            "weight": 18,
            "stats": [
                {"base_stat": 40, "effort": 0, "stat": {"name": "hp", "url": "x"}},
                {"base_stat": 45, "effort": 0, "stat": {"name": "attack", "url": "y"}}
            ],
            "types": [
                {"slot": 1, "type": {"name": "normal", "url": "z"}},
                {"slot": 2, "type": {"name": "flying", "url": "w"}}
            ]
        }"#;
        let detail: PokemonDetail = decode(body).unwrap();
        assert_eq!(detail.name, "pidgey");
        assert_eq!(detail.base_experience, Some(50));
        assert_eq!(detail.stats[1].stat.name, "attack");
        assert_eq!(detail.stats[1].base_stat, 45);
        assert_eq!(detail.types[1].kind.name, "flying");
    }

    #[test]
    fn null_base_experience_is_accepted() {
        let body = r#"{"name":"missingno","base_experience":null,"height":1,"weight":1}"#;
        let detail: PokemonDetail = decode(body).unwrap();
        assert_eq!(detail.base_experience, None);
        assert!(detail.stats.is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode::<LocationArea>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.to_string().starts_with("failed to parse JSON"));

        let err = decode::<LocationArea>(r#"{"pokemon_encounters": 3}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn status_error_mentions_status_and_body() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "bad response: 404 Not Found - Not Found");
    }
}
