// Runtime configuration for the client.
// Everything has a default; the only override is the catalog base URL,
// taken from `POKEDEX_API_URL` so the CLI can be pointed at a mirror.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Build the configuration from `POKEDEX_API_URL`, falling back to
    /// the public PokeAPI endpoint when unset or blank.
    pub fn from_env() -> Self {
        let base_url = std::env::var("POKEDEX_API_URL").ok();
        Self::with_base_url(base_url.as_deref())
    }

    fn with_base_url(base_url: Option<&str>) -> Self {
        let mut cfg = Config::default();
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            cfg.base_url = url.trim_end_matches('/').to_string();
        }
        cfg
    }

    /// URL of the first page of location areas.
    pub fn first_page_url(&self) -> String {
        format!("{}/location-area?limit={}", self.base_url, self.page_size)
    }

    pub fn location_url(&self, id: &str) -> String {
        format!("{}/location-area/{}/", self.base_url, id)
    }

    pub fn pokemon_url(&self, id: &str) -> String {
        format!("{}/pokemon/{}/", self.base_url, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_urls_point_at_pokeapi() {
        let cfg = Config::default();
        assert_eq!(
            cfg.first_page_url(),
            "https://pokeapi.co/api/v2/location-area?limit=20"
        );
        assert_eq!(
            cfg.location_url("canalave-city-area"),
            "https://pokeapi.co/api/v2/location-area/canalave-city-area/"
        );
        assert_eq!(
            cfg.pokemon_url("pikachu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu/"
        );
    }

    #[test]
    fn override_trims_trailing_slash() {
        let cfg = Config::with_base_url(Some("http://localhost:9000/api/"));
        assert_eq!(cfg.base_url, "http://localhost:9000/api");
        assert_eq!(cfg.pokemon_url("mew"), "http://localhost:9000/api/pokemon/mew/");
    }

    #[test]
    fn blank_override_keeps_default() {
        let cfg = Config::with_base_url(Some("   "));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }
}
