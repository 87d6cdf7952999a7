// In-memory state of one REPL run: pagination cursors and the creatures
// caught so far. Nothing here outlives the process.

use std::collections::{BTreeMap, HashMap};

use crate::api::{PageResponse, PokemonDetail};

/// A caught creature. Built once on a successful catch, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureRecord {
    pub name: String,
    pub base_experience: i64,
    pub height: i64,
    pub weight: i64,
    /// Sorted by stat name so `inspect` output is stable.
    pub stats: BTreeMap<String, i64>,
    pub types: Vec<String>,
}

impl From<PokemonDetail> for CreatureRecord {
    fn from(detail: PokemonDetail) -> Self {
        CreatureRecord {
            name: detail.name,
            base_experience: detail.base_experience.unwrap_or_default(),
            height: detail.height,
            weight: detail.weight,
            stats: detail
                .stats
                .into_iter()
                .map(|s| (s.stat.name, s.base_stat))
                .collect(),
            types: detail.types.into_iter().map(|t| t.kind.name).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub next_page_url: Option<String>,
    pub previous_page_url: Option<String>,
    caught: HashMap<String, CreatureRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both cursors with the ones carried by `page`. Empty strings
    /// count as "no page in that direction".
    pub fn advance(&mut self, page: &PageResponse) {
        self.next_page_url = page.next.clone().filter(|u| !u.is_empty());
        self.previous_page_url = page.previous.clone().filter(|u| !u.is_empty());
    }

    /// Insert a record, overwriting any earlier catch of the same name.
    pub fn record_catch(&mut self, record: CreatureRecord) {
        self.caught.insert(record.name.clone(), record);
    }

    pub fn caught(&self, name: &str) -> Option<&CreatureRecord> {
        self.caught.get(name)
    }

    pub fn caught_count(&self) -> usize {
        self.caught.len()
    }

    pub fn caught_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.caught.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
