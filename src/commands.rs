// Command table and handlers.
//
// The table is built once by `Registry::new` and handed to the REPL; it
// is never mutated afterwards. Each handler gets a `Context` with the
// session, the catalog, a random source and the output sink, plus the
// already-lowercased argument tokens.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context as _, Result};
use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::api::{Catalog, PageResponse};
use crate::session::{CreatureRecord, Session};

/// What the REPL should do after a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub type Handler = fn(&mut Context<'_>, &[String]) -> Result<Flow>;

#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: Handler,
}

/// Everything a handler may touch while it runs.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub catalog: &'a dyn Catalog,
    pub rng: &'a mut dyn RngCore,
    pub out: &'a mut dyn Write,
    pub registry: &'a Registry,
}

/// Immutable name -> command table. Ordered by name, so `help` lists
/// commands alphabetically.
pub struct Registry {
    commands: BTreeMap<&'static str, Command>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let table = [
            Command {
                name: "help",
                description: "List all available commands",
                handler: command_help,
            },
            Command {
                name: "exit",
                description: "Exit the Pokedex",
                handler: command_exit,
            },
            Command {
                name: "map",
                description: "Displays the next page of 20 maps",
                handler: command_map,
            },
            Command {
                name: "mapb",
                description: "Displays the previous page of 20 maps",
                handler: command_map_back,
            },
            Command {
                name: "explore",
                description: "Displays all available pokemon in the location given",
                handler: command_explore,
            },
            Command {
                name: "catch",
                description: "Try to catch a Pokemon by name",
                handler: command_catch,
            },
            Command {
                name: "inspect",
                description: "Shows detailed information about a caught Pokemon",
                handler: command_inspect,
            },
            Command {
                name: "pokedex",
                description: "Lists every Pokemon you have caught",
                handler: command_pokedex,
            },
        ];
        Registry {
            commands: table.into_iter().map(|c| (c.name, c)).collect(),
        }
    }

    /// Exact-match lookup; callers pass lowercased tokens.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

/// Catch chance in percent: `50 - base_experience / 2`, clamped to 5..=95.
pub fn catch_probability(base_experience: i64) -> f64 {
    (50.0 - base_experience as f64 / 2.0).clamp(5.0, 95.0)
}

/// One uniform draw in `[0, 100)` against `probability`.
pub fn roll_catch<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    let draw = rng.gen::<f64>() * 100.0;
    debug!(draw, probability, "catch roll");
    draw < probability
}

fn command_help(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow> {
    writeln!(ctx.out, "Welcome to the Pokedex!")?;
    writeln!(ctx.out, "Usage:")?;
    writeln!(ctx.out)?;
    for cmd in ctx.registry.iter() {
        writeln!(ctx.out, "{}: {}", cmd.name, cmd.description)?;
    }
    Ok(Flow::Continue)
}

fn command_exit(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow> {
    writeln!(ctx.out, "Closing the Pokedex... Goodbye!")?;
    Ok(Flow::Exit)
}

fn command_map(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow> {
    let url = match &ctx.session.next_page_url {
        Some(url) => url.clone(),
        None => ctx.catalog.first_page_url(),
    };
    let page = ctx
        .catalog
        .fetch_page(&url)
        .context("failed to fetch locations")?;
    show_page(ctx, &page)?;
    Ok(Flow::Continue)
}

fn command_map_back(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow> {
    let Some(url) = ctx.session.previous_page_url.clone() else {
        writeln!(ctx.out, "No previous page available.")?;
        return Ok(Flow::Continue);
    };
    let page = ctx
        .catalog
        .fetch_page(&url)
        .context("failed to fetch previous locations")?;
    show_page(ctx, &page)?;
    Ok(Flow::Continue)
}

// Cursors move only once the whole page has been printed.
fn show_page(ctx: &mut Context<'_>, page: &PageResponse) -> Result<()> {
    for loc in &page.results {
        writeln!(ctx.out, "{}", loc.name)?;
    }
    ctx.session.advance(page);
    debug!(
        next = ?ctx.session.next_page_url,
        previous = ?ctx.session.previous_page_url,
        "cursors updated"
    );
    Ok(())
}

fn command_explore(ctx: &mut Context<'_>, args: &[String]) -> Result<Flow> {
    if args.is_empty() {
        writeln!(ctx.out, "Usage: explore <location-name>")?;
        return Ok(Flow::Continue);
    }
    let location = args.join("-");
    let area = ctx
        .catalog
        .fetch_location(&location)
        .context("failed to fetch location")?;

    if area.pokemon_encounters.is_empty() {
        writeln!(ctx.out, "No Pokemon found in this location.")?;
        return Ok(Flow::Continue);
    }
    writeln!(ctx.out, "Pokemon in {}:", location)?;
    for encounter in &area.pokemon_encounters {
        writeln!(ctx.out, "- {}", encounter.pokemon.name)?;
    }
    Ok(Flow::Continue)
}

fn command_catch(ctx: &mut Context<'_>, args: &[String]) -> Result<Flow> {
    if args.is_empty() {
        writeln!(ctx.out, "Usage: catch <pokemon-name>")?;
        return Ok(Flow::Continue);
    }
    let name = args.join("-");
    let detail = ctx
        .catalog
        .fetch_pokemon(&name)
        .context("failed to fetch pokemon")?;

    writeln!(ctx.out, "Throwing a Pokeball at {}...", detail.name)?;
    let probability = catch_probability(detail.base_experience.unwrap_or_default());
    if roll_catch(&mut *ctx.rng, probability) {
        writeln!(ctx.out, "{} was caught!", detail.name)?;
        info!(name = %detail.name, "caught");
        ctx.session.record_catch(CreatureRecord::from(detail));
    } else {
        writeln!(ctx.out, "{} escaped!", detail.name)?;
    }
    Ok(Flow::Continue)
}

fn command_inspect(ctx: &mut Context<'_>, args: &[String]) -> Result<Flow> {
    if args.is_empty() {
        writeln!(ctx.out, "Usage: inspect <pokemon-name>")?;
        return Ok(Flow::Continue);
    }
    let name = args.join("-");
    let Some(pokemon) = ctx.session.caught(&name) else {
        writeln!(ctx.out, "you have not caught that pokemon")?;
        return Ok(Flow::Continue);
    };

    writeln!(ctx.out, "Name: {}", pokemon.name)?;
    writeln!(ctx.out, "Height: {}", pokemon.height)?;
    writeln!(ctx.out, "Weight: {}", pokemon.weight)?;
    writeln!(ctx.out, "Stats:")?;
    for (stat, value) in &pokemon.stats {
        writeln!(ctx.out, "  -{}: {}", stat, value)?;
    }
    writeln!(ctx.out, "Types:")?;
    for kind in &pokemon.types {
        writeln!(ctx.out, "  - {}", kind)?;
    }
    Ok(Flow::Continue)
}

fn command_pokedex(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow> {
    let names = ctx.session.caught_names();
    if names.is_empty() {
        writeln!(ctx.out, "Your Pokedex is empty.")?;
        return Ok(Flow::Continue);
    }
    writeln!(ctx.out, "Your Pokedex:")?;
    for name in names {
        writeln!(ctx.out, " - {}", name)?;
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn probability_is_linear_in_base_experience() {
        assert_eq!(catch_probability(0), 50.0);
        assert_eq!(catch_probability(40), 30.0);
        assert_eq!(catch_probability(61), 19.5);
    }

    #[test]
    fn probability_clamps_at_both_ends() {
        assert_eq!(catch_probability(200), 5.0);
        assert_eq!(catch_probability(608), 5.0);
        assert_eq!(catch_probability(-100), 95.0);
        assert_eq!(catch_probability(-1000), 95.0);
    }

    #[test]
    fn lowest_draw_always_catches() {
        let mut rng = StepRng::new(0, 0);
        assert!(roll_catch(&mut rng, 5.0));
    }

    #[test]
    fn highest_draw_never_catches() {
        let mut rng = StepRng::new(u64::MAX, 0);
        assert!(!roll_catch(&mut rng, 95.0));
    }

    #[test]
    fn registry_lookup_is_exact() {
        let registry = Registry::new();
        assert!(registry.get("map").is_some());
        assert!(registry.get("mapb").is_some());
        assert!(registry.get("Map").is_none());
        assert!(registry.get("ma").is_none());
    }

    #[test]
    fn registry_lists_commands_alphabetically() {
        let registry = Registry::new();
        let names: Vec<_> = registry.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            ["catch", "exit", "explore", "help", "inspect", "map", "mapb", "pokedex"]
        );
    }
}
