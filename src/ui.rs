// UI layer: the line-oriented REPL. Reads a line, tokenizes it, looks the
// first token up in the command table and runs the handler. Failures are
// printed and the loop keeps going; only `exit` or end of input stop it.

use std::io::{BufRead, Write};

use anyhow::Result;
use rand::RngCore;
use tracing::debug;

use crate::api::Catalog;
use crate::commands::{Context, Flow, Registry};
use crate::session::Session;

pub const PROMPT: &str = "Pokedex > ";

/// Split a raw line into lowercase tokens on runs of whitespace.
pub fn clean_input(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

pub struct Repl<C, G> {
    registry: Registry,
    session: Session,
    catalog: C,
    rng: G,
}

impl<C: Catalog, G: RngCore> Repl<C, G> {
    pub fn new(catalog: C, rng: G) -> Self {
        Repl {
            registry: Registry::new(),
            session: Session::new(),
            catalog,
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Run until `exit` or end of input. Only I/O errors on `input` or
    /// `out` are returned.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                debug!("end of input");
                break;
            }
            if self.execute(&line, &mut out)? == Flow::Exit {
                break;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Handle one input line. Command failures are printed as
    /// `Error: ...` and reported as `Flow::Continue`.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        let words = clean_input(line);
        let Some((name, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let Some(&cmd) = self.registry.get(name) else {
            writeln!(out, "unknown command")?;
            return Ok(Flow::Continue);
        };

        debug!(command = cmd.name, ?args, "dispatch");
        let mut ctx = Context {
            session: &mut self.session,
            catalog: &self.catalog,
            rng: &mut self.rng,
            out: &mut *out,
            registry: &self.registry,
        };
        match (cmd.handler)(&mut ctx, args) {
            Ok(flow) => Ok(flow),
            Err(err) => {
                debug!(command = cmd.name, error = %err, "command failed");
                writeln!(out, "Error: {:#}", err)?;
                Ok(Flow::Continue)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits() {
        assert_eq!(
            clean_input("Charmander Bulbasaur PIKACHU"),
            ["charmander", "bulbasaur", "pikachu"]
        );
        assert_eq!(clean_input("hello world"), ["hello", "world"]);
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(clean_input("  hello   world "), ["hello", "world"]);
        assert_eq!(clean_input("\tcatch\t\tMr  Mime\n"), ["catch", "mr", "mime"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(clean_input("").is_empty());
        assert!(clean_input("   \t \r\n").is_empty());
    }
}
