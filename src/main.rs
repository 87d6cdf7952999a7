// Entrypoint for the Pokedex CLI.
// - Keeps `main` small: set up logging, build the API client and hand it
//   to the REPL.
// - Logs go to stderr so they never interleave with command output.

use std::io;

use pokedex_cli::{api::ApiClient, config::Config, ui::Repl};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = Config::from_env();
    let api = ApiClient::new(config)?;

    // Blocks until `exit` or end of input.
    let mut repl = Repl::new(api, rand::thread_rng());
    repl.run(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
