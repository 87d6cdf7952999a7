// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive client.
//
// Module responsibilities:
// - `config`: base URL, page size and request timeout.
// - `api`: blocking HTTP access to the catalog, response shapes and the
//   `Catalog` seam used by the commands.
// - `session`: pagination cursors and caught creatures for one run.
// - `commands`: the command table, the handlers and the catch roll.
// - `ui`: tokenizer and the REPL driver.
pub mod api;
pub mod commands;
pub mod config;
pub mod session;
pub mod ui;
