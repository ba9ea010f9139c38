// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) parses configuration, opens the store and hands it to the
// command loop.
//
// Module responsibilities:
// - `catalog`: the in-memory category -> meals mapping and its pure
//   add/remove/list operations.
// - `store`: loading and saving the meal file, and `MealStore`, which
//   saves after every change.
// - `recommend`: random meal selection.
// - `config`: command-line flags and logging setup.
// - `ui`: the interactive command loop.
pub mod catalog;
pub mod config;
pub mod recommend;
pub mod store;
pub mod ui;
