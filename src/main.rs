// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, open the meal store and hand it to
//   the command loop.
// - Returns `anyhow::Result`; only a broken stdout ends the program early.

use clap::Parser;
use crossterm::tty::IsTty;
use mealrec_cli::{
    config::Config,
    store::MealStore,
    ui::{Dispatcher, ReaderInput, TerminalInput},
};
use std::io;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.init_logging();

    // Loaded once; every add/remove writes it back to the same file.
    let mut store = MealStore::open(&config.file);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let styled = stdout.is_tty();

    // dialoguer needs a terminal; piped input is read line by line.
    if stdin.is_tty() {
        Dispatcher::new(TerminalInput::default(), stdout.lock())
            .styled(styled)
            .run(&mut store)
    } else {
        Dispatcher::new(ReaderInput::new(stdin.lock()), stdout.lock())
            .styled(styled)
            .run(&mut store)
    }
}
