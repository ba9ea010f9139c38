// UI layer: the line-oriented command loop. Reads a command word, asks
// follow-up questions for `add` and `remove`, calls into the store and the
// recommendation engine and prints whatever they return.

use crate::recommend::recommend;
use crate::store::{MealStore, StoreError};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::theme::Theme;
use dialoguer::Input;
use fastrand::Rng;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::num::IntErrorKind;
use tracing::{debug, error};

const COMMAND_SUMMARY: &str =
    "Commands: recommend [category], random, list, add, remove, quit, help";

const HELP: &str = "\
Commands:
  recommend [category]  - recommend a meal (optional category)
  random                - completely random meal
  list                  - list all meals
  add                   - add a meal (interactive)
  remove                - remove a meal (interactive)
  help                  - show this help
  quit                  - exit";

/// Where the dispatcher gets its lines from.
pub trait LineSource {
    /// Show `prompt` and read one line with surrounding whitespace removed.
    /// Returns `None` once the input has ended or was interrupted.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> Option<String>;
}

/// Interactive terminal input through `dialoguer`.
#[derive(Default)]
pub struct TerminalInput {
    theme: PromptTheme,
}

/// Prints prompts exactly as given, without dialoguer's `": "` suffix.
#[derive(Default)]
struct PromptTheme;

impl Theme for PromptTheme {
    fn format_input_prompt(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        _default: Option<&str>,
    ) -> fmt::Result {
        write!(f, "{}", prompt)
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> fmt::Result {
        write!(f, "{}{}", prompt, sel)
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str, _out: &mut dyn Write) -> Option<String> {
        // dialoguer draws on stderr by itself, so `out` is not used here.
        match Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Some(line.trim().to_string()),
            Err(e) => {
                debug!(error = %e, "terminal input closed");
                None
            }
        }
    }
}

/// Line input from any reader, used for piped stdin and in tests.
pub struct ReaderInput<R> {
    reader: R,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        ReaderInput { reader }
    }
}

impl<R: BufRead> LineSource for ReaderInput<R> {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> Option<String> {
        if let Err(e) = write!(out, "{}", prompt).and_then(|_| out.flush()) {
            debug!(error = %e, "could not write prompt");
            return None;
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                debug!(error = %e, "input closed");
                None
            }
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Recommend(Option<String>),
    Random,
    List,
    Add,
    Remove,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a command line. The command word is case-insensitive; blank
    /// lines yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        let mut words = line.split_whitespace();
        let action = words.next()?.to_lowercase();
        let command = match action.as_str() {
            "recommend" => {
                let rest: Vec<&str> = words.collect();
                Command::Recommend((!rest.is_empty()).then(|| rest.join(" ")))
            }
            "random" => Command::Random,
            "list" => Command::List,
            "add" => Command::Add,
            "remove" => Command::Remove,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(action),
        };
        Some(command)
    }
}

enum Flow {
    Continue,
    Quit,
    EndOfInput,
}

/// Runs the command loop over a line source and an output stream.
pub struct Dispatcher<L, W> {
    input: L,
    out: W,
    rng: Rng,
    styled: bool,
}

impl<L: LineSource, W: Write> Dispatcher<L, W> {
    pub fn new(input: L, out: W) -> Self {
        Dispatcher {
            input,
            out,
            rng: Rng::new(),
            styled: false,
        }
    }

    /// Use a specific random generator, e.g. a seeded one.
    pub fn with_rng(mut self, rng: Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Color status messages. Only worth enabling on a terminal.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Run until `quit`/`exit` or the end of input. The only error is
    /// failing to write to the output.
    pub fn run(&mut self, store: &mut MealStore) -> Result<()> {
        self.banner().context("Failed to write to output")?;
        loop {
            let flow = match self.prompt("> ")? {
                Some(line) => match Command::parse(&line) {
                    Some(command) => self.dispatch(command, store)?,
                    None => Flow::Continue,
                },
                None => Flow::EndOfInput,
            };
            match flow {
                Flow::Continue => {}
                Flow::Quit => {
                    writeln!(self.out, "Bye.")?;
                    break;
                }
                Flow::EndOfInput => {
                    writeln!(self.out, "\nExiting.")?;
                    break;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, command: Command, store: &mut MealStore) -> Result<Flow> {
        debug!(?command, "dispatch");
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Recommend(category) => {
                let text = recommend(store.catalog(), category.as_deref(), &mut self.rng);
                writeln!(self.out, "{}", text)?;
            }
            Command::Random => {
                let text = recommend(store.catalog(), None, &mut self.rng);
                writeln!(self.out, "{}", text)?;
            }
            Command::List => writeln!(self.out, "{}", store.catalog().render_list())?,
            Command::Add => return self.handle_add(store),
            Command::Remove => return self.handle_remove(store),
            Command::Unknown(word) => {
                debug!(%word, "unknown command");
                self.notice("Unknown command. Type 'help' for commands.")?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Ask for a category and a meal name, then add it.
    fn handle_add(&mut self, store: &mut MealStore) -> Result<Flow> {
        let Some(category) = self.prompt("Category: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(meal) = self.prompt("Meal name: ")? else {
            return Ok(Flow::EndOfInput);
        };
        if category.is_empty() || meal.is_empty() {
            self.notice("Category and meal name required.")?;
            return Ok(Flow::Continue);
        }
        match store.add(&category, &meal) {
            Ok(outcome) => writeln!(self.out, "{}", outcome)?,
            Err(e) => self.save_failed(&e)?,
        }
        Ok(Flow::Continue)
    }

    /// Ask for a category, show its meals, then ask which one to remove.
    fn handle_remove(&mut self, store: &mut MealStore) -> Result<Flow> {
        let Some(category) = self.prompt("Category: ")? else {
            return Ok(Flow::EndOfInput);
        };
        if category.is_empty() {
            self.notice("Category required.")?;
            return Ok(Flow::Continue);
        }
        let category = category.to_lowercase();
        let meals = match store.catalog().meals(&category) {
            Some(meals) if !meals.is_empty() => meals,
            _ => {
                self.notice(&format!("No such category '{}'.", category))?;
                return Ok(Flow::Continue);
            }
        };

        writeln!(self.out, "Meals in '{}':", category)?;
        for (i, meal) in meals.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, meal)?;
        }

        let Some(answer) = self.prompt("Index to remove: ")? else {
            return Ok(Flow::EndOfInput);
        };
        // A non-number never reaches the store; range checks happen there.
        // Integers too large for i64 are still integers, just out of range.
        let index = match answer.parse::<i64>() {
            Ok(index) => index,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => {
                    self.notice("Invalid index.")?;
                    return Ok(Flow::Continue);
                }
            },
        };
        match store.remove(&category, index) {
            Ok(outcome) => writeln!(self.out, "{}", outcome)?,
            Err(e) => self.save_failed(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        self.out.flush().context("Failed to write to output")?;
        Ok(self.input.read_line(prompt, &mut self.out))
    }

    fn banner(&mut self) -> io::Result<()> {
        if self.styled {
            writeln!(self.out, "{}", "Meal Recommendation App".bold())?;
        } else {
            writeln!(self.out, "Meal Recommendation App")?;
        }
        writeln!(self.out, "{}", COMMAND_SUMMARY)
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        if self.styled {
            writeln!(self.out, "{}", message.yellow())
        } else {
            writeln!(self.out, "{}", message)
        }
    }

    fn save_failed(&mut self, e: &StoreError) -> io::Result<()> {
        error!(error = %e, "could not save meals");
        let message = format!("Could not save meals: {}", e);
        if self.styled {
            writeln!(self.out, "{}", message.red())
        } else {
            writeln!(self.out, "{}", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(script: &str, store: &mut MealStore) -> String {
        let mut out = Vec::new();
        Dispatcher::new(ReaderInput::new(Cursor::new(script.to_string())), &mut out)
            .with_rng(Rng::with_seed(11))
            .run(store)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn scratch_store() -> (TempDir, MealStore) {
        let tmp = TempDir::new().unwrap();
        let store = MealStore::new(tmp.path().join("meals.json"), Catalog::defaults());
        (tmp, store)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  "), None);
        assert_eq!(Command::parse("LIST"), Some(Command::List));
        assert_eq!(Command::parse("?"), Some(Command::Help));
        assert_eq!(Command::parse("Exit"), Some(Command::Quit));
        assert_eq!(Command::parse("recommend"), Some(Command::Recommend(None)));
        assert_eq!(
            Command::parse("recommend Late  Night"),
            Some(Command::Recommend(Some("Late Night".into())))
        );
        assert_eq!(Command::parse("eat"), Some(Command::Unknown("eat".into())));
    }

    #[test]
    fn test_quit_and_banner() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("\nquit\nlist\n", &mut store);
        assert!(output.starts_with("Meal Recommendation App\nCommands:"));
        assert!(output.ends_with("Bye.\n"));
        assert!(!output.contains("Breakfast:"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("list\n", &mut store);
        assert!(output.contains("Breakfast:\n  1. Oatmeal with fruit"));
        assert!(output.ends_with("\nExiting.\n"));
    }

    #[test]
    fn test_end_of_input_during_add() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("add\ndinner\n", &mut store);
        assert!(output.ends_with("\nExiting.\n"));
        assert_eq!(store.catalog(), &Catalog::defaults());
    }

    #[test]
    fn test_add_saves() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("add\nDinner\nTacos\n", &mut store);
        assert!(output.contains("Added 'Tacos' to 'dinner'."));
        let saved = std::fs::read_to_string(store.path()).unwrap();
        assert!(saved.contains("\"Tacos\""));
    }

    #[test]
    fn test_add_requires_both_fields() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("add\ndinner\n\n", &mut store);
        assert!(output.contains("Category and meal name required."));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_remove_flow() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("remove\nLunch\n1\n", &mut store);
        assert!(output.contains("Meals in 'lunch':\n  1. Chicken salad\n  2. Veggie wrap"));
        assert!(output.contains("Removed 'Chicken salad' from 'lunch'."));
        assert_eq!(store.catalog().meals("lunch").unwrap().len(), 2);
    }

    #[test]
    fn test_remove_rejections() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script(
            "remove\n\nremove\ndessert\nremove\nlunch\nsecond\nremove\nlunch\n9\n",
            &mut store,
        );
        assert!(output.contains("Category required."));
        assert!(output.contains("No such category 'dessert'."));
        assert!(output.contains("Invalid index."));
        assert!(output.contains("Index out of range for 'lunch'."));
        assert_eq!(store.catalog(), &Catalog::defaults());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_remove_huge_index_is_out_of_range() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script(
            "remove\nlunch\n99999999999999999999\nremove\nlunch\n-99999999999999999999\n",
            &mut store,
        );
        assert_eq!(output.matches("Index out of range for 'lunch'.").count(), 2);
        assert!(!output.contains("Invalid index."));
        assert_eq!(store.catalog(), &Catalog::defaults());
    }

    #[test]
    fn test_recommend_and_unknown() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("recommend breakfast\nrecommend dessert\nfly\n", &mut store);
        let breakfast = store.catalog().meals("breakfast").unwrap();
        assert!(breakfast.iter().any(|m| output.contains(m.as_str())));
        assert!(output.contains("No meals found for category 'dessert'."));
        assert!(output.contains("Unknown command. Type 'help' for commands."));
    }

    #[test]
    fn test_help() {
        let (_tmp, mut store) = scratch_store();
        let output = run_script("help\n", &mut store);
        assert!(output.contains("recommend [category]  - recommend a meal"));
    }
}
