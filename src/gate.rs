//! Operator confirmation between repositories.
//!
//! Before each repository the gate waits for a single key press: `a`
//! approves every remaining repository, `c` ends the run, anything else
//! steps to the next one. Approving all is permanent for the run.

use std::io::Write;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::error::{Result, SweepError};

/// How the gate treats the next repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Ask before every repository.
    #[default]
    Step,
    /// Proceed without asking.
    All,
}

/// A key press as far as the gate cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Ctrl-C or Escape.
    Interrupt,
    Other,
}

/// The operator's answer for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Process the repository; carries the mode for the rest of the run.
    Proceed(RunMode),
    /// Stop the run before this repository.
    Exit,
}

/// Source of single key presses.
pub trait KeySource {
    /// Blocks until one key is pressed.
    fn read_key(&mut self) -> Result<Key>;
}

/// Reads keys from the terminal in raw mode.
#[derive(Debug, Default)]
pub struct TerminalKeys;

struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(|e| SweepError::Terminal(e.to_string()))?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> Result<Key> {
        let _raw = RawMode::enable()?;

        loop {
            let event = event::read().map_err(|e| SweepError::Terminal(e.to_string()))?;
            let Event::Key(key) = event else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            return Ok(match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
                KeyCode::Esc => Key::Interrupt,
                KeyCode::Char(c) => Key::Char(c),
                _ => Key::Other,
            });
        }
    }
}

/// Replays a fixed list of keys; runs out into `Interrupt`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: std::collections::VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Keys typed as plain characters.
    pub fn chars(keys: &str) -> Self {
        Self::new(keys.chars().map(Key::Char))
    }

    /// Number of keys not yet consumed.
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<Key> {
        Ok(self.keys.pop_front().unwrap_or(Key::Interrupt))
    }
}

/// Prompts the operator before each repository.
pub struct Gate<K, W> {
    keys: K,
    out: W,
}

impl Gate<TerminalKeys, std::io::Stdout> {
    /// A gate on the controlling terminal.
    pub fn terminal() -> Self {
        Self::new(TerminalKeys, std::io::stdout())
    }
}

impl<K: KeySource, W: Write> Gate<K, W> {
    pub fn new(keys: K, out: W) -> Self {
        Self { keys, out }
    }

    /// Asks whether to process `next`, consuming exactly one key in step mode.
    pub fn ask(&mut self, mode: RunMode, next: &str) -> Result<Decision> {
        if mode == RunMode::All {
            return Ok(Decision::Proceed(RunMode::All));
        }

        writeln!(
            self.out,
            "\nPress \"a\" to edit all repos, press \"c\" to exit, press any other key to step to the next repo ({next})\n"
        )?;
        self.out.flush()?;

        Ok(match self.keys.read_key()? {
            Key::Char('a') => Decision::Proceed(RunMode::All),
            Key::Char('c') | Key::Interrupt => Decision::Exit,
            Key::Char(_) | Key::Other => Decision::Proceed(RunMode::Step),
        })
    }

    /// Gives back the key source and output.
    pub fn into_parts(self) -> (K, W) {
        (self.keys, self.out)
    }
}
