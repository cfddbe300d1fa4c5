//! Interactive choice surface
//!
//! The edit session depends only on the [`Prompt`] contract: present a keyed
//! list of choices with descriptions, block until the user supplies a valid
//! key (case-insensitive), re-prompt otherwise. [`ConsolePrompt`] implements
//! it over stdin/stdout for interactive use; [`ScriptedPrompt`] replays a
//! fixed input sequence for headless runs and tests.

use crate::error::{MaplogError, Result};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::{debug, error};

/// One selectable menu item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Key the user types to select this item
    pub key: String,
    /// Human-readable description shown next to the key
    pub description: String,
}

impl Choice {
    /// Create a choice
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// Resolve user input against the offered choices
///
/// Exact matches win; otherwise a case-insensitive match is accepted. The
/// returned key is always the canonical one from `choices`.
pub fn match_choice<'a>(input: &str, choices: &'a [Choice]) -> Option<&'a str> {
    choices
        .iter()
        .find(|c| c.key == input)
        .or_else(|| choices.iter().find(|c| c.key.eq_ignore_ascii_case(input)))
        .map(|c| c.key.as_str())
}

/// Blocking source of user decisions
pub trait Prompt {
    /// Present `choices` under `title` and block until a valid key is entered
    ///
    /// Invalid input is recovered locally by re-prompting and never surfaces
    /// to the caller. Returns the canonical key of the selected choice.
    fn choose(&mut self, title: &str, subtitle: Option<&str>, choices: &[Choice]) -> Result<String>;

    /// Read one line of free-form input (a new name, a new output path)
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Terminal-backed prompt over stdin/stdout
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    /// Create a console prompt
    pub fn new() -> Self {
        Self
    }

    fn read_stdin_line(&self) -> Result<String> {
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(MaplogError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed",
            )));
        }
        Ok(line.trim().to_string())
    }
}

impl Prompt for ConsolePrompt {
    fn choose(&mut self, title: &str, subtitle: Option<&str>, choices: &[Choice]) -> Result<String> {
        let max_key_len = choices.iter().map(|c| c.key.len()).max().unwrap_or(0);
        loop {
            println!();
            println!("===== {} =====", title);
            if let Some(subtitle) = subtitle {
                println!("===== {} =====", subtitle);
            }
            for choice in choices {
                let padding = " ".repeat(max_key_len - choice.key.len());
                println!("[{}] {} {}", choice.key, padding, choice.description);
            }
            print!("> ");
            std::io::stdout().flush()?;

            let input = self.read_stdin_line()?;
            debug!("User entered '{}'", input);
            match match_choice(&input, choices) {
                Some(key) => return Ok(key.to_string()),
                None => error!("Invalid choice '{}'", input),
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        println!("{}", prompt);
        print!("> ");
        std::io::stdout().flush()?;
        self.read_stdin_line()
    }
}

/// Replayable prompt for headless sessions and tests
///
/// Unlike the console, a scripted input that matches no offered key is a
/// programming error in the script, so it fails with
/// [`MaplogError::InvalidChoice`] instead of re-prompting.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    inputs: VecDeque<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that replays `inputs` in order
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether every scripted input has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.inputs.is_empty()
    }

    fn next_input(&mut self) -> Result<String> {
        self.inputs.pop_front().ok_or_else(|| {
            MaplogError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "scripted input exhausted",
            ))
        })
    }
}

impl Prompt for ScriptedPrompt {
    fn choose(&mut self, title: &str, _subtitle: Option<&str>, choices: &[Choice]) -> Result<String> {
        let input = self.next_input()?;
        debug!("Scripted input '{}' for menu '{}'", input, title);
        match_choice(&input, choices)
            .map(|key| key.to_string())
            .ok_or(MaplogError::InvalidChoice(input))
    }

    fn read_line(&mut self, _prompt: &str) -> Result<String> {
        self.next_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<Choice> {
        vec![
            Choice::new("save", "Save the log"),
            Choice::new("quit", "Quit"),
            Choice::new("0", "First entry"),
        ]
    }

    #[test]
    fn test_match_choice_exact_and_case_insensitive() {
        let choices = choices();
        assert_eq!(match_choice("save", &choices), Some("save"));
        assert_eq!(match_choice("QUIT", &choices), Some("quit"));
        assert_eq!(match_choice("0", &choices), Some("0"));
        assert_eq!(match_choice("nope", &choices), None);
    }

    #[test]
    fn test_scripted_prompt_replays_inputs() {
        let mut prompt = ScriptedPrompt::new(["quit", "Front Yard"]);
        assert_eq!(prompt.choose("menu", None, &choices()).unwrap(), "quit");
        assert_eq!(prompt.read_line("name?").unwrap(), "Front Yard");
        assert!(prompt.is_exhausted());
    }

    #[test]
    fn test_scripted_prompt_rejects_unknown_key() {
        let mut prompt = ScriptedPrompt::new(["bogus"]);
        let err = prompt.choose("menu", None, &choices()).unwrap_err();
        assert!(matches!(err, MaplogError::InvalidChoice(_)));
    }

    #[test]
    fn test_scripted_prompt_exhaustion_is_error() {
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        assert!(prompt.choose("menu", None, &choices()).is_err());
    }
}
