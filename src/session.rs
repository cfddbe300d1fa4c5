//! Interactive edit session state machine
//!
//! [`EditSession`] drives a sequence of user choices against an
//! [`EntryList`] until the log is saved or the session is abandoned. The
//! session is an explicit state machine over an abstract [`Prompt`], so the
//! same logic runs against a terminal or a scripted input source.
//!
//! Menus are filtered dynamically: an entry menu omits rename when the
//! category is not nameable and omits edge/step moves that would cross a
//! boundary, and the main menu offers "save" only while unsaved changes
//! exist.

use crate::entries::EntryList;
use crate::error::Result;
use crate::logfile;
use crate::menu::{Choice, Prompt};
use crate::types::Entry;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const CHOICE_SAVE: &str = "save";
const CHOICE_QUIT: &str = "quit";
const CHOICE_BACK: &str = "back";
const CHOICE_SET_NAME: &str = "name";
const CHOICE_REMOVE: &str = "remove";
const CHOICE_FIRST: &str = "first";
const CHOICE_LAST: &str = "last";
const CHOICE_UP: &str = "up";
const CHOICE_DOWN: &str = "down";
const CHOICE_YES: &str = "yes";
const CHOICE_NO: &str = "no";
const CHOICE_CHANGE: &str = "change";

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Main menu, no entry selected
    Browsing,
    /// Operating on the entry at this index
    EntryMenu(usize),
    /// Destination exists; waiting for overwrite confirmation.
    /// `then_done` marks a save that was initiated from the quit flow.
    ConfirmOverwrite {
        /// Finish the session once this save resolves
        then_done: bool,
    },
    /// Quit requested with unsaved changes
    ConfirmQuitUnsaved,
    /// Session finished
    Done,
}

/// Orchestrates interactive mutation of a loaded log
#[derive(Debug)]
pub struct EditSession {
    entries: EntryList,
    output_path: PathBuf,
    state: SessionState,
}

impl EditSession {
    /// Create a session over loaded entries, saving to `output_path`
    pub fn new(entries: Vec<Entry>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            entries: EntryList::new(entries),
            output_path: output_path.into(),
            state: SessionState::Browsing,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True iff any mutation occurred since the last completed save
    pub fn is_dirty(&self) -> bool {
        self.entries.is_dirty()
    }

    /// Current save destination (may change during a save attempt)
    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    /// The wrapped entry list
    pub fn entries(&self) -> &EntryList {
        &self.entries
    }

    /// Consume the session, yielding the entries in their final order
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries.into_entries()
    }

    /// Drive the session until [`SessionState::Done`]
    ///
    /// Every transition blocks on `prompt`. Errors from below the prompt
    /// (serialization, file I/O) are fatal and end the run; invalid console
    /// input never reaches this level.
    pub fn run<P: Prompt>(&mut self, prompt: &mut P) -> Result<()> {
        while self.state != SessionState::Done {
            self.state = match self.state {
                SessionState::Browsing => self.step_browsing(prompt)?,
                SessionState::EntryMenu(idx) => self.step_entry_menu(idx, prompt)?,
                SessionState::ConfirmOverwrite { then_done } => {
                    self.step_confirm_overwrite(then_done, prompt)?
                }
                SessionState::ConfirmQuitUnsaved => self.step_confirm_quit(prompt)?,
                SessionState::Done => SessionState::Done,
            };
        }
        info!("Session finished");
        Ok(())
    }

    fn step_browsing<P: Prompt>(&mut self, prompt: &mut P) -> Result<SessionState> {
        let pad = self.category_column_width();
        let mut choices: Vec<Choice> = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| Choice::new(idx.to_string(), entry.summary(pad)))
            .collect();
        if self.entries.is_dirty() {
            choices.push(Choice::new(
                CHOICE_SAVE,
                format!("Save to {}", self.output_path.display()),
            ));
        }
        choices.push(Choice::new(CHOICE_QUIT, "Quit"));

        let choice = prompt.choose(
            "Please select an entry or operation to continue",
            None,
            &choices,
        )?;
        match choice.as_str() {
            CHOICE_SAVE => {
                info!("User chose to save");
                if self.output_path.exists() {
                    Ok(SessionState::ConfirmOverwrite { then_done: false })
                } else {
                    self.write_out()?;
                    Ok(SessionState::Browsing)
                }
            }
            CHOICE_QUIT => {
                info!("User chose to quit");
                if self.entries.is_dirty() {
                    Ok(SessionState::ConfirmQuitUnsaved)
                } else {
                    Ok(SessionState::Done)
                }
            }
            idx => {
                let idx: usize = idx.parse().map_err(|_| {
                    crate::MaplogError::unsupported(format!("unexpected menu key '{}'", idx))
                })?;
                debug!("Entry {} selected", idx);
                Ok(SessionState::EntryMenu(idx))
            }
        }
    }

    fn step_entry_menu<P: Prompt>(&mut self, idx: usize, prompt: &mut P) -> Result<SessionState> {
        let entry = self.entries.get(idx).ok_or_else(|| {
            crate::MaplogError::unsupported(format!("entry index {} out of range", idx))
        })?;
        let is_first = idx == 0;
        let is_last = idx == self.entries.len() - 1;
        let is_nameable = entry.is_nameable();
        let title = format!(
            "Please select an operation to perform on {}",
            entry.summary(0)
        );

        let mut choices = Vec::new();
        if is_nameable {
            choices.push(Choice::new(CHOICE_SET_NAME, "Set name"));
        }
        if !is_first {
            choices.push(Choice::new(CHOICE_FIRST, "Move to first position"));
        }
        if !is_last {
            choices.push(Choice::new(CHOICE_LAST, "Move to last position"));
        }
        if !is_first {
            choices.push(Choice::new(CHOICE_UP, "Move up one position"));
        }
        if !is_last {
            choices.push(Choice::new(CHOICE_DOWN, "Move down one position"));
        }
        choices.push(Choice::new(CHOICE_REMOVE, "Remove from log"));
        choices.push(Choice::new(CHOICE_BACK, "Go back to the main menu"));

        let choice = prompt.choose(
            &title,
            Some("Note that position changes rewrite the entry timestamp"),
            &choices,
        )?;
        match choice.as_str() {
            CHOICE_BACK => {
                debug!("Going back to the main menu");
                Ok(SessionState::Browsing)
            }
            CHOICE_SET_NAME => {
                let new_name =
                    prompt.read_line("Enter new name (or press enter to go back)")?;
                if new_name.is_empty() {
                    debug!("User chose to keep the current name");
                } else {
                    info!("Setting name to '{}'", new_name);
                    self.entries.rename(idx, new_name)?;
                }
                Ok(SessionState::EntryMenu(idx))
            }
            CHOICE_REMOVE => {
                info!("Removing entry...");
                self.entries.remove(idx)?;
                Ok(SessionState::Browsing)
            }
            CHOICE_FIRST => {
                info!("Moving entry to first position...");
                Ok(SessionState::EntryMenu(self.entries.move_to_first(idx)?))
            }
            CHOICE_LAST => {
                info!("Moving entry to last position...");
                Ok(SessionState::EntryMenu(self.entries.move_to_last(idx)?))
            }
            CHOICE_UP => {
                info!("Moving entry up one position...");
                Ok(SessionState::EntryMenu(self.entries.move_up(idx)?))
            }
            CHOICE_DOWN => {
                info!("Moving entry down one position...");
                Ok(SessionState::EntryMenu(self.entries.move_down(idx)?))
            }
            other => Err(crate::MaplogError::unsupported(format!(
                "unexpected menu key '{}'",
                other
            ))),
        }
    }

    fn step_confirm_overwrite<P: Prompt>(
        &mut self,
        then_done: bool,
        prompt: &mut P,
    ) -> Result<SessionState> {
        // A redirected path may no longer exist; in that case the save
        // proceeds without confirmation.
        if !self.output_path.exists() {
            self.write_out()?;
            return Ok(self.after_save(then_done));
        }

        let choices = vec![
            Choice::new(CHOICE_YES, "Yes, overwrite the file"),
            Choice::new(CHOICE_NO, "No, discard changes"),
            Choice::new(CHOICE_CHANGE, "Change output file path"),
        ];
        let title = format!(
            "Are you sure you want to overwrite {}?",
            self.output_path.display()
        );
        match prompt.choose(&title, None, &choices)?.as_str() {
            CHOICE_YES => {
                warn!(
                    "User chose to overwrite existing file {:?}",
                    self.output_path
                );
                self.write_out()?;
                Ok(self.after_save(then_done))
            }
            CHOICE_NO => {
                warn!("User chose to discard changes");
                if then_done {
                    Ok(SessionState::Done)
                } else {
                    Ok(SessionState::Browsing)
                }
            }
            _ => {
                let new_path = prompt.read_line("Enter new output path:")?;
                if !new_path.is_empty() {
                    info!("User chose to change output to {}", new_path);
                    self.output_path = PathBuf::from(new_path);
                }
                Ok(SessionState::ConfirmOverwrite { then_done })
            }
        }
    }

    fn step_confirm_quit<P: Prompt>(&mut self, prompt: &mut P) -> Result<SessionState> {
        let choices = vec![
            Choice::new(
                CHOICE_SAVE,
                format!("Save to {}", self.output_path.display()),
            ),
            Choice::new(CHOICE_QUIT, "Quit without saving"),
            Choice::new(CHOICE_BACK, "Go back to the main menu"),
        ];
        match prompt
            .choose("You have unsaved changes!", None, &choices)?
            .as_str()
        {
            CHOICE_SAVE => {
                info!("User chose to save");
                if self.output_path.exists() {
                    Ok(SessionState::ConfirmOverwrite { then_done: true })
                } else {
                    self.write_out()?;
                    Ok(SessionState::Done)
                }
            }
            CHOICE_QUIT => {
                warn!("User chose to discard changes");
                Ok(SessionState::Done)
            }
            _ => Ok(SessionState::Browsing),
        }
    }

    fn after_save(&self, then_done: bool) -> SessionState {
        if then_done {
            SessionState::Done
        } else {
            SessionState::Browsing
        }
    }

    fn write_out(&mut self) -> Result<()> {
        logfile::write_log(&self.output_path, self.entries.as_slice())?;
        self.entries.mark_clean();
        Ok(())
    }

    fn category_column_width(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.category.to_string().len())
            .max()
            .unwrap_or(0)
            + 1
    }
}
