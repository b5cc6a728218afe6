//! Terminal line editing for interactive mode, via rustyline.

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::app::LineSource;

const PROMPT: &str = "\nEnter command: ";

/// Interactive reader with line editing and history.
pub struct Repl {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL instance.
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            history_file: None,
        })
    }

    /// Load history from `path` and save back to it on drop.
    pub fn with_history(mut self, path: &Path) -> Self {
        if let Err(e) = self.editor.load_history(path) {
            debug!("Could not load history: {e}");
        }
        self.history_file = Some(path.to_path_buf());
        self
    }

    /// Default history location under the user's local data directory.
    pub fn default_history_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("rusty-table").join("history.txt"))
            .unwrap_or_else(|| PathBuf::from(".rusty_table_history"))
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = self.editor.save_history(path) {
                debug!("Could not save history: {e}");
            }
        }
    }
}

impl LineSource for Repl {
    /// Ctrl-D and Ctrl-C end the session like `exit`.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }
}

impl Drop for Repl {
    fn drop(&mut self) {
        self.save_history();
    }
}
