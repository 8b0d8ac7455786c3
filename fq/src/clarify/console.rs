//! Console prompter

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::Mutex;

use crate::clarify::prompter::Prompter;

/// Prompter that reads answers from an interactive terminal
pub struct ConsolePrompter {
    editor: Mutex<DefaultEditor>,
}

impl ConsolePrompter {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self {
            editor: Mutex::new(editor),
        })
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        let mut editor = self
            .editor
            .lock()
            .map_err(|_| eyre::eyre!("Readline editor lock poisoned"))?;

        match editor.readline(&format!("{} ", prompt.bright_green())) {
            Ok(line) => {
                let input = line.trim().to_string();
                if !input.is_empty() {
                    let _ = editor.add_history_entry(&input);
                }
                Ok(input)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                Err(eyre::eyre!("Input aborted by user"))
            }
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }
}

impl Prompter for ConsolePrompter {
    fn show(&self, message: &str) {
        println!("{}", message);
    }

    fn ask_text(&self, prompt: &str) -> Result<String> {
        self.read_line(prompt)
    }

    fn ask_yes_no(&self, prompt: &str) -> Result<bool> {
        let answer = self.read_line(&format!("{} (y/n):", prompt))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn wait_for_ready(&self, prompt: &str) -> Result<()> {
        println!("{}", prompt.yellow());
        self.read_line("Press Enter when ready...")?;
        Ok(())
    }
}
