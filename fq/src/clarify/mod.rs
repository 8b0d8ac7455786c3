//! Clarification handling
//!
//! The resolution loop drains every outstanding clarification of a paused
//! plan run through a [`Prompter`], then resumes the run, repeating until
//! the run leaves the need-clarification state.

pub mod console;
pub mod prompter;
pub mod resolver;

pub use console::ConsolePrompter;
pub use prompter::{Prompter, ScriptedPrompter};
pub use resolver::ResolutionLoop;
