//! User interface layer: prompt parsing, terminal rendering and the session
//! loop tying them to the use cases.

pub mod command;
pub mod prompt;
mod runner;
pub mod session;
pub mod terminal;

pub use command::{CommandParseError, UserCommand};
pub use runner::run;
pub use session::ChatSession;
pub use terminal::TerminalView;
