//! Line prompt running on its own thread.
//!
//! Parsed lines go to the session as [`UserCommand`]s. Keystrokes in a
//! message also produce throttled typing pings.

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use rustyline::{
    Cmd, ConditionalEventHandler, DefaultEditor, Event, EventContext, EventHandler, KeyCode,
    KeyEvent, RepeatCount, error::ReadlineError,
};
use tokio::sync::mpsc;

use crate::domain::ChatView;

use super::command::UserCommand;

/// Minimum delay between two automatic typing pings.
pub const TYPING_PING_INTERVAL: Duration = Duration::from_secs(1);

/// Queues a typing ping for keystrokes that edit a message
pub struct TypingPinger {
    commands: mpsc::Sender<UserCommand>,
    interval: Duration,
    last_ping: Mutex<Option<Instant>>,
}

impl TypingPinger {
    pub fn new(commands: mpsc::Sender<UserCommand>, interval: Duration) -> Self {
        Self {
            commands,
            interval,
            last_ping: Mutex::new(None),
        }
    }

    /// Handle one key pressed while `line` is the current input.
    ///
    /// Returns `true` when a ping was queued. Enter, command lines and keys
    /// within `interval` of the previous ping are ignored.
    pub fn on_key(&self, key: &KeyEvent, line: &str, now: Instant) -> bool {
        if matches!(key, KeyEvent(KeyCode::Enter, _)) || is_command_line(key, line) {
            return false;
        }
        let Ok(mut last_ping) = self.last_ping.lock() else {
            return false;
        };
        if let Some(at) = *last_ping {
            if now.duration_since(at) < self.interval {
                return false;
            }
        }
        match self.commands.try_send(UserCommand::TypingPing) {
            Ok(()) => {
                *last_ping = Some(now);
                true
            }
            Err(e) => {
                tracing::trace!("Typing ping dropped: {}", e);
                false
            }
        }
    }
}

fn is_command_line(key: &KeyEvent, line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with('/') || (line.is_empty() && matches!(key, KeyEvent(KeyCode::Char('/'), _)))
}

impl ConditionalEventHandler for TypingPinger {
    fn handle(&self, evt: &Event, _: RepeatCount, _: bool, ctx: &EventContext) -> Option<Cmd> {
        if let Some(key) = evt.get(0) {
            self.on_key(key, ctx.line(), Instant::now());
        }
        // Fall through to the default binding
        None
    }
}

/// Read prompt lines until quit, Ctrl-C, end of input, or the session going
/// away.
pub fn read_commands(prompt: &str, commands: &mpsc::Sender<UserCommand>, view: &dyn ChatView) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            tracing::error!("Failed to start prompt: {}", e);
            // Without a prompt the session can never be told to stop
            let _ = commands.blocking_send(UserCommand::Quit);
            return;
        }
    };
    editor.bind_sequence(
        Event::Any,
        EventHandler::Conditional(Box::new(TypingPinger::new(
            commands.clone(),
            TYPING_PING_INTERVAL,
        ))),
    );

    loop {
        let command = match editor.readline(prompt) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    tracing::debug!("Failed to record history: {}", e);
                }
                match line.parse::<UserCommand>() {
                    Ok(command) => command,
                    Err(e) => {
                        view.alert(&e.to_string());
                        continue;
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => UserCommand::Quit,
            Err(e) => {
                tracing::error!("Prompt error: {}", e);
                UserCommand::Quit
            }
        };

        let quit = command == UserCommand::Quit;
        if commands.blocking_send(command).is_err() || quit {
            break;
        }
    }
}
