//! UI utilities for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

fn prompt(username: &str) -> String {
    format!("{}> ", username)
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(username: &str) {
    print!("{}", prompt(username));
    std::io::stdout().flush().ok();
}

/// Spawn the blocking readline thread.
///
/// Non-blank lines are forwarded on the returned channel. The channel closes
/// when the user presses Ctrl+C / Ctrl+D, which ends the client. The thread
/// outlives individual connections so reconnects keep the same editor.
pub fn spawn_input_thread(username: &str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = prompt(username);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
