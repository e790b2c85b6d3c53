//! Terminal front end — line-oriented driver for one editing session.
//!
//! Each input line is typed into the document one character at a time and
//! finished with Enter. A few `:`-prefixed lines are commands instead. Session
//! updates are printed as they happen; logs go to stderr so stdout stays the
//! document view.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use crate::controller::{EditingSession, Key, SessionUpdate};
use crate::notify::NotificationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Keys to feed through arbitration, in order.
    Type(Vec<Key>),
    /// Commit the shown suggestion; nothing happens when none is shown.
    Accept,
    Reject,
    Show,
    Home,
}

/// Map one input line to a command.
#[must_use]
pub fn parse_line(line: &str) -> Command {
    match line.trim_end_matches(['\r', '\n']) {
        ":tab" => Command::Type(vec![Key::Tab]),
        ":accept" => Command::Accept,
        ":esc" | ":reject" => Command::Reject,
        ":show" => Command::Show,
        ":home" | ":quit" => Command::Home,
        text => Command::Type(text.chars().map(Key::Char).chain(std::iter::once(Key::Enter)).collect()),
    }
}

/// What to print for an update, if anything.
#[must_use]
pub fn render(update: &SessionUpdate, document: &str) -> Option<String> {
    match update {
        SessionUpdate::Connected => Some("* connected".to_owned()),
        SessionUpdate::Disconnected => Some("* disconnected; edits stay local".to_owned()),
        SessionUpdate::DocumentReplaced => Some(format!("--- document ---\n{document}\n----------------")),
        SessionUpdate::Notified(n) => Some(match n.kind {
            NotificationKind::Success => format!("+ {}", n.message),
            NotificationKind::Failure => format!("- {}", n.message),
        }),
        SessionUpdate::SuggestionShown(text) => Some(format!("? suggestion: {text:?}  (:accept or :tab, :esc reject)")),
        SessionUpdate::NotificationsExpired(_) | SessionUpdate::SuggestionRequested | SessionUpdate::SuggestionDropped => {
            None
        }
    }
}

/// Drive `session` from `input` until `:home`, EOF, or Ctrl-C, then close it.
///
/// # Errors
///
/// Only I/O errors on `input` or `output`.
pub async fn run<R, W>(session: &mut EditingSession, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    write_line(&mut output, &format!("joined room {}; type to edit, :home to leave", session.room_id())).await?;
    write_line(&mut output, session.document()).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !apply_command(session, parse_line(&line), &mut output).await? {
                    break;
                }
            }
            update = session.next_update() => {
                let Some(update) = update else { break };
                if let Some(text) = render(&update, session.document()) {
                    write_line(&mut output, &text).await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    session.close();
    write_line(&mut output, "left room").await
}

/// Returns `false` when the session should end.
async fn apply_command<W>(session: &mut EditingSession, command: Command, output: &mut W) -> io::Result<bool>
where
    W: AsyncWrite + Unpin,
{
    match command {
        Command::Type(keys) => {
            for key in keys {
                session.handle_key(key);
            }
        }
        Command::Accept => {
            if session.apply_suggestion() {
                write_line(output, session.document()).await?;
            }
        }
        Command::Reject => {
            if session.dismiss_suggestion() {
                write_line(output, "suggestion dismissed").await?;
            }
        }
        Command::Show => write_line(output, session.document()).await?,
        Command::Home => return Ok(false),
    }
    Ok(true)
}

async fn write_line<W>(output: &mut W, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
