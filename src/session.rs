//! Interactive session — the input layer in front of the controller.
//!
//! Reads one command per line, enforces required-field presence before a
//! submit, refuses to dispatch while a request is in flight, and renders
//! the view after every command that can change it.

use std::io::Write;

use time::UtcOffset;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::controller::{FormController, Outcome};
use crate::net::api::UsersApi;
use crate::render::render;
use crate::state::form::{FieldError, FormField};

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

pub const HELP: &str = "\
commands:
  set <username|password> <value>   edit a field (also: username <value>, password <value>)
  submit                            add the user from the form
  fetch                             load all users
  delete                            delete all users
  show                              render the form
  help                              this text
  quit                              leave
";

pub const BUSY: &str = "Подождите, запрос уже выполняется";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Set(FormField, String),
    Submit,
    Fetch,
    Delete,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Command name for logs; never includes field values.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Set(FormField::Username, _) => "set username",
            Self::Set(FormField::Password, _) => "set password",
            Self::Submit => "submit",
            Self::Fetch => "fetch",
            Self::Delete => "delete",
            Self::Show => "show",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("`set` needs a field name")]
    MissingField,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`CommandError`] for unknown commands or field names.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(head, rest)| (head, rest.trim()));

    let command = match head.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(field, value)| (field, value.trim()));
            if field.is_empty() {
                return Err(CommandError::MissingField);
            }
            Command::Set(field.parse()?, value.to_owned())
        }
        "username" => Command::Set(FormField::Username, rest.to_owned()),
        "password" => Command::Set(FormField::Password, rest.to_owned()),
        "submit" | "add" => Command::Submit,
        "fetch" | "list" => Command::Fetch,
        "delete" | "clear" => Command::Delete,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

/// Failure of a one-shot action after its view was printed.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The action failed; carries the status message shown to the user.
    #[error("{0}")]
    ActionFailed(String),
}

/// Print the view after a one-shot action.
///
/// # Errors
///
/// Returns [`ReportError::ActionFailed`] when `outcome` is a failure, and
/// [`ReportError::Io`] if writing to `out` fails.
pub fn report<A, W>(
    controller: &FormController<A>,
    outcome: Outcome,
    out: &mut W,
    offset: UtcOffset,
) -> Result<(), ReportError>
where
    A: UsersApi,
    W: Write,
{
    out.write_all(render(&controller.view(), offset).as_bytes())?;
    out.flush()?;
    match outcome {
        Outcome::Succeeded => Ok(()),
        Outcome::Failed => Err(ReportError::ActionFailed(controller.message().unwrap_or_default())),
    }
}

/// Whether the session should keep reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command to the controller, writing feedback to `out`.
///
/// # Errors
///
/// Returns an I/O error if writing to `out` fails.
pub async fn dispatch<A, W>(
    controller: &mut FormController<A>,
    command: Command,
    out: &mut W,
    offset: UtcOffset,
) -> std::io::Result<Flow>
where
    A: UsersApi,
    W: Write,
{
    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => {
            out.write_all(HELP.as_bytes())?;
            return Ok(Flow::Continue);
        }
        Command::Set(field, value) => controller.on_field_change(field, value),
        Command::Show => {}
        Command::Submit | Command::Fetch | Command::Delete if controller.is_loading() => {
            writeln!(out, "{BUSY}")?;
            return Ok(Flow::Continue);
        }
        Command::Submit => {
            if let Some(field) = controller.form().missing_field() {
                writeln!(out, "Заполните это поле: {}", field.label())?;
                return Ok(Flow::Continue);
            }
            controller.submit().await;
        }
        Command::Fetch => {
            controller.fetch_all().await;
        }
        Command::Delete => {
            controller.delete_all().await;
        }
    }

    out.write_all(render(&controller.view(), offset).as_bytes())?;
    out.flush()?;
    Ok(Flow::Continue)
}

/// Run the interactive loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an I/O error if reading `input` or writing `out` fails.
pub async fn run<A, R, W>(
    controller: &mut FormController<A>,
    input: R,
    out: &mut W,
    offset: UtcOffset,
) -> std::io::Result<()>
where
    A: UsersApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    out.write_all(render(&controller.view(), offset).as_bytes())?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        debug!(command = command.name(), "session command");
        if dispatch(controller, command, out, offset).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
