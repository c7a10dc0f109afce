use thiserror::Error;

use crate::catalog::ProductId;

/// A recognized slash command, or the lowercased name of one we do not handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    Help,
    Check(&'a ProductId),
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedCommand {
    #[error("message is not a slash command")]
    NotACommand,
    #[error("command is addressed to @{bot}")]
    AddressedElsewhere { bot: String },
    #[error("/{command} requires an argument")]
    MissingArgument { command: String },
}

/// Parse `/name[@bot] [argument]`.
///
/// Command names and bot usernames compare case-insensitively. A command
/// carrying an `@bot` suffix is only accepted when it names `bot_username`;
/// with no known username every suffix is accepted. The argument is
/// everything after the first run of whitespace, trimmed, and is required
/// by `/check`.
pub fn parse<'a>(
    raw: &'a str,
    bot_username: Option<&str>,
) -> Result<Command<'a>, MalformedCommand> {
    let rest = raw
        .trim_start()
        .strip_prefix('/')
        .ok_or(MalformedCommand::NotACommand)?;

    let (token, remainder) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };

    // Group chats address commands as /check@SomeBot
    let (name, addressee) = match token.split_once('@') {
        Some((name, bot)) => (name, Some(bot)),
        None => (token, None),
    };
    if name.is_empty() {
        return Err(MalformedCommand::NotACommand);
    }

    if let (Some(bot), Some(own)) = (addressee, bot_username) {
        if !bot.eq_ignore_ascii_case(own) {
            return Err(MalformedCommand::AddressedElsewhere {
                bot: bot.to_string(),
            });
        }
    }

    let name = name.to_ascii_lowercase();
    let argument = Some(remainder.trim()).filter(|arg| !arg.is_empty());

    match name.as_str() {
        "start" => Ok(Command::Start),
        "help" => Ok(Command::Help),
        "check" => argument
            .map(Command::Check)
            .ok_or(MalformedCommand::MissingArgument { command: name }),
        _ => Ok(Command::Unrecognized(name)),
    }
}
