use std::borrow::Cow;

use tracing::debug;

use crate::checker::{Availability, AvailabilityChecker};
use crate::command::{self, Command, MalformedCommand};
use crate::platform::IncomingMessage;

pub const GREETING: &str = "Hi!";

pub const HELP: &str = "Commands:\n\
     /start - Say hello\n\
     /help - Show this message\n\
     /check <product id> - Check whether a product is in stock";

pub const USAGE: &str = "Usage: /check <product id>";

/// Longest product id echoed back verbatim in a `/check` reply.
const MAX_ECHOED_ID_CHARS: usize = 64;

/// Maps inbound commands to replies. Holds no per-conversation state: each
/// message is answered on its own, with at most one reply.
pub struct CommandDispatcher {
    label: String,
    checker: AvailabilityChecker,
}

impl CommandDispatcher {
    pub fn new(label: impl Into<String>, checker: AvailabilityChecker) -> Self {
        Self {
            label: label.into(),
            checker,
        }
    }

    /// Returns the reply for `incoming`, or `None` when the message is not a
    /// recognized command for this bot.
    pub async fn handle(&self, incoming: &IncomingMessage) -> Option<String> {
        let command = match command::parse(&incoming.text, incoming.bot_username.as_deref()) {
            Ok(command) => command,
            Err(MalformedCommand::NotACommand) => return None,
            Err(e @ MalformedCommand::AddressedElsewhere { .. }) => {
                debug!("Ignoring command in chat {}: {}", incoming.chat_id, e);
                return None;
            }
            Err(e @ MalformedCommand::MissingArgument { .. }) => {
                debug!("Malformed command from chat {}: {}", incoming.chat_id, e);
                return Some(USAGE.to_string());
            }
        };

        match command {
            Command::Start => Some(GREETING.to_string()),
            Command::Help => Some(HELP.to_string()),
            Command::Check(id) => {
                let availability = self.checker.check(id).await;
                Some(self.format_reply(id, availability))
            }
            Command::Unrecognized(name) => {
                debug!("Ignoring unrecognized command /{}", name);
                None
            }
        }
    }

    fn format_reply(&self, id: &str, availability: Availability) -> String {
        let status = match availability {
            Availability::InStock => "is in Stock!",
            Availability::OutOfStock => "is NOT in Stock.",
            Availability::Unknown => "is not known.",
        };
        format!("{} {} {}", self.label, echoed_id(id), status)
    }
}

fn echoed_id(id: &str) -> Cow<'_, str> {
    match id.char_indices().nth(MAX_ECHOED_ID_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &id[..cut])),
        None => Cow::Borrowed(id),
    }
}
