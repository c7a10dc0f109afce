pub mod telegram;

/// A message received from any platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Platform identifier (e.g., "telegram")
    pub platform: String,
    /// Platform-specific user ID as string
    pub user_id: String,
    /// Platform-specific chat ID as string; replies go back here
    pub chat_id: String,
    /// Display name of the user
    pub user_name: String,
    /// Username the platform knows this bot by; commands addressed to any
    /// other bot are ignored
    pub bot_username: Option<String>,
    /// The raw message text
    pub text: String,
}
