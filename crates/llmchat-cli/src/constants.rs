pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEYS_FILE_NAME: &str = "keys.toml";
pub const CONVERSATIONS_FILE_NAME: &str = "conversations.json";
pub const HISTORY_FILE_NAME: &str = "history.txt";
pub const BINARY_NAME: &str = env!("CARGO_BIN_NAME");
