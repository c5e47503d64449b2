//! Default value functions for configuration.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_host() -> String {
    "irc.chat.twitch.tv".to_string()
}

pub fn default_port() -> u16 {
    6697
}

pub fn default_true() -> bool {
    true
}

// =============================================================================
// Storage Defaults
// =============================================================================

pub fn default_store_path() -> String {
    "commands.json".to_string()
}

pub fn default_save_interval() -> u64 {
    60
}

// =============================================================================
// Command Defaults
// =============================================================================

pub fn default_cooldown() -> u64 {
    30
}
