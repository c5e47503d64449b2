//! Integration test common infrastructure.
//!
//! Provides a fake chat server that the bot can connect to over plain TCP,
//! plus helpers for building bot configuration against it.

pub mod server;

#[allow(unused_imports)]
pub use server::{ChatServer, ServerConnection};

use slirc_bot::config::Config;

/// Bot configuration pointing at a local plaintext server.
#[allow(dead_code)]
pub fn config_for(port: u16, store_path: &std::path::Path) -> Config {
    Config::from_toml(&format!(
        r##"
[identity]
username = "slircbot"
credential = "s3cret"
channel_name = "#chan"

[server]
host = "127.0.0.1"
port = {port}
tls = false

[storage]
path = "{}"
save_interval_secs = 60
"##,
        store_path.display()
    ))
    .expect("test config is valid")
}
