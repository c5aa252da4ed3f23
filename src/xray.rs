//! Glue around the Xray toolchain: process helpers, key and id generation,
//! installer handling, server config, journal checks and share links.

pub mod command;
pub mod context;
pub mod installer;
pub mod journal;
pub mod keys;
pub mod link;
pub mod network;
pub mod server_config;

pub use context::XrayContext;
pub use keys::KeyPair;
pub use link::VlessLink;
