//! Configuration management for Vantage.
//!
//! Provider endpoints, API keys and search tuning ([`settings::Config`]) are
//! stored as TOML and loaded at startup; secrets may be overlaid from the
//! environment with [`settings::Config::apply_env`].

pub mod settings;
