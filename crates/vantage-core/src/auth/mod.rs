//! Music-streaming login via the OAuth implicit grant.
//!
//! The provider redirects back with the token in the URL fragment.
//! [`oauth::complete_callback`] parses it and hands it to a
//! [`token::TokenStore`], which persists it with an absolute expiry.

pub mod oauth;
pub mod token;
