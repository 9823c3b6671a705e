//! External service integrations.

pub mod config_client {
    pub use crate::config_client::*;
}
