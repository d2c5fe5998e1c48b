pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod logger;
pub mod models;

pub use client::AvatarClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::{AvatarError, Result};
pub use models::*;
