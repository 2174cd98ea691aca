//! Translate Tool core
//!
//! Client-side core of a hosted-repository translation editor: thin REST
//! clients for GitHub and BitBucket plus the dictionary and codec utilities
//! the editing UI builds on. The UI itself lives elsewhere and talks to this
//! crate through [`clients::HostClient`].

pub mod clients;
pub mod error;
pub mod models;
pub mod utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{Result, TranslateError};

/// Initialize tracing for an embedding application. Call once at startup.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "translate_tool_lib=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
