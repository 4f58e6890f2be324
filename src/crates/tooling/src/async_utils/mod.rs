//! Async utilities
//!
//! Every reasoning-service round-trip is wrapped in [`timeout::with_timeout`]
//! so a stuck provider turns into an ordinary error the caller can count
//! against its attempt budget.
//!
//! ```rust,ignore
//! use tooling::async_utils::with_timeout;
//! use std::time::Duration;
//!
//! let reply = with_timeout(Duration::from_secs(60), model.chat(request)).await?;
//! ```

pub mod timeout;

pub use timeout::{with_timeout, TimeoutError};
