//! # avaliador - restaurant scoring from free-text reviews
//!
//! A four-stage pipeline driven by reasoning agents:
//!
//! 1. **Name** - the `data_fetch_agent` turns the user's question into a
//!    `fetch_restaurant_data(restaurant_name='...')` call, which the
//!    [`call::CallEvaluator`] runs against the [`ReviewStore`].
//! 2. **Analysis** - the `review_analyst` rates each review as
//!    `[food...], [service...]`, read back by [`analysis::parse_scores`].
//! 3. **Score** - the `score_agent` suggests
//!    `calculate_overall_score(...)`, evaluated through the
//!    [`scoring`] engine.
//! 4. **Outcome** - the [`Pipeline`] maps the result, or the first stage
//!    failure, to one [`PipelineOutcome`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use avaliador::config::{ConfigLoader, ConfigOverrides};
//! use avaliador::provider::build_chat_model;
//! use avaliador::Pipeline;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ConfigLoader::new().load(&ConfigOverrides::default()).await?;
//! config.validate()?;
//!
//! let pipeline = Pipeline::new(&config, build_chat_model(&config)?).await?;
//! let outcome = pipeline.run("Qual é a avaliação do Estação Barão?").await?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod analysis;
pub mod call;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod reviews;
pub mod scoring;

pub use agent::{Agent, AgentError, AgentSettings};
pub use call::{CallError, CallEvaluator, CallExpression, CallOutput, RegisteredFunction, Value};
pub use config::AvaliadorConfig;
pub use error::{AvaliadorError, Result};
pub use pipeline::{Pipeline, PipelineOutcome, Stage};
pub use reviews::{ReviewSet, ReviewStore};
pub use scoring::{format_score, score, RatingPair, ScoreResult};
