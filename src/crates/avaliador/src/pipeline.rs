//! Pipeline controller.
//!
//! Sequences the four stages (name, reviews, analysis, score), hands text to
//! the reasoning agents and feeds their replies through the evaluator and
//! the score text parser. Every stage failure maps to one
//! [`PipelineOutcome`]; only the controller decides what the user reads.

use crate::agent::{Agent, AgentError, AgentSettings};
use crate::analysis::parse_scores;
use crate::call::{extract_call, CallEvaluator, CallOutput, RegisteredFunction, Value};
use crate::config::AvaliadorConfig;
use crate::error::Result;
use crate::reviews::{ReviewSet, ReviewStore};
use crate::scoring::{format_score, RatingPair};
use llm::ChatModel;
use std::fmt;
use std::sync::Arc;
use tooling::logging::timed;
use tracing::{debug, info, warn};

/// Controller state, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingName,
    AwaitingReviews,
    AwaitingAnalysis,
    AwaitingScore,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AwaitingName => "awaiting_name",
            Stage::AwaitingReviews => "awaiting_reviews",
            Stage::AwaitingAnalysis => "awaiting_analysis",
            Stage::AwaitingScore => "awaiting_score",
        };
        f.write_str(name)
    }
}

/// Terminal result of one run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Success { restaurant_name: String, score: f64 },
    NoReviewsFound(String),
    AnalysisFailed,
    ScoringFailed,
    NameExtractionFailed,
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }

    /// The single line shown to the user.
    pub fn message(&self) -> String {
        match self {
            PipelineOutcome::Success { restaurant_name, score } => {
                format!("A pontuação do {} é: {}", restaurant_name, format_score(*score))
            }
            PipelineOutcome::NoReviewsFound(name) => {
                format!("Nenhuma avaliação encontrada para {}.", name)
            }
            PipelineOutcome::AnalysisFailed => {
                "Erro: Não foi possível extrair pontuações das avaliações.".to_string()
            }
            PipelineOutcome::ScoringFailed => {
                "Erro: Não foi possível calcular a pontuação final.".to_string()
            }
            PipelineOutcome::NameExtractionFailed => {
                "Erro: Não foi possível identificar o nome do restaurante.".to_string()
            }
        }
    }
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Line shown when a run ends in an error instead of an outcome.
pub fn processing_error_message(error: &dyn fmt::Display) -> String {
    format!("Erro no processamento: {}", error)
}

/// Restaurant scoring pipeline
pub struct Pipeline {
    reviews: ReviewStore,
    data_fetch: Agent,
    analyst: Agent,
    scorer: Agent,
}

impl Pipeline {
    /// Build the pipeline from configuration: opens the review corpus and
    /// binds the three agents to `model`.
    pub async fn new(config: &AvaliadorConfig, model: Arc<dyn ChatModel>) -> Result<Self> {
        let reviews = ReviewStore::open(&config.reviews.path).await?;
        let settings = AgentSettings::from_config(config);
        Ok(Self::with_store(reviews, model, settings))
    }

    /// Same agents as [`Pipeline::new`], over an already loaded store.
    pub fn with_store(reviews: ReviewStore, model: Arc<dyn ChatModel>, settings: AgentSettings) -> Self {
        Self::from_agents(
            reviews,
            Agent::data_fetch(model.clone(), settings.clone()),
            Agent::review_analyst(model.clone(), settings.clone()),
            Agent::score(model, settings),
        )
    }

    /// Fully custom wiring, one agent per stage.
    pub fn from_agents(reviews: ReviewStore, data_fetch: Agent, analyst: Agent, scorer: Agent) -> Self {
        Self {
            reviews,
            data_fetch,
            analyst,
            scorer,
        }
    }

    /// Run all stages for `query`.
    ///
    /// Stage failures come back as `Ok` outcomes. `Err` is reserved for
    /// failures no stage can absorb, such as a rejected API key.
    pub async fn run(&self, query: &str) -> Result<PipelineOutcome> {
        timed("pipeline", self.run_stages(query)).await
    }

    async fn run_stages(&self, query: &str) -> Result<PipelineOutcome> {
        let evaluator = CallEvaluator::new(&self.reviews);

        info!(stage = %Stage::AwaitingName, "Extracting restaurant name");
        let review_set = match self.fetch_reviews(&evaluator, query).await {
            Ok(set) => set,
            Err(AgentError::Exhausted { .. }) => return Ok(PipelineOutcome::NameExtractionFailed),
            Err(AgentError::Service(e)) => return Err(e.into()),
        };

        let restaurant_name = review_set.restaurant_name.clone();
        info!(stage = %Stage::AwaitingReviews, restaurant = %restaurant_name, reviews = review_set.reviews.len(), "Fetched reviews");
        if review_set.is_empty() {
            return Ok(PipelineOutcome::NoReviewsFound(restaurant_name));
        }

        info!(stage = %Stage::AwaitingAnalysis, "Analysing reviews");
        let ratings = match self.analyse(&review_set).await {
            Ok(pair) => pair.aligned(),
            Err(AgentError::Exhausted { .. }) => return Ok(PipelineOutcome::AnalysisFailed),
            Err(AgentError::Service(e)) => return Err(e.into()),
        };
        debug!(food = ?ratings.food, service = ?ratings.service, "Extracted ratings");

        info!(stage = %Stage::AwaitingScore, "Requesting final score");
        let score = match self.request_score(&evaluator, &restaurant_name, &ratings).await {
            Ok(score) => score,
            Err(AgentError::Exhausted { .. }) => return Ok(PipelineOutcome::ScoringFailed),
            Err(AgentError::Service(e)) => return Err(e.into()),
        };

        info!(restaurant = %restaurant_name, score, "Pipeline finished");
        Ok(PipelineOutcome::Success {
            restaurant_name,
            score,
        })
    }

    async fn fetch_reviews(&self, evaluator: &CallEvaluator<'_>, query: &str) -> std::result::Result<ReviewSet, AgentError> {
        let function = RegisteredFunction::FetchRestaurantData;

        self.data_fetch
            .ask_until(query, |reply| {
                let call = extract_call(reply, function)
                    .ok_or_else(|| format!("a resposta não contém uma chamada a {}", function.name()))?;
                match evaluator.evaluate_as(call, function) {
                    Ok(CallOutput::Reviews(set)) => Ok(set),
                    Ok(other) => Err(format!("resultado inesperado: {}", other)),
                    Err(e) => Err(e.to_string()),
                }
            })
            .await
    }

    async fn analyse(&self, reviews: &ReviewSet) -> std::result::Result<RatingPair, AgentError> {
        self.analyst
            .ask_until(&reviews.joined(), |reply| {
                let pair = parse_scores(reply);
                if pair.is_complete() {
                    Ok(pair)
                } else {
                    Err("esperado o formato [scores_comida], [scores_atendimento]".to_string())
                }
            })
            .await
    }

    async fn request_score(
        &self,
        evaluator: &CallEvaluator<'_>,
        restaurant_name: &str,
        ratings: &RatingPair,
    ) -> std::result::Result<f64, AgentError> {
        let function = RegisteredFunction::CalculateOverallScore;
        let prompt = score_request(restaurant_name, ratings);

        self.scorer
            .ask_until(&prompt, |reply| {
                let call = extract_call(reply, function)
                    .ok_or_else(|| format!("a resposta não contém uma chamada a {}", function.name()))?;
                let result = match evaluator.evaluate_as(call, function) {
                    Ok(CallOutput::Score(result)) => result,
                    Ok(other) => return Err(format!("resultado inesperado: {}", other)),
                    Err(e) => return Err(e.to_string()),
                };

                if !same_restaurant(&result.restaurant_name, restaurant_name) {
                    warn!(expected = %restaurant_name, found = %result.restaurant_name, "Score call names another restaurant");
                    return Err(format!("restaurant_name deve ser '{}'", restaurant_name));
                }
                Ok(result.score)
            })
            .await
    }
}

fn same_restaurant(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// `{'restaurant_name': ..., 'food_scores': [...], 'customer_service_scores': [...]}`
pub fn score_request(restaurant_name: &str, ratings: &RatingPair) -> String {
    Value::Map(vec![
        ("restaurant_name".to_string(), Value::from(restaurant_name)),
        ("food_scores".to_string(), Value::int_list(&ratings.food)),
        ("customer_service_scores".to_string(), Value::int_list(&ratings.service)),
    ])
    .to_string()
}
