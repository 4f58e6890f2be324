//! Reasoning agents: a system message bound to a chat model, with a bounded
//! ask-validate-correct loop.

pub mod prompts;

use crate::config::AvaliadorConfig;
use llm::{ChatModel, ChatRequest, LlmError, Message};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tooling::async_utils::{with_timeout, TimeoutError};
use tooling::logging::{sanitize_for_logging, truncate_for_log};
use tracing::{debug, warn};

/// Longest prompt/reply excerpt written to debug logs.
const LOG_EXCERPT_CHARS: usize = 400;

/// Per-stage limits shared by all agents.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Round-trips allowed before the stage gives up
    pub max_attempts: u32,

    /// Bound on a single round-trip
    pub request_timeout: Duration,

    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            request_timeout: Duration::from_secs(60),
            temperature: Some(0.3),
            max_tokens: None,
        }
    }
}

impl AgentSettings {
    pub fn from_config(config: &AvaliadorConfig) -> Self {
        Self {
            max_attempts: config.pipeline.max_attempts_per_stage,
            request_timeout: config.pipeline.request_timeout(),
            temperature: Some(config.llm.temperature),
            max_tokens: config.llm.max_tokens,
        }
    }
}

/// Why an agent produced no usable answer.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Every attempt was rejected, timed out or failed transiently
    #[error("{agent} gave no usable reply after {attempts} attempt(s): {last_error}")]
    Exhausted {
        agent: String,
        attempts: u32,
        last_error: String,
    },

    /// The service failed in a way asking again cannot fix
    #[error(transparent)]
    Service(#[from] LlmError),
}

/// A named conversational role backed by a [`ChatModel`].
#[derive(Clone)]
pub struct Agent {
    name: String,
    system_message: String,
    model: Arc<dyn ChatModel>,
    settings: AgentSettings,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model.model_name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        system_message: impl Into<String>,
        model: Arc<dyn ChatModel>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            name: name.into(),
            system_message: system_message.into(),
            model,
            settings,
        }
    }

    /// Extracts the restaurant name and suggests `fetch_restaurant_data`.
    pub fn data_fetch(model: Arc<dyn ChatModel>, settings: AgentSettings) -> Self {
        Self::new(prompts::DATA_FETCH_AGENT, prompts::DATA_FETCH_SYSTEM, model, settings)
    }

    /// Turns review text into `[food], [service]` ratings.
    pub fn review_analyst(model: Arc<dyn ChatModel>, settings: AgentSettings) -> Self {
        Self::new(prompts::REVIEW_ANALYST, prompts::REVIEW_ANALYST_SYSTEM, model, settings)
    }

    /// Suggests `calculate_overall_score` for the collected ratings.
    pub fn score(model: Arc<dyn ChatModel>, settings: AgentSettings) -> Self {
        Self::new(prompts::SCORE_AGENT, prompts::SCORE_AGENT_SYSTEM, model, settings)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    fn request(&self, messages: &[Message]) -> ChatRequest {
        let mut request = ChatRequest::new(messages.to_vec());
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    /// Send `prompt` and return the first reply `accept` turns into a value.
    ///
    /// A rejected reply is kept in the conversation together with a
    /// corrective message carrying the rejection reason, and the service is
    /// asked again. Timeouts and retryable service errors also consume an
    /// attempt. Non-retryable service errors end the loop immediately.
    pub async fn ask_until<T, F>(&self, prompt: &str, mut accept: F) -> Result<T, AgentError>
    where
        F: FnMut(&str) -> Result<T, String>,
    {
        let mut messages = vec![
            Message::system(self.system_message.as_str()),
            Message::human(prompt),
        ];
        let mut last_error = String::from("no attempt made");
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            debug!(
                agent = %self.name,
                attempt,
                prompt = %truncate_for_log(&sanitize_for_logging(messages.last().map_or("", Message::text)), LOG_EXCERPT_CHARS),
                "Sending prompt"
            );

            let outcome = with_timeout(
                self.settings.request_timeout,
                self.model.chat(self.request(&messages)),
            )
            .await;

            let reply = match outcome {
                Ok(response) => response.text().to_string(),
                Err(TimeoutError::Timeout(after)) => {
                    warn!(agent = %self.name, attempt, max_attempts, ?after, "Reasoning service timed out");
                    last_error = format!("timed out after {:?}", after);
                    continue;
                }
                Err(TimeoutError::OperationFailed(e)) if e.is_retryable() => {
                    warn!(agent = %self.name, attempt, max_attempts, error = %e, "Reasoning service failed, will retry");
                    last_error = e.to_string();
                    continue;
                }
                Err(TimeoutError::OperationFailed(e)) => {
                    warn!(agent = %self.name, attempt, error = %e, "Reasoning service failed, not retrying");
                    return Err(AgentError::Service(e));
                }
            };

            debug!(
                agent = %self.name,
                attempt,
                reply = %truncate_for_log(&sanitize_for_logging(&reply), LOG_EXCERPT_CHARS),
                "Received reply"
            );

            match accept(&reply) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    warn!(agent = %self.name, attempt, max_attempts, reason = %reason, "Reply rejected");
                    messages.push(Message::assistant(reply).with_name(self.name.as_str()));
                    messages.push(Message::human(prompts::corrective(&reason)));
                    last_error = reason;
                }
            }
        }

        Err(AgentError::Exhausted {
            agent: self.name.clone(),
            attempts: max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm::ChatResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Step {
        Reply(&'static str),
        Fail(fn() -> LlmError),
        Hang,
    }

    struct Script {
        steps: Mutex<VecDeque<Step>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl Script {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for Script {
        async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(Step::Reply(text)) => Ok(ChatResponse::from_text(text)),
                Some(Step::Fail(make)) => Err(make()),
                Some(Step::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(ChatResponse::from_text("late"))
                }
                None => Err(LlmError::InvalidResponse("script exhausted".into())),
            }
        }

        fn model_name(&self) -> &str {
            "script"
        }
    }

    fn agent(script: Arc<Script>, max_attempts: u32) -> Agent {
        let settings = AgentSettings {
            max_attempts,
            ..Default::default()
        };
        Agent::new("tester", "Responda com um número.", script, settings)
    }

    fn number(reply: &str) -> Result<i64, String> {
        reply.trim().parse().map_err(|_| format!("'{}' is not a number", reply))
    }

    #[tokio::test]
    async fn test_first_reply_accepted() {
        let script = Script::new(vec![Step::Reply("42")]);
        let value = agent(script.clone(), 2).ask_until("?", number).await.unwrap();

        assert_eq!(value, 42);
        let requests = script.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[0].content, "Responda com um número.");
        assert_eq!(requests[0].config.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_rejection_sends_correction() {
        let script = Script::new(vec![Step::Reply("quarenta"), Step::Reply("40")]);
        let value = agent(script.clone(), 2).ask_until("?", number).await.unwrap();

        assert_eq!(value, 40);
        let second = &script.requests()[1];
        assert_eq!(second.messages.len(), 4);
        assert_eq!(second.messages[2].content, "quarenta");
        assert_eq!(second.messages[2].name.as_deref(), Some("tester"));
        assert!(second.messages[3].content.contains("'quarenta' is not a number"));
    }

    #[tokio::test]
    async fn test_budget_exhausted() {
        let script = Script::new(vec![Step::Reply("a"), Step::Reply("b"), Step::Reply("3")]);
        let err = agent(script.clone(), 2).ask_until("?", number).await.unwrap_err();

        match err {
            AgentError::Exhausted { agent, attempts, last_error } => {
                assert_eq!(agent, "tester");
                assert_eq!(attempts, 2);
                assert!(last_error.contains("'b'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(script.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_consumes_attempt() {
        let script = Script::new(vec![Step::Hang, Step::Reply("7")]);
        let value = agent(script.clone(), 2).ask_until("?", number).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(script.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_exhaust_budget() {
        let script = Script::new(vec![Step::Hang, Step::Hang]);
        let err = agent(script, 2).ask_until("?", number).await.unwrap_err();
        assert!(matches!(err, AgentError::Exhausted { ref last_error, .. } if last_error.contains("timed out")));
    }

    #[tokio::test]
    async fn test_retryable_error_consumes_attempt() {
        let script = Script::new(vec![
            Step::Fail(|| LlmError::ServiceUnavailable("502".into())),
            Step::Reply("9"),
        ]);
        assert_eq!(agent(script, 2).ask_until("?", number).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_auth_error_stops_immediately() {
        let script = Script::new(vec![
            Step::Fail(|| LlmError::AuthenticationError("invalid key".into())),
            Step::Reply("9"),
        ]);
        let err = agent(script.clone(), 3).ask_until("?", number).await.unwrap_err();
        assert!(matches!(err, AgentError::Service(LlmError::AuthenticationError(_))));
        assert_eq!(script.requests().len(), 1);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = AvaliadorConfig::default();
        config.pipeline.max_attempts_per_stage = 5;
        config.pipeline.request_timeout_secs = 12;
        config.llm.max_tokens = Some(256);

        let settings = AgentSettings::from_config(&config);
        assert_eq!(settings.max_attempts, 5);
        assert_eq!(settings.request_timeout, Duration::from_secs(12));
        assert_eq!(settings.max_tokens, Some(256));
    }
}
