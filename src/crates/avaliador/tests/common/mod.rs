//! Common test utilities and setup

#![allow(dead_code)]

use async_trait::async_trait;
use avaliador::{AgentSettings, Pipeline, ReviewStore};
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Two reviews for Estação Barão, one for Applebee's, plus noise lines.
pub const CORPUS: &str = "\
Estação Barão. A comida do Estação Barão foi mediana, sem nada particularmente marcante. O atendimento foi razoável.
Applebee's. A comida foi incrível e o atendimento excelente.
comentário solto sem separador
Estação Barão. Os pratos estavam ótimos e os garçons foram muito atenciosos.
";

/// One scripted reaction of the fake reasoning service.
pub enum Step {
    Reply(String),
    Fail(LlmError),
    /// Never answers within any realistic timeout
    Hang,
}

pub fn reply(text: &str) -> Step {
    Step::Reply(text.to_string())
}

/// Chat model that replays a fixed script and records every request.
pub struct ScriptedModel {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Last message of each request, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.messages.last().map(|m| m.content.clone()))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step::Reply(text)) => Ok(ChatResponse::from_text(text)),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Ok(ChatResponse::from_text("tarde demais"))
            }
            None => Err(LlmError::InvalidResponse("script exhausted".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn settings(max_attempts: u32) -> AgentSettings {
    AgentSettings {
        max_attempts,
        request_timeout: Duration::from_secs(60),
        temperature: Some(0.3),
        max_tokens: None,
    }
}

/// Pipeline over [`CORPUS`] with a two-attempt budget.
pub fn pipeline(model: Arc<ScriptedModel>) -> Pipeline {
    Pipeline::with_store(ReviewStore::from_text(CORPUS), model, settings(2))
}

/// Write `contents` to a temporary file that lives as long as the handle.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write temp file");
    file
}
