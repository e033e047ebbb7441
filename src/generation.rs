//! Generation lifecycle
//!
//! Each submission gets a new id and supersedes whatever was in flight: the
//! old task is aborted and any completion it still manages to send is
//! dropped on receipt because its id no longer matches.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::content::prompt::build_messages;
use crate::content::{GeneratedContent, GenerationRequest};
use crate::llm::CompletionClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ready(GeneratedContent),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub id: u64,
    pub request: GenerationRequest,
    pub outcome: Outcome,
}

/// Run one request to completion: prompt, call, parse
pub async fn run_once(client: &dyn CompletionClient, request: &GenerationRequest, region: &str) -> Outcome {
    let messages = build_messages(request, region);
    match client.complete(&request.api_key, messages).await {
        Ok(reply) => {
            let content = GeneratedContent::from_reply(reply, request.generate_image);
            tracing::info!("Generated {} section(s)", content.sections.len());
            Outcome::Ready(content)
        }
        Err(e) => {
            tracing::warn!("Generation failed: {}", e);
            Outcome::Failed(e.to_string())
        }
    }
}

pub struct Generator {
    client: Arc<dyn CompletionClient>,
    region: String,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    current: u64,
    in_flight: Option<JoinHandle<()>>,
    last_request: Option<GenerationRequest>,
}

impl Generator {
    pub fn new(client: Arc<dyn CompletionClient>, region: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            region: region.into(),
            tx,
            rx,
            current: 0,
            in_flight: None,
            last_request: None,
        }
    }

    /// Start generating for `request`, superseding any pending one.
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, request: GenerationRequest) -> u64 {
        self.cancel();
        self.current += 1;
        let id = self.current;

        let client = Arc::clone(&self.client);
        let region = self.region.clone();
        let tx = self.tx.clone();
        let task_request = request.clone();

        tracing::info!("Starting generation #{}", id);
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = run_once(client.as_ref(), &task_request, &region).await;
            let _ = tx.send(Completion {
                id,
                request: task_request,
                outcome,
            });
        }));
        self.last_request = Some(request);
        id
    }

    /// Re-submit the last request unchanged
    pub fn resubmit(&mut self) -> Option<u64> {
        let request = self.last_request.clone()?;
        Some(self.submit(request))
    }

    /// Abort the pending request, if any. Its result will never be delivered.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::debug!("Aborting generation #{}", self.current);
            }
            handle.abort();
            self.current += 1;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    fn accept(&mut self, completion: Completion) -> Option<Completion> {
        if completion.id != self.current {
            tracing::debug!("Discarding stale generation #{}", completion.id);
            return None;
        }
        self.in_flight = None;
        Some(completion)
    }

    /// Non-blocking poll for the current request's completion
    pub fn try_recv(&mut self) -> Option<Completion> {
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(current) = self.accept(completion) {
                return Some(current);
            }
        }
        None
    }

    /// Wait for the current request's completion
    pub async fn recv(&mut self) -> Option<Completion> {
        if self.in_flight.is_none() {
            return None;
        }
        loop {
            let completion = self.rx.recv().await?;
            if let Some(current) = self.accept(completion) {
                return Some(current);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::sections::SectionLabel;
    use crate::llm::{ChatMessage, CompletionError};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Replies with the topic line it was prompted with, after `delay`
    pub(crate) struct EchoClient {
        pub delay: Duration,
        pub fail: bool,
    }

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(&self, _api_key: &str, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(CompletionError::Api("Rate limit reached".to_string()));
            }
            let topic = messages
                .last()
                .and_then(|m| m.content.lines().find(|l| l.contains("Topic overview")))
                .unwrap_or_default()
                .to_string();
            Ok(format!(
                "User Style Summary: Upbeat.\nGenerated LinkedIn Post: {}\nLinkedIn-Optimized Image Prompt: Desk.",
                topic
            ))
        }
    }

    pub(crate) fn request(topic: &str, generate_image: bool) -> GenerationRequest {
        GenerationRequest {
            api_key: "sk-abcdefghijklmnopqrstuvwx".to_string(),
            topic: topic.to_string(),
            profile_url: "https://linkedin.com/in/someone".to_string(),
            industry: "Retail".to_string(),
            generate_image,
        }
    }

    fn generator(delay_ms: u64, fail: bool) -> Generator {
        let client = EchoClient { delay: Duration::from_millis(delay_ms), fail };
        Generator::new(Arc::new(client), "India")
    }

    #[tokio::test]
    async fn test_run_once_parses_reply() {
        let client = EchoClient { delay: Duration::ZERO, fail: false };
        let outcome = run_once(&client, &request("Hiring", false), "India").await;

        let Outcome::Ready(content) = outcome else {
            panic!("expected content");
        };
        let labels: Vec<_> = content.sections.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![SectionLabel::UserStyleSummary, SectionLabel::GeneratedPost]);
        assert!(content.post.contains("Hiring"));
    }

    #[tokio::test]
    async fn test_failure_is_single_message() {
        let client = EchoClient { delay: Duration::ZERO, fail: true };
        let outcome = run_once(&client, &request("Hiring", false), "India").await;
        assert_eq!(outcome, Outcome::Failed("OpenAI API Error: Rate limit reached".to_string()));
    }

    #[tokio::test]
    async fn test_latest_submission_wins() {
        let mut generator = generator(20, false);
        generator.submit(request("First topic", false));
        let second = generator.submit(request("Second topic", true));

        let completion = generator.recv().await.unwrap();
        assert_eq!(completion.id, second);
        assert_eq!(completion.request.topic, "Second topic");
        let Outcome::Ready(content) = completion.outcome else {
            panic!("expected content");
        };
        assert!(content.post.contains("Second topic"));
        assert!(!generator.is_pending());
    }

    #[tokio::test]
    async fn test_stale_completion_discarded() {
        let mut generator = generator(0, false);
        let id = generator.submit(request("Current", false));

        generator
            .tx
            .send(Completion {
                id: id - 1,
                request: request("Stale", false),
                outcome: Outcome::Failed("stale".to_string()),
            })
            .unwrap();

        let completion = generator.recv().await.unwrap();
        assert_eq!(completion.request.topic, "Current");
    }

    #[tokio::test]
    async fn test_cancel_drops_result() {
        let mut generator = generator(10, false);
        generator.submit(request("Cancelled", false));
        generator.cancel();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(generator.try_recv().is_none());
        assert!(generator.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_resubmit_repeats_last_request() {
        let mut generator = generator(0, false);
        assert!(generator.resubmit().is_none());

        generator.submit(request("Again", true));
        let _ = generator.recv().await;
        let id = generator.resubmit().unwrap();

        let completion = generator.recv().await.unwrap();
        assert_eq!(completion.id, id);
        assert_eq!(completion.request, request("Again", true));
    }
}
