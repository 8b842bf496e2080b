use std::sync::Arc;

use crate::error::BackendError;
use crate::llm::LlmClient;
use crate::types::{Role, Turn};

/// Log target for the prompt/reply audit trail
pub const TRANSCRIPT_TARGET: &str = "transcript";

/// Ordered transcript of one participant: a system turn followed by user/assistant turns
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_instruction)],
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false; a conversation holds at least its system turn
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn system_instruction(&self) -> &str {
        &self.turns[0].text
    }

    /// Text of the most recent assistant turn
    pub fn last_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.text.as_str())
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    fn truncate(&mut self, len: usize) {
        self.turns.truncate(len.max(1));
    }
}

/// One participant's conversation together with the backend that answers it.
///
/// On a failed call the conversation is rolled back to exactly its pre-call state,
/// so a retried `send` never duplicates the user turn.
pub struct ConversationalContext {
    label: String,
    conversation: Conversation,
    client: Arc<dyn LlmClient>,
}

impl ConversationalContext {
    pub fn new(
        client: Arc<dyn LlmClient>,
        label: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        let label = label.into();
        let conversation = Conversation::new(system_instruction);
        log::debug!(
            target: TRANSCRIPT_TARGET,
            "[{}] system: {}",
            label,
            conversation.system_instruction()
        );
        Self {
            label,
            conversation,
            client,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Sends `prompt` with the full history and returns the trimmed reply
    pub async fn send(&mut self, prompt: impl Into<String>, seed: u64) -> Result<String, BackendError> {
        let checkpoint = self.conversation.len();
        let prompt = prompt.into();
        log::info!(target: TRANSCRIPT_TARGET, "[{}] prompt: {}", self.label, prompt);
        self.conversation.push(Turn::user(prompt));

        let result = self
            .client
            .query(self.conversation.turns(), seed)
            .await
            .and_then(|reply| {
                let reply = reply.trim().to_string();
                if reply.is_empty() {
                    Err(BackendError::MalformedResponse("empty reply".into()))
                } else {
                    Ok(reply)
                }
            });

        match result {
            Ok(reply) => {
                log::info!(target: TRANSCRIPT_TARGET, "[{}] response: {}", self.label, reply);
                self.conversation.push(Turn::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                log::warn!(target: TRANSCRIPT_TARGET, "[{}] backend call failed: {}", self.label, err);
                self.conversation.truncate(checkpoint);
                Err(err)
            }
        }
    }
}
