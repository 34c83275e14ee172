//! Chat Loop
//!
//! A turn moves the loop from `Idle` to `Responding` and back. The front end
//! can split a turn in two (`begin_turn`, `finish_turn`) to show a working
//! indicator while the responder runs.

use crate::responder::Responder;
use crate::session::{Role, SessionSnapshot, SessionStore};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatState {
    /// Waiting for input.
    Idle,
    /// A question has been recorded and the responder has not answered yet.
    Responding { question: String },
}

pub struct ChatLoop {
    responder: Arc<Responder>,
    state: ChatState,
}

impl ChatLoop {
    pub fn new(responder: Arc<Responder>) -> Self {
        Self {
            responder,
            state: ChatState::Idle,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Records the user's message and enters `Responding`.
    ///
    /// Blank input, or input while a turn is already outstanding, is ignored
    /// and returns `false`.
    pub fn begin_turn(&mut self, store: &mut SessionStore, input: &str) -> bool {
        if input.trim().is_empty() || self.state != ChatState::Idle {
            return false;
        }

        store.append_message(Role::User, input);
        self.state = ChatState::Responding {
            question: input.to_string(),
        };
        debug!("Chat loop is responding");
        true
    }

    /// Runs the responder for the outstanding question, records the reply and
    /// returns to `Idle`. Without an outstanding question this only takes a
    /// snapshot.
    pub async fn finish_turn(&mut self, store: &mut SessionStore) -> SessionSnapshot {
        if let ChatState::Responding { question } = &self.state {
            let reply = self.responder.respond(question).await;
            store.append_message(Role::Assistant, reply);
            info!(
                online = self.responder.is_online(),
                messages = store.transcript().len(),
                "Chat turn complete"
            );
        }
        self.state = ChatState::Idle;
        store.snapshot()
    }

    /// Runs a complete turn. Returns `None` when the input was ignored.
    pub async fn submit(
        &mut self,
        store: &mut SessionStore,
        input: &str,
    ) -> Option<SessionSnapshot> {
        if !self.begin_turn(store, input) {
            return None;
        }
        Some(self.finish_turn(store).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{CompletionError, CompletionOptions, MockCompletionClient};
    use crate::responder::{GENERIC_ANSWER, MECHATRONICS_ANSWER};

    fn offline_loop() -> ChatLoop {
        ChatLoop::new(Arc::new(Responder::offline()))
    }

    #[tokio::test]
    async fn test_a_turn_appends_question_then_answer() {
        let mut store = SessionStore::new();
        let mut chat = offline_loop();

        let snapshot = chat.submit(&mut store, "What is mechatronics?").await.unwrap();

        assert_eq!(snapshot.messages.len(), 3);
        let last_two = &snapshot.messages[1..];
        assert_eq!(last_two[0].role(), Role::User);
        assert_eq!(last_two[0].content(), "What is mechatronics?");
        assert_eq!(last_two[1].role(), Role::Assistant);
        assert_eq!(last_two[1].content(), MECHATRONICS_ANSWER);
        assert_eq!(chat.state(), &ChatState::Idle);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut store = SessionStore::new();
        let mut chat = offline_loop();

        assert!(chat.submit(&mut store, "   ").await.is_none());
        assert_eq!(store.transcript().len(), 1);
        assert_eq!(chat.state(), &ChatState::Idle);
    }

    #[tokio::test]
    async fn test_split_turn_exposes_responding_state() {
        let mut store = SessionStore::new();
        let mut chat = offline_loop();

        assert!(chat.begin_turn(&mut store, "hello"));
        assert_eq!(
            chat.state(),
            &ChatState::Responding {
                question: "hello".to_string()
            }
        );
        assert!(!chat.begin_turn(&mut store, "second question"));

        let snapshot = chat.finish_turn(&mut store).await;
        assert_eq!(chat.state(), &ChatState::Idle);
        assert_eq!(snapshot.messages.last().unwrap().content(), GENERIC_ANSWER);
        assert_eq!(snapshot.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_completion_still_returns_to_idle() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _, _| Err(CompletionError::MissingConfiguration));
        let responder = Responder::online(
            Arc::new(client),
            String::new(),
            CompletionOptions::default(),
        );
        let mut store = SessionStore::new();
        let mut chat = ChatLoop::new(Arc::new(responder));

        let snapshot = chat.submit(&mut store, "mechatronics?").await.unwrap();
        assert_eq!(snapshot.messages.last().unwrap().content(), MECHATRONICS_ANSWER);
        assert_eq!(chat.state(), &ChatState::Idle);
    }
}
