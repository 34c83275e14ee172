//! Question Answering
//!
//! The offline responder is a flat keyword lookup over canned answers. The
//! online responder forwards the question to a `CompletionClient` and, on any
//! failure, answers exactly as the offline responder would.

use crate::llm_client::{CompletionClient, CompletionError, CompletionOptions};
use std::sync::Arc;
use tracing::warn;

pub const IEP_ANSWER: &str = "IEP goals should be SMART: Specific, Measurable, Achievable, Relevant, Time-bound! For example: 'By December 2025, John will solve 8 out of 10 two-step math problems independently as measured by weekly assessments.'";

pub const MECHATRONICS_ANSWER: &str = "Mechatronics combines mechanical engineering, electronics, computer science, and control engineering! It's used in robotics, automation, smart devices, and manufacturing systems.";

pub const ACCOMMODATION_ANSWER: &str = "Common accommodations include: extended time on tests, quiet workspace, assistive technology, frequent breaks, modified assignments, and preferential seating.";

pub const PROJECT_ANSWER: &str = "Great mechatronics projects: Arduino-based robots, automated plant watering systems, sensor networks, smart home devices, line-following robots, and automated sorting machines!";

pub const CAREER_ANSWER: &str = "Mechatronics careers: Automation Engineer, Robotics Technician, Manufacturing Engineer, Automotive Engineer, IoT Developer, Control Systems Engineer, Biomedical Equipment Technician.";

pub const GENERIC_ANSWER: &str = "I can help with IEP planning, mechatronics education, accommodations, project ideas, and career guidance! Try asking about specific topics.";

/// Topic keywords in test order. The first group with a match wins.
const TOPICS: &[(&[&str], &str)] = &[
    (&["iep", "goal"], IEP_ANSWER),
    (&["mechatronics"], MECHATRONICS_ANSWER),
    (&["accommodation"], ACCOMMODATION_ANSWER),
    (&["project"], PROJECT_ANSWER),
    (&["career"], CAREER_ANSWER),
];

/// Answers a question from the canned topic list.
pub fn offline_response(question: &str) -> &'static str {
    let question = question.to_lowercase();
    TOPICS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
        .map(|(_, answer)| *answer)
        .unwrap_or(GENERIC_ANSWER)
}

/// Turns the outcome of a completion call into the text shown to the user.
///
/// Any failure, and any blank completion, yields the offline answer for the
/// same question.
pub fn resolve(question: &str, result: Result<String, CompletionError>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        _ => offline_response(question).to_string(),
    }
}

/// Answers questions, either offline or through a completion service.
pub struct Responder {
    client: Option<Arc<dyn CompletionClient>>,
    system_prompt: String,
    options: CompletionOptions,
}

impl Responder {
    /// A responder that only uses the canned answers.
    pub fn offline() -> Self {
        Self {
            client: None,
            system_prompt: String::new(),
            options: CompletionOptions::default(),
        }
    }

    /// A responder that forwards every question to `client` with a fixed
    /// system instruction.
    pub fn online(
        client: Arc<dyn CompletionClient>,
        system_prompt: String,
        options: CompletionOptions,
    ) -> Self {
        Self {
            client: Some(client),
            system_prompt,
            options,
        }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    /// Returns a non-empty answer for any input, including the empty string.
    pub async fn respond(&self, question: &str) -> String {
        if !self.is_online() {
            return offline_response(question).to_string();
        }

        let result = self.complete(question).await;
        if let Err(e) = &result {
            warn!(error = %e, "Completion failed; answering from the offline topic list");
        }
        resolve(question, result)
    }

    /// Performs the raw completion call without any fallback.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let client = self
            .client
            .as_ref()
            .ok_or(CompletionError::MissingConfiguration)?;
        client
            .complete(self.system_prompt.clone(), prompt.to_string(), self.options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MockCompletionClient;

    #[test]
    fn test_iep_and_goal_questions_get_the_iep_answer() {
        assert_eq!(offline_response("How do I write an IEP?"), IEP_ANSWER);
        assert_eq!(offline_response("what makes a good GOAL"), IEP_ANSWER);
        assert_eq!(offline_response("goals for reading"), IEP_ANSWER);
    }

    #[test]
    fn test_each_topic_is_reachable() {
        assert_eq!(offline_response("What is Mechatronics?"), MECHATRONICS_ANSWER);
        assert_eq!(offline_response("Any accommodation ideas"), ACCOMMODATION_ANSWER);
        assert_eq!(offline_response("a fun project please"), PROJECT_ANSWER);
        assert_eq!(offline_response("CAREER options"), CAREER_ANSWER);
    }

    #[test]
    fn test_earlier_keywords_take_precedence() {
        assert_eq!(offline_response("career advice for my iep student"), IEP_ANSWER);
        assert_eq!(offline_response("mechatronics project"), MECHATRONICS_ANSWER);
        assert_eq!(offline_response("project careers"), PROJECT_ANSWER);
    }

    #[test]
    fn test_unmatched_questions_get_generic_help() {
        assert_eq!(offline_response("hello there"), GENERIC_ANSWER);
        assert_eq!(offline_response(""), GENERIC_ANSWER);
    }

    #[test]
    fn test_resolve_prefers_completion_text() {
        assert_eq!(resolve("iep", Ok("model says hi".to_string())), "model says hi");
    }

    #[test]
    fn test_resolve_falls_back_on_every_error_kind() {
        let errors = [
            CompletionError::MissingConfiguration,
            CompletionError::InvalidRequest("bad".to_string()),
            CompletionError::EmptyResponse,
        ];
        for error in errors {
            assert_eq!(resolve("tell me about careers", Err(error)), CAREER_ANSWER);
        }
        assert_eq!(resolve("careers", Ok("   ".to_string())), CAREER_ANSWER);
    }

    #[tokio::test]
    async fn test_offline_responder_is_total() {
        let responder = Responder::offline();
        assert!(!responder.is_online());
        assert_eq!(responder.respond("").await, GENERIC_ANSWER);
        assert!(matches!(
            responder.complete("x").await,
            Err(CompletionError::MissingConfiguration)
        ));
    }

    #[tokio::test]
    async fn test_online_responder_passes_system_prompt_and_question() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|system, user, options| {
                system == "You help teachers." && user == "What is an IEP?" && options.max_tokens == 500
            })
            .times(1)
            .returning(|_, _, _| Ok("An IEP is a plan.".to_string()));

        let responder = Responder::online(
            Arc::new(client),
            "You help teachers.".to_string(),
            CompletionOptions::default(),
        );
        assert!(responder.is_online());
        assert_eq!(responder.respond("What is an IEP?").await, "An IEP is a plan.");
    }

    #[tokio::test]
    async fn test_online_failure_matches_offline_answer() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(|_, _, _| Err(CompletionError::EmptyResponse));

        let responder = Responder::online(
            Arc::new(client),
            String::new(),
            CompletionOptions::default(),
        );
        let question = "Which accommodation works for tests?";
        assert_eq!(responder.respond(question).await, offline_response(question));
    }
}
