pub mod chat;
pub mod llm_client;
pub mod prompts;
pub mod render;
pub mod responder;
pub mod session;
pub mod tools;

/// Selects how the helper produces answers.
///
/// Both variants share the same session store and sidebar tools; they only
/// differ in whether questions are forwarded to a completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Canned keyword-matched answers only. Needs no configuration.
    #[default]
    Offline,
    /// Forward questions to the completion service, falling back to the
    /// canned answers whenever the call fails.
    Online,
}
