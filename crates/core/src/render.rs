//! Plain-text rendering for terminal front ends.

use crate::session::{Role, SessionSnapshot, StudentRecord};
use crate::tools::ToolOutput;

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "🧑 You",
        Role::Assistant => "🤖 Helper",
    }
}

/// The whole transcript, oldest message first.
pub fn transcript(snapshot: &SessionSnapshot) -> String {
    snapshot
        .messages
        .iter()
        .map(|m| format!("{}:\n{}\n", label(m.role()), m.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// An expandable-style block: a summary line, then indented details.
pub fn student_block(record: &StudentRecord) -> String {
    format!(
        "▸ {} - Progress: {}/10\n    **Goals:** {}\n    **Notes:** {}\n    **Last Updated:** {}",
        record.name,
        record.progress,
        record.goals,
        record.notes,
        record.last_updated.format("%Y-%m-%d"),
    )
}

/// The text to print for a tool result, if any.
pub fn tool_output(output: &ToolOutput) -> Option<String> {
    match output {
        ToolOutput::Text(text) => Some(text.clone()),
        ToolOutput::Success(text) => Some(format!("✅ {text}")),
        ToolOutput::Warning(text) => Some(format!("⚠️  {text}")),
        ToolOutput::Nothing => None,
    }
}
