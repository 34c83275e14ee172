//! Session Store
//!
//! Holds everything one interactive session knows: the chat transcript and
//! the student tracker. A store is created when the session starts and
//! dropped when it ends; nothing is persisted.

use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// The assistant's first message in every new session.
pub const GREETING: &str =
    "Hi! I'm your AI helper for IEP and mechatronics. What can I help you with today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A student's progress score. Always within `Progress::MIN..=Progress::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Progress(u8);

impl Progress {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Clamps any integer into the valid range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self(5)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub name: String,
    pub goals: String,
    pub progress: Progress,
    pub notes: String,
    pub last_updated: NaiveDate,
}

/// An immutable copy of the store, taken after a state-mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub students: Vec<StudentRecord>,
}

/// Transcript and student registry for one session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    transcript: Vec<Message>,
    students: BTreeMap<String, StudentRecord>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Starts a session whose transcript holds only the greeting.
    pub fn new() -> Self {
        info!("Starting new session");
        Self {
            transcript: vec![Message::new(Role::Assistant, GREETING)],
            students: BTreeMap::new(),
        }
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        let message = Message::new(role, content);
        debug!(%role, len = message.content.len(), "Appending message");
        self.transcript.push(message);
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The last `n` messages, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[Message] {
        let start = self.transcript.len().saturating_sub(n);
        &self.transcript[start..]
    }

    pub fn has_user_turns(&self) -> bool {
        self.transcript.iter().any(|m| m.role == Role::User)
    }

    /// Saves a student under `name`, stamped with today's date.
    ///
    /// Returns `None` without touching the registry when `name` is blank.
    pub fn save_student(
        &mut self,
        name: &str,
        goals: &str,
        progress: Progress,
        notes: &str,
    ) -> Option<&StudentRecord> {
        self.save_student_on(name, goals, progress, notes, Local::now().date_naive())
    }

    /// Like `save_student`, with an explicit date.
    pub fn save_student_on(
        &mut self,
        name: &str,
        goals: &str,
        progress: Progress,
        notes: &str,
        date: NaiveDate,
    ) -> Option<&StudentRecord> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring student save with blank name");
            return None;
        }

        let record = StudentRecord {
            name: name.to_string(),
            goals: goals.to_string(),
            progress,
            notes: notes.to_string(),
            last_updated: date,
        };
        let replaced = self.students.insert(name.to_string(), record).is_some();
        info!(student = %name, progress = %progress, replaced, "Saved student");
        self.students.get(name)
    }

    /// Iterates over the current registry. Each call reflects the latest state.
    pub fn students(&self) -> impl Iterator<Item = (&str, &StudentRecord)> + '_ {
        self.students.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.transcript.clone(),
            students: self.students.values().cloned().collect(),
        }
    }
}
