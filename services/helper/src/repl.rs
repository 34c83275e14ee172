//! Interactive Terminal Front End
//!
//! Plain lines are chat turns. Lines starting with `/` activate the sidebar
//! tools. The transcript is redrawn in full after every chat turn.

use crate::state::HelperState;
use anyhow::Result;
use iep_helper_core::{
    chat::ChatLoop,
    render,
    session::{Progress, SessionSnapshot, SessionStore},
    tools::{self, StudentForm, ToolOutput},
};
use std::io::{BufRead, Write};
use tracing::info;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const HELP: &str = "Commands:
  /template   IEP goal template
  /careers    mechatronics career paths
  /quiz       sample quiz
  /outline    slide outline from the recent chat
  /student    add or update a student
  /students   list saved students
  /reset      start a new session
  /help       show this list
  /exit       quit
Anything else is sent to the helper as a question.";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    GoalTemplate,
    Careers,
    Quiz,
    Outline,
    AddStudent,
    ListStudents,
    Reset,
    Help,
    Exit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if line.eq_ignore_ascii_case("exit") {
            return Command::Exit;
        }
        if !line.starts_with('/') {
            return Command::Chat(line.to_string());
        }

        let name = line.split_whitespace().next().unwrap_or(line).to_lowercase();
        match name.as_str() {
            "/template" | "/goal" => Command::GoalTemplate,
            "/careers" | "/career" => Command::Careers,
            "/quiz" => Command::Quiz,
            "/outline" => Command::Outline,
            "/student" | "/add" => Command::AddStudent,
            "/students" | "/list" => Command::ListStudents,
            "/reset" | "/new" => Command::Reset,
            "/help" | "/?" => Command::Help,
            "/exit" | "/quit" => Command::Exit,
            _ => Command::Unknown(name),
        }
    }
}

pub struct Repl<R, W> {
    input: R,
    output: W,
    state: HelperState,
    store: SessionStore,
    chat: ChatLoop,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(state: HelperState, input: R, output: W) -> Self {
        let chat = ChatLoop::new(state.responder.clone());
        Self {
            input,
            output,
            state,
            store: SessionStore::new(),
            chat,
            clear_screen: false,
        }
    }

    /// Clear the terminal before each full redraw.
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `/exit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot();
        self.redraw(&snapshot)?;
        writeln!(self.output, "Type /help for tools.\n")?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            match Command::parse(&line) {
                Command::Exit => break,
                command => self.dispatch(command).await?,
            }
        }

        writeln!(self.output, "Goodbye")?;
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Chat(text) => self.chat_turn(&text).await,
            Command::GoalTemplate => self.show(&tools::goal_template()),
            Command::Careers => self.show(&tools::career_list()),
            Command::Quiz => {
                let output = tools::quiz(&self.state.responder, &self.state.prompts).await;
                self.show(&output)
            }
            Command::Outline => {
                let output = tools::slide_outline(
                    &self.store,
                    &self.state.responder,
                    &self.state.prompts,
                    self.state.context_policy,
                )
                .await;
                self.show(&output)
            }
            Command::AddStudent => {
                let form = self.read_student_form()?;
                let output = tools::add_student(&mut self.store, &form);
                self.show(&output)
            }
            Command::ListStudents => {
                let output = tools::student_list(&self.store);
                if output == ToolOutput::Nothing {
                    writeln!(self.output, "No students saved yet.")?;
                    return Ok(());
                }
                self.show(&output)
            }
            Command::Reset => {
                info!("Session reset by user");
                self.store = SessionStore::new();
                self.chat = ChatLoop::new(self.state.responder.clone());
                let snapshot = self.store.snapshot();
                self.redraw(&snapshot)
            }
            Command::Help => {
                writeln!(self.output, "{HELP}\n\n{}", tools::TIPS)?;
                Ok(())
            }
            Command::Unknown(name) => {
                writeln!(self.output, "Unknown command '{name}'. Type /help for the list.")?;
                Ok(())
            }
            Command::Empty | Command::Exit => Ok(()),
        }
    }

    async fn chat_turn(&mut self, text: &str) -> Result<()> {
        if !self.chat.begin_turn(&mut self.store, text) {
            return Ok(());
        }
        writeln!(self.output, "⏳ Thinking...")?;
        self.output.flush()?;

        let snapshot = self.chat.finish_turn(&mut self.store).await;
        self.redraw(&snapshot)
    }

    fn redraw(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        if self.clear_screen {
            write!(self.output, "{CLEAR_SCREEN}")?;
        }
        writeln!(self.output, "{}", render::transcript(snapshot))?;
        Ok(())
    }

    fn show(&mut self, output: &ToolOutput) -> Result<()> {
        if let Some(text) = render::tool_output(output) {
            writeln!(self.output, "\n{text}\n")?;
        }
        Ok(())
    }

    fn read_student_form(&mut self) -> Result<StudentForm> {
        let default_progress = i64::from(Progress::default().get());
        let name = self.prompt_field("Student Name", "")?;
        let goals = self.prompt_field("IEP Goals", "")?;
        let progress = self
            .prompt_field("Progress (1-10)", &default_progress.to_string())?
            .parse::<i64>()
            .unwrap_or(default_progress);
        let notes = self.prompt_field("Notes", "")?;
        Ok(StudentForm {
            name,
            goals,
            progress,
            notes,
        })
    }

    fn prompt_field(&mut self, field: &str, default_val: &str) -> Result<String> {
        if default_val.is_empty() {
            write!(self.output, "{field}: ")?;
        } else {
            write!(self.output, "{field} [{default_val}]: ")?;
        }
        self.output.flush()?;

        let value = self.read_line()?.unwrap_or_default();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(default_val.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }

    /// Reads one line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iep_helper_core::{
        prompts::Prompts,
        responder::{MECHATRONICS_ANSWER, Responder},
        session::GREETING,
        tools::ContextPolicy,
    };
    use std::io::Cursor;
    use std::sync::Arc;

    fn offline_state() -> HelperState {
        HelperState {
            responder: Arc::new(Responder::offline()),
            prompts: Arc::new(Prompts::default()),
            context_policy: ContextPolicy::Truncated,
        }
    }

    async fn run_script(script: &str) -> (String, usize, usize) {
        let mut repl = Repl::new(offline_state(), Cursor::new(script.to_string()), Vec::new());
        repl.run().await.unwrap();
        let messages = repl.store().transcript().len();
        let students = repl.store().student_count();
        let output = String::from_utf8(repl.into_output()).unwrap();
        (output, messages, students)
    }

    #[test]
    fn test_parses_commands() {
        assert_eq!(Command::parse("  "), Command::Empty);
        assert_eq!(Command::parse("EXIT"), Command::Exit);
        assert_eq!(Command::parse("/Quiz"), Command::Quiz);
        assert_eq!(Command::parse("/students"), Command::ListStudents);
        assert_eq!(Command::parse("/student"), Command::AddStudent);
        assert_eq!(
            Command::parse(" what is an IEP? "),
            Command::Chat("what is an IEP?".to_string())
        );
        assert_eq!(
            Command::parse("/dance now"),
            Command::Unknown("/dance".to_string())
        );
    }

    #[tokio::test]
    async fn test_bare_quit_is_a_question() {
        assert_eq!(Command::parse("quit"), Command::Chat("quit".to_string()));

        let (output, messages, _) = run_script("quit\nmechatronics\n").await;
        assert_eq!(messages, 5);
        assert!(output.contains(MECHATRONICS_ANSWER));
    }

    #[tokio::test]
    async fn test_greets_and_stops_at_end_of_input() {
        let (output, messages, _) = run_script("").await;
        assert!(output.contains(GREETING));
        assert!(output.ends_with("Goodbye\n"));
        assert_eq!(messages, 1);
    }

    #[tokio::test]
    async fn test_chat_turn_redraws_full_transcript() {
        let (output, messages, _) = run_script("What is mechatronics?\n/exit\n").await;
        assert_eq!(messages, 3);
        assert!(output.contains("⏳ Thinking..."));
        let after_turn = output.split("⏳ Thinking...").nth(1).unwrap();
        let greeting_at = after_turn.find(GREETING).unwrap();
        let answer_at = after_turn.find(MECHATRONICS_ANSWER).unwrap();
        assert!(greeting_at < answer_at);
    }

    #[tokio::test]
    async fn test_student_form_saves_and_lists() {
        let script = "/students\n/student\nSam\nread at grade level\n7\nlikes diagrams\n/students\n";
        let (output, _, students) = run_script(script).await;
        assert_eq!(students, 1);
        assert!(output.contains("No students saved yet."));
        assert!(output.contains("✅ Saved Sam!"));
        assert!(output.contains("Sam - Progress: 7/10"));
    }

    #[tokio::test]
    async fn test_blank_student_name_is_silent() {
        let script = "/student\n\ngoals\n\n\n";
        let (output, _, students) = run_script(script).await;
        assert_eq!(students, 0);
        assert!(!output.contains("Saved"));
    }

    #[tokio::test]
    async fn test_unparsable_progress_uses_default() {
        let script = "/student\nAna\n\nlots\n\n/students\n";
        let (output, _, _) = run_script(script).await;
        assert!(output.contains("Ana - Progress: 5/10"));
    }

    #[tokio::test]
    async fn test_outline_warns_before_chatting() {
        let (output, _, _) = run_script("/outline\n").await;
        assert!(output.contains(tools::OUTLINE_WARNING));

        let (output, _, _) = run_script("robots\n/outline\n").await;
        assert!(output.contains("**Slide 7: Conclusion**"));
    }

    #[tokio::test]
    async fn test_reset_starts_a_new_session() {
        let (_, messages, students) =
            run_script("hello\n/student\nSam\n\n\n\n/reset\n").await;
        assert_eq!(messages, 1);
        assert_eq!(students, 0);
    }

    #[tokio::test]
    async fn test_help_and_unknown_commands() {
        let (output, _, _) = run_script("/help\n/dance\n").await;
        assert!(output.contains("/outline"));
        assert!(output.contains(tools::TIPS));
        assert!(output.contains("Unknown command '/dance'"));
    }
}
