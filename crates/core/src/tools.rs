//! Sidebar Tools
//!
//! On-demand actions that sit next to the chat. Each one runs only when the
//! user asks for it and reports back through a `ToolOutput`.

use crate::Mode;
use crate::prompts::Prompts;
use crate::render;
use crate::responder::Responder;
use crate::session::{Message, Progress, SessionStore};
use tracing::info;

pub const GOAL_TEMPLATE: &str = "**IEP Goal Template:**

**Student:** [Name]
**Subject:** [Area]
**Goal:** By [date], [student] will [skill] with [accuracy] as measured by [method].

**Example:**
By May 2025, Sarah will solve 8 out of 10 single-digit multiplication problems independently as measured by weekly math assessments.

**Objectives:**
1. [First milestone - 25% progress]
2. [Second milestone - 50% progress]
3. [Third milestone - 75% progress]
4. [Final goal - 100% progress]";

pub const CAREER_LIST: &str = "**Mechatronics Careers:**

🔧 **Automation Engineer** - Design automated systems
🤖 **Robotics Technician** - Build and maintain robots
🏭 **Manufacturing Engineer** - Optimize production lines
🚗 **Automotive Engineer** - Design vehicle systems
🏠 **IoT Developer** - Create smart connected devices
⚡ **Control Systems Engineer** - Design control algorithms
🏥 **Biomedical Equipment Tech** - Medical device maintenance";

pub const SAMPLE_QUIZ: &str = "### 📝 Mechatronics Quiz

**1. What does mechatronics combine?**
a) Only mechanical and electrical engineering
b) Mechanical, electrical, computer, and control engineering
c) Just robotics and automation
d) Only software and hardware

**2. What does SMART stand for in IEP goals?**
a) Simple, Measurable, Achievable, Relevant, Timely
b) Specific, Measurable, Achievable, Relevant, Time-bound
c) Special, Modern, Advanced, Real, Technical
d) Standard, Modified, Accessible, Regular, Tested

**3. Which is a common mechatronics application?**
a) Automated manufacturing systems
b) Smart home devices
c) Robotic surgery equipment
d) All of the above

**4. What's an appropriate IEP accommodation?**
a) Doing less work than other students
b) Extended time for tests
c) Never taking tests
d) Sitting anywhere in class

**5. Arduino is commonly used for:**
a) Word processing
b) Creating prototypes and learning electronics
c) Professional video editing
d) Database management

**Answers:** 1-b, 2-b, 3-d, 4-b, 5-b";

pub const TIPS: &str =
    "💡 Try asking about: IEP goals, accommodations, mechatronics projects, or career advice!";

pub const OUTLINE_WARNING: &str = "Have a conversation first, then I can create an outline!";

/// Number of trailing transcript entries the outline is built from.
pub const OUTLINE_CONTEXT_MESSAGES: usize = 4;

const CONTEXT_BUDGET: usize = 200;
const CONTEXT_PER_MESSAGE: usize = 50;
const OUTLINE_TITLE_CHARS: usize = 100;

/// What a tool hands back to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    /// Markdown-ish text to show as-is.
    Text(String),
    /// A short confirmation.
    Success(String),
    /// The tool could not run and tells the user why.
    Warning(String),
    /// Nothing to show.
    Nothing,
}

/// How recent messages are condensed into outline context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextPolicy {
    /// Up to 50 characters per message, stopping once 200 are collected.
    #[default]
    Truncated,
    /// One untruncated `role: content` line per message.
    RoleTagged,
}

impl ContextPolicy {
    /// The outline context used when none is chosen explicitly: the offline
    /// template gets the short form, a completion service the full lines.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Offline => ContextPolicy::Truncated,
            Mode::Online => ContextPolicy::RoleTagged,
        }
    }
}

/// Field values collected by the "add student" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub goals: String,
    pub progress: i64,
    pub notes: String,
}

pub fn goal_template() -> ToolOutput {
    info!(tool = "goal_template", "Tool activated");
    ToolOutput::Text(GOAL_TEMPLATE.to_string())
}

pub fn career_list() -> ToolOutput {
    info!(tool = "career_list", "Tool activated");
    ToolOutput::Text(CAREER_LIST.to_string())
}

/// The fixed quiz offline; a freshly generated one online.
pub async fn quiz(responder: &Responder, prompts: &Prompts) -> ToolOutput {
    info!(tool = "quiz", online = responder.is_online(), "Tool activated");
    if responder.is_online() {
        ToolOutput::Text(responder.respond(prompts.quiz_prompt()).await)
    } else {
        ToolOutput::Text(SAMPLE_QUIZ.to_string())
    }
}

/// Condenses `messages` into a context string according to `policy`.
pub fn outline_context(messages: &[Message], policy: ContextPolicy) -> String {
    match policy {
        ContextPolicy::Truncated => {
            let mut context = String::new();
            for message in messages {
                if context.chars().count() < CONTEXT_BUDGET {
                    context.extend(message.content().chars().take(CONTEXT_PER_MESSAGE));
                    context.push_str("... ");
                }
            }
            context
        }
        ContextPolicy::RoleTagged => messages
            .iter()
            .map(|m| format!("{}: {}", m.role(), m.content()))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// The fixed seven-slide outline with `context` as its topic line.
pub fn offline_outline(context: &str) -> String {
    let topic: String = context.chars().take(OUTLINE_TITLE_CHARS).collect();
    format!(
        "### 📊 PowerPoint Outline Based on Our Chat:

**Slide 1: Title**
- Topic: {topic}...

**Slide 2: Introduction**
- What is the main topic?
- Why is it important?

**Slide 3: Key Points**
- Main concept 1
- Main concept 2
- Main concept 3

**Slide 4: Examples/Applications**
- Real-world examples
- Practical applications

**Slide 5: Benefits/Advantages**
- Why this matters
- Positive outcomes

**Slide 6: Implementation**
- How to get started
- Next steps

**Slide 7: Conclusion**
- Summary of key points
- Call to action

💡 **Tip:** Copy this to slidesai.io or gamma.app to create your presentation!"
    )
}

/// Builds a slide outline from the last few messages of the chat.
pub async fn slide_outline(
    store: &SessionStore,
    responder: &Responder,
    prompts: &Prompts,
    policy: ContextPolicy,
) -> ToolOutput {
    info!(tool = "slide_outline", ?policy, "Tool activated");
    if !store.has_user_turns() {
        return ToolOutput::Warning(OUTLINE_WARNING.to_string());
    }

    let context = outline_context(store.recent_messages(OUTLINE_CONTEXT_MESSAGES), policy);
    if responder.is_online() {
        ToolOutput::Text(responder.respond(&prompts.outline_prompt(&context)).await)
    } else {
        ToolOutput::Text(offline_outline(&context))
    }
}

/// Saves the form's student. A blank name saves nothing and says nothing.
pub fn add_student(store: &mut SessionStore, form: &StudentForm) -> ToolOutput {
    info!(tool = "add_student", "Tool activated");
    match store.save_student(
        &form.name,
        &form.goals,
        Progress::clamped(form.progress),
        &form.notes,
    ) {
        Some(record) => ToolOutput::Success(format!("Saved {}!", record.name)),
        None => ToolOutput::Nothing,
    }
}

/// One block per saved student, or nothing when the tracker is empty.
pub fn student_list(store: &SessionStore) -> ToolOutput {
    info!(tool = "student_list", count = store.student_count(), "Tool activated");
    if store.student_count() == 0 {
        return ToolOutput::Nothing;
    }

    let mut text = String::from("**Saved Students:**");
    for (_, record) in store.students() {
        text.push_str("\n\n");
        text.push_str(&render::student_block(record));
    }
    ToolOutput::Text(text)
}
