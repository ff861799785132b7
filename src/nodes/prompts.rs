//! 各节点的 system prompt
//!
//! 内置默认值；若 prompts 目录下存在同名 .txt 文件则以文件内容覆盖。

use std::path::Path;

use crate::core::SpecialistKind;

pub const SUPERVISOR_ROUTE: &str = "You are a supervisor that routes requests to specialists.

Available specialists:
- calendar: Schedule meetings, appointments, reminders
- email: Draft or send emails
- research: Research topics, gather information

Respond with ONLY the specialist name (calendar, email, or research).
If the request doesn't fit any specialist, respond with 'respond' to handle directly.";

pub const SUPERVISOR_SYNTHESIZE: &str = "You are a personal assistant supervisor.
Synthesize the specialist's response into a helpful final answer for the user.";

pub const CALENDAR: &str = "You are a calendar management specialist.

When asked to schedule, modify, or check calendar events:
1. Parse the request for date, time, and description
2. Confirm the details
3. Provide clear confirmation

CRITICAL: Include ALL scheduling details in your response.";

pub const EMAIL: &str = "You are an email composition specialist.

When asked to draft or send emails:
1. Clarify recipient, subject, and key points
2. Draft professional, clear emails
3. Provide the complete draft

CRITICAL: Include the FULL email draft in your response.";

pub const RESEARCH: &str = "You are a research specialist.

When asked to research a topic:
1. Break down the research question
2. Provide key findings and insights
3. Cite sources when applicable

CRITICAL: Include ALL findings in your response.";

pub const RESPOND: &str =
    "You are a helpful personal assistant. Respond directly to the user.";

/// 一次运行用到的全部 prompt
#[derive(Debug, Clone)]
pub struct Prompts {
    pub supervisor_route: String,
    pub supervisor_synthesize: String,
    pub calendar: String,
    pub email: String,
    pub research: String,
    pub respond: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            supervisor_route: SUPERVISOR_ROUTE.to_string(),
            supervisor_synthesize: SUPERVISOR_SYNTHESIZE.to_string(),
            calendar: CALENDAR.to_string(),
            email: EMAIL.to_string(),
            research: RESEARCH.to_string(),
            respond: RESPOND.to_string(),
        }
    }
}

impl Prompts {
    /// 从目录加载覆盖；缺失或读不出的文件沿用内置值
    pub fn load(dir: &Path) -> Self {
        let read = |file: &str, fallback: &str| -> String {
            match std::fs::read_to_string(dir.join(file)) {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::debug!("Loaded prompt override {}", file);
                    text.trim().to_string()
                }
                _ => fallback.to_string(),
            }
        };

        Self {
            supervisor_route: read("supervisor_route.txt", SUPERVISOR_ROUTE),
            supervisor_synthesize: read("supervisor_synthesize.txt", SUPERVISOR_SYNTHESIZE),
            calendar: read("calendar.txt", CALENDAR),
            email: read("email.txt", EMAIL),
            research: read("research.txt", RESEARCH),
            respond: read("respond.txt", RESPOND),
        }
    }

    pub fn specialist(&self, kind: SpecialistKind) -> &str {
        match kind {
            SpecialistKind::Calendar => &self.calendar,
            SpecialistKind::Email => &self.email,
            SpecialistKind::Research => &self.research,
        }
    }
}
