use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{ChatTurn, Speaker};

pub const REPLY_DELAY_MS: RangeInclusive<u64> = 500..=1000;

pub const GREETING: &str = "Hi there! How can I assist you with the AI/ML course today?";
pub const HI_REPLY: &str = "Hello! Ask me anything about the course.";
pub const COURSE_DETAILS: &str = "This is a comprehensive course on AI and Machine Learning, covering topics from basic concepts to advanced algorithms and a capstone project. Check the Syllabus section for more!";
pub const SYLLABUS: &str = "You can find the detailed syllabus in the 'Syllabus' section of this page. It includes modules on Supervised Learning, Unsupervised Learning, Deep Learning, and more.";
pub const PREREQUISITES: &str = "Basic Python programming knowledge and high-school level mathematics are recommended. We cover the fundamentals, so a strong desire to learn is key!";
pub const DURATION: &str = "The course is designed to be completed in 12 weeks, assuming a study time of 8-10 hours per week.";
pub const ENROLL: &str = "You can enroll by clicking the 'Enroll Now' button on this page. The countdown timer shows how much time is left for the current enrollment period.";
pub const COST: &str =
    "For pricing and payment options, please visit our enrollment page or contact admissions.";
pub const HELP: &str = "I can answer questions about the course syllabus, prerequisites, duration, and enrollment. What would you like to know?";
pub const GOODBYE: &str = "Goodbye! Feel free to ask more questions later.";
pub const DEFAULT_REPLY: &str = "I'm still learning! I can answer questions about: course details, syllabus, prerequisites, duration, or how to enroll. For other topics, please check the FAQ or contact support.";

#[derive(Debug, Clone, Copy)]
enum Keywords {
    Any(&'static [&'static str]),
    All(&'static [&'static str]),
}

impl Keywords {
    fn matches(&self, text: &str) -> bool {
        match self {
            Keywords::Any(words) => words.iter().any(|w| text.contains(w)),
            Keywords::All(words) => words.iter().all(|w| text.contains(w)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ChatRule {
    keywords: Keywords,
    reply: &'static str,
}

// Evaluated top to bottom; specific topics come before greetings so that
// "hello, what's the syllabus?" answers the question.
const RULES: [ChatRule; 10] = [
    ChatRule {
        keywords: Keywords::All(&["course", "detail"]),
        reply: COURSE_DETAILS,
    },
    ChatRule {
        keywords: Keywords::Any(&["syllabus"]),
        reply: SYLLABUS,
    },
    ChatRule {
        keywords: Keywords::Any(&["prerequisite"]),
        reply: PREREQUISITES,
    },
    ChatRule {
        keywords: Keywords::Any(&["duration", "long"]),
        reply: DURATION,
    },
    ChatRule {
        keywords: Keywords::Any(&["enroll", "join"]),
        reply: ENROLL,
    },
    ChatRule {
        keywords: Keywords::Any(&["cost", "price", "fee"]),
        reply: COST,
    },
    ChatRule {
        keywords: Keywords::Any(&["help"]),
        reply: HELP,
    },
    ChatRule {
        keywords: Keywords::Any(&["bye", "thank"]),
        reply: GOODBYE,
    },
    ChatRule {
        keywords: Keywords::Any(&["hello"]),
        reply: GREETING,
    },
    ChatRule {
        keywords: Keywords::Any(&["hi"]),
        reply: HI_REPLY,
    },
];

/// First matching rule wins; unmatched input gets the default reply.
pub fn reply_for(input: &str) -> &'static str {
    let text = input.trim().to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.matches(&text))
        .map(|rule| rule.reply)
        .unwrap_or(DEFAULT_REPLY)
}

/// Scripted chat box with an append-only transcript.
pub struct ChatWidget {
    input: String,
    transcript: Arc<Mutex<Vec<ChatTurn>>>,
    delay_ms: RangeInclusive<u64>,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new(REPLY_DELAY_MS)
    }
}

impl ChatWidget {
    pub fn new(delay_ms: RangeInclusive<u64>) -> Self {
        Self {
            input: String::new(),
            transcript: Arc::new(Mutex::new(Vec::new())),
            delay_ms,
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Posts the current input. Blank input is ignored and yields `None`;
    /// otherwise the returned task appends the bot reply after a short random delay.
    pub async fn submit(&mut self) -> Option<JoinHandle<()>> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.input.clear();
        self.transcript.lock().await.push(ChatTurn {
            speaker: Speaker::User,
            text: text.clone(),
        });

        let delay = rand::thread_rng().gen_range(self.delay_ms.clone());
        let transcript = Arc::clone(&self.transcript);
        Some(tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            let reply = reply_for(&text);
            debug!("Chat reply after {} ms", delay);
            transcript.lock().await.push(ChatTurn {
                speaker: Speaker::Bot,
                text: reply.to_string(),
            });
        }))
    }

    pub async fn send(&mut self, text: impl Into<String>) -> Option<JoinHandle<()>> {
        self.set_input(text);
        self.submit().await
    }

    pub async fn transcript(&self) -> Vec<ChatTurn> {
        self.transcript.lock().await.clone()
    }
}
