//! Course landing page: countdown, FAQ, scripted chat and preview toggle.
//!
//! Each feature is mounted only when its attachment point is configured.
//! A missing one is logged and skipped without touching the others.

mod accordion;
pub mod chat;
pub mod countdown;
mod preview;

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub use accordion::{Accordion, FaqItem};
pub use chat::{reply_for, ChatWidget, DEFAULT_REPLY, HI_REPLY, REPLY_DELAY_MS};
pub use countdown::{Clock, CountdownHandle, SystemClock};
pub use preview::{PreviewPanel, PreviewView};

use crate::models::ChatTurn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingFeatures {
    pub timer: bool,
    pub faq: bool,
    pub chat: bool,
    pub preview: bool,
}

impl Default for LandingFeatures {
    fn default() -> Self {
        Self {
            timer: true,
            faq: true,
            chat: true,
            preview: true,
        }
    }
}

impl LandingFeatures {
    pub fn none() -> Self {
        Self {
            timer: false,
            faq: false,
            chat: false,
            preview: false,
        }
    }

    /// Comma separated feature names; unknown names are logged and ignored.
    pub fn parse(raw: &str) -> Self {
        let mut features = Self::none();
        for name in raw.split(',').map(|s| s.trim().to_lowercase()) {
            match name.as_str() {
                "timer" => features.timer = true,
                "faq" => features.faq = true,
                "chat" => features.chat = true,
                "preview" => features.preview = true,
                "" => {}
                other => warn!("Unknown landing feature '{}'", other),
            }
        }
        features
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LandingView {
    pub countdown: Option<String>,
    pub faq: Option<Vec<FaqItem>>,
    pub chat: Option<Vec<ChatTurn>>,
    pub preview: Option<PreviewView>,
}

#[derive(Default)]
pub struct LandingPage {
    pub countdown: Option<CountdownHandle>,
    pub faq: Option<Accordion>,
    pub chat: Option<ChatWidget>,
    pub preview: Option<PreviewPanel>,
}

impl LandingPage {
    /// Must be called inside a tokio runtime when the timer is enabled.
    pub fn mount(features: LandingFeatures, target: &str, clock: Arc<dyn Clock>) -> Self {
        let countdown = if features.timer {
            Some(CountdownHandle::start(target, clock))
        } else {
            warn!("Timer attachment point not found, countdown disabled");
            None
        };
        let faq = if features.faq {
            Some(Accordion::with_default_questions())
        } else {
            warn!("FAQ attachment point not found, accordion disabled");
            None
        };
        let chat = if features.chat {
            Some(ChatWidget::default())
        } else {
            warn!("Chatbot elements not found, chat disabled");
            None
        };
        let preview = if features.preview {
            Some(PreviewPanel::default())
        } else {
            warn!("Preview button or panel not found, preview disabled");
            None
        };
        info!("Landing page mounted with {:?}", features);
        Self {
            countdown,
            faq,
            chat,
            preview,
        }
    }

    pub async fn view(&self) -> LandingView {
        let chat = match &self.chat {
            Some(widget) => Some(widget.transcript().await),
            None => None,
        };
        LandingView {
            countdown: self.countdown.as_ref().map(|c| c.display()),
            faq: self.faq.as_ref().map(|f| f.items().to_vec()),
            chat,
            preview: self.preview.as_ref().map(|p| p.view()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_list() {
        let f = LandingFeatures::parse("timer, CHAT,unknown");
        assert!(f.timer && f.chat);
        assert!(!f.faq && !f.preview);
    }

    #[tokio::test]
    async fn missing_features_are_skipped() {
        let features = LandingFeatures {
            timer: false,
            faq: true,
            chat: false,
            preview: true,
        };
        let page = LandingPage::mount(features, "2030-01-01", Arc::new(SystemClock));
        let view = page.view().await;
        assert!(view.countdown.is_none());
        assert!(view.chat.is_none());
        assert_eq!(view.faq.map(|f| f.len()), Some(4));
        assert_eq!(view.preview.map(|p| p.visible), Some(false));
    }

    #[tokio::test]
    async fn bad_target_only_affects_timer() {
        let page = LandingPage::mount(LandingFeatures::default(), "garbage", Arc::new(SystemClock));
        let view = page.view().await;
        assert_eq!(view.countdown.as_deref(), Some(countdown::ERROR_MESSAGE));
        assert!(view.faq.is_some() && view.chat.is_some() && view.preview.is_some());
    }
}
