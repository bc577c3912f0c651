//! Tab/content visibility and the single message slot.

use shared::domain::{MessageKind, ViewKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub text: String,
    pub kind: MessageKind,
}

/// Visibility markers for one view's tab and content element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewIndicator {
    pub view: ViewKind,
    pub tab_active: bool,
    pub content_active: bool,
}

#[derive(Debug, Clone)]
pub struct ViewController {
    active: ViewKind,
    indicators: [ViewIndicator; 4],
    message: Option<UserMessage>,
}

impl Default for ViewController {
    fn default() -> Self {
        let mut controller = Self {
            active: ViewKind::default(),
            indicators: ViewKind::ALL.map(|view| ViewIndicator {
                view,
                tab_active: false,
                content_active: false,
            }),
            message: None,
        };
        controller.select_view(ViewKind::default());
        controller
    }
}

impl ViewController {
    pub fn active_view(&self) -> ViewKind {
        self.active
    }

    pub fn indicators(&self) -> &[ViewIndicator; 4] {
        &self.indicators
    }

    pub fn is_active(&self, view: ViewKind) -> bool {
        self.active == view
    }

    /// Marks `view` active and every other tab and content inactive.
    pub fn select_view(&mut self, view: ViewKind) {
        self.active = view;
        for indicator in &mut self.indicators {
            let active = indicator.view == view;
            indicator.tab_active = active;
            indicator.content_active = active;
        }
    }

    pub fn reset(&mut self) {
        self.select_view(ViewKind::Normalized);
    }

    pub fn message(&self) -> Option<&UserMessage> {
        self.message.as_ref()
    }

    pub fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        match kind {
            MessageKind::Error => tracing::warn!(message = %text, "showing error message"),
            _ => tracing::debug!(message = %text, ?kind, "showing message"),
        }
        self.message = Some(UserMessage { text, kind });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
