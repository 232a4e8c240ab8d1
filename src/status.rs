//! Inline status line shown over the page column

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    current: Option<StatusMessage>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_loading(&mut self, text: impl Into<String>) {
        self.current = Some(StatusMessage {
            text: text.into(),
            level: StatusLevel::Loading,
        });
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.current = Some(StatusMessage {
            text: text.into(),
            level: StatusLevel::Error,
        });
    }

    pub fn hide(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.current,
            Some(StatusMessage {
                level: StatusLevel::Error,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_replaces_loading() {
        let mut line = StatusLine::new();
        line.show_loading("Loading PDF...");
        assert!(!line.is_error());
        line.show_error("PDF load failed");
        assert!(line.is_error());
        assert_eq!(line.current().map(|m| m.text.as_str()), Some("PDF load failed"));
        line.hide();
        assert!(!line.is_visible());
    }
}
