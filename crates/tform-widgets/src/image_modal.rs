#![forbid(unsafe_code)]

//! Click-to-zoom image modal.
//!
//! Clicking an image on the page opens a full-screen overlay showing that
//! image; clicking the overlay closes it. Images whose source contains an
//! excluded marker (the site logo by default) never open.
//!
//! Only one overlay is shown at a time: clicking another image while open
//! swaps the shown source.

/// Source marker excluded from zooming by default.
pub const DEFAULT_EXCLUDED_MARKER: &str = "logo.jpg";

/// Input events for the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageModalEvent {
    /// A page image was clicked.
    ImageClicked { src: String },
    /// The overlay itself was clicked.
    ModalClicked,
    /// Escape was pressed.
    EscapePressed,
}

/// Action emitted by [`ImageModalState::handle_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageModalAction {
    /// The overlay now shows `src`.
    Opened { src: String },
    /// The overlay closed.
    Closed,
    /// The clicked image is excluded from zooming.
    Excluded,
}

/// Modal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageModalConfig {
    /// Substrings that exclude an image source from zooming.
    pub excluded_markers: Vec<String>,
    pub close_on_click: bool,
    pub close_on_escape: bool,
}

impl Default for ImageModalConfig {
    fn default() -> Self {
        Self {
            excluded_markers: vec![DEFAULT_EXCLUDED_MARKER.to_owned()],
            close_on_click: true,
            close_on_escape: true,
        }
    }
}

impl ImageModalConfig {
    /// Add an excluded source marker.
    #[must_use]
    pub fn exclude(mut self, marker: impl Into<String>) -> Self {
        self.excluded_markers.push(marker.into());
        self
    }

    /// Replace the excluded markers.
    #[must_use]
    pub fn excluded_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn close_on_click(mut self, close: bool) -> Self {
        self.close_on_click = close;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    /// Whether `src` may be zoomed.
    #[must_use]
    pub fn allows(&self, src: &str) -> bool {
        !self
            .excluded_markers
            .iter()
            .any(|marker| src.contains(marker.as_str()))
    }
}

/// Open/closed state of the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageModalState {
    source: Option<String>,
}

impl ImageModalState {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Source of the image currently shown.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Show `src`, unless the config excludes it.
    pub fn open(&mut self, src: &str, config: &ImageModalConfig) -> ImageModalAction {
        if !config.allows(src) {
            tracing::debug!(message = "modal.excluded", src);
            return ImageModalAction::Excluded;
        }
        self.source = Some(src.to_owned());
        tracing::debug!(message = "modal.open", src);
        ImageModalAction::Opened {
            src: src.to_owned(),
        }
    }

    /// Close the overlay. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        let was_open = self.source.take().is_some();
        if was_open {
            tracing::debug!(message = "modal.close");
        }
        was_open
    }

    /// Handle an event and return the resulting action, if any.
    pub fn handle_event(
        &mut self,
        event: &ImageModalEvent,
        config: &ImageModalConfig,
    ) -> Option<ImageModalAction> {
        match event {
            ImageModalEvent::ImageClicked { src } => Some(self.open(src, config)),
            ImageModalEvent::ModalClicked if config.close_on_click => {
                self.close().then_some(ImageModalAction::Closed)
            }
            ImageModalEvent::EscapePressed if config.close_on_escape => {
                self.close().then_some(ImageModalAction::Closed)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn click(src: &str) -> ImageModalEvent {
        ImageModalEvent::ImageClicked { src: src.into() }
    }

    #[test]
    fn click_opens_and_modal_click_closes() {
        let config = ImageModalConfig::default();
        let mut state = ImageModalState::default();
        assert_eq!(
            state.handle_event(&click("/media/track/1.png"), &config),
            Some(ImageModalAction::Opened {
                src: "/media/track/1.png".into()
            })
        );
        assert!(state.is_open());
        assert_eq!(state.source(), Some("/media/track/1.png"));

        assert_eq!(
            state.handle_event(&ImageModalEvent::ModalClicked, &config),
            Some(ImageModalAction::Closed)
        );
        assert!(!state.is_open());
    }

    #[test]
    fn logo_is_excluded() {
        let config = ImageModalConfig::default();
        let mut state = ImageModalState::default();
        assert_eq!(
            state.handle_event(&click("/static/img/logo.jpg"), &config),
            Some(ImageModalAction::Excluded)
        );
        assert!(!state.is_open());
    }

    #[test]
    fn second_click_swaps_source() {
        let config = ImageModalConfig::default();
        let mut state = ImageModalState::default();
        state.handle_event(&click("a.png"), &config);
        state.handle_event(&click("b.png"), &config);
        assert_eq!(state.source(), Some("b.png"));
    }

    #[test]
    fn closing_closed_modal_is_silent() {
        let config = ImageModalConfig::default();
        let mut state = ImageModalState::default();
        assert_eq!(state.handle_event(&ImageModalEvent::ModalClicked, &config), None);
        assert_eq!(state.handle_event(&ImageModalEvent::EscapePressed, &config), None);
    }

    #[test]
    fn close_behaviour_is_configurable() {
        let config = ImageModalConfig::default()
            .close_on_click(false)
            .close_on_escape(false);
        let mut state = ImageModalState::default();
        state.handle_event(&click("a.png"), &config);
        assert_eq!(state.handle_event(&ImageModalEvent::ModalClicked, &config), None);
        assert_eq!(state.handle_event(&ImageModalEvent::EscapePressed, &config), None);
        assert!(state.is_open());
    }

    #[test]
    fn custom_markers() {
        let config = ImageModalConfig::default()
            .excluded_markers(["avatar_"])
            .exclude("icon.svg");
        assert!(config.allows("logo.jpg"));
        assert!(!config.allows("/media/avatar_12.png"));
        assert!(!config.allows("/static/icon.svg"));
    }

    #[test]
    #[traced_test]
    fn open_and_close_are_logged() {
        let config = ImageModalConfig::default();
        let mut state = ImageModalState::default();
        state.handle_event(&click("/media/a.png"), &config);
        state.handle_event(&ImageModalEvent::ModalClicked, &config);
        assert!(logs_contain("modal.open"));
        assert!(logs_contain("modal.close"));
    }
}
