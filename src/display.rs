//! Terminal presentation settings that gameplay changes and must give back.

pub const SHELL_CAPTION: &str = "Galactatec";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Terminal window title.
    pub caption: String,
    /// Hide the shell header so the battlefield gets the whole screen.
    pub fullscreen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { caption: SHELL_CAPTION.to_string(), fullscreen: false }
    }
}

/// The configuration that was active before gameplay. Consumed by
/// `Display::restore`, so it can be given back only once.
#[must_use = "a display scope must be restored"]
#[derive(Debug)]
pub struct DisplayScope {
    saved: DisplayConfig,
}

#[derive(Debug, Default)]
pub struct Display {
    config: DisplayConfig,
    title_dirty: bool,
}

impl Display {
    pub fn new(config: DisplayConfig) -> Self {
        Self { config, title_dirty: true }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    fn apply(&mut self, config: DisplayConfig) {
        if config.caption != self.config.caption {
            self.title_dirty = true;
        }
        self.config = config;
    }

    /// Switch to `config`, returning the scope that restores the old one.
    pub fn enter(&mut self, config: DisplayConfig) -> DisplayScope {
        let saved = self.config.clone();
        log::debug!("Display {:?} -> {:?}", saved, config);
        self.apply(config);
        DisplayScope { saved }
    }

    pub fn restore(&mut self, scope: DisplayScope) {
        log::debug!("Display restored to {:?}", scope.saved);
        self.apply(scope.saved);
    }

    /// New terminal title to push, if it changed since the last call.
    pub fn take_title(&mut self) -> Option<String> {
        if std::mem::take(&mut self.title_dirty) {
            Some(self.config.caption.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_restores_previous_config() {
        let mut d = Display::new(DisplayConfig::default());
        assert_eq!(d.take_title().as_deref(), Some(SHELL_CAPTION));
        let scope = d.enter(DisplayConfig { caption: "Galactatec - Battle".into(), fullscreen: true });
        assert!(d.config().fullscreen);
        assert_eq!(d.take_title().as_deref(), Some("Galactatec - Battle"));
        d.restore(scope);
        assert_eq!(d.config(), &DisplayConfig::default());
        assert_eq!(d.take_title().as_deref(), Some(SHELL_CAPTION));
        assert_eq!(d.take_title(), None);
    }
}
