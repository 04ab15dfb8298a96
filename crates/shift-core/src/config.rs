//! Application configuration.

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Window configuration, captured when the application is constructed
/// and handed to the backend during initialization.
///
/// `Default` supplies the skeleton's fixed setup: a 1280x720 resizable
/// window titled "Graveyard Shift".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Graveyard Shift".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.width, 1280);
        assert_eq!(cfg.height, 720);
        assert_eq!(cfg.title, "Graveyard Shift");
    }
}
