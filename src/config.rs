//! Widget configuration
//!
//! Centralized configuration with environment variable support
//! and sensible defaults.

use crate::error::WidgetError;
use std::env;
use std::time::Duration;

/// Default viewport height requested from the host, in pixels
pub const DEFAULT_FRAME_HEIGHT: u32 = 800;

/// Default delay before a standalone mock reply is appended
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1000;

/// Placeholder identity used until the user enters a name
pub const DEFAULT_USER_NAME: &str = "User";

/// Greeting seeded into every new conversation
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to Elite Auto Sales Academy. Use the commands from the sidebar (e.g., Scripts & Templates) or type your message below.";

/// Widget configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Height requested from the host after mount and after every render
    pub frame_height: u32,
    /// Delay before the standalone responder answers
    pub mock_delay: Duration,
    /// Placeholder user name (also what `skip_name` settles on)
    pub default_user_name: String,
    /// First assistant message of a fresh conversation
    pub welcome_message: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            frame_height: DEFAULT_FRAME_HEIGHT,
            mock_delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            default_user_name: DEFAULT_USER_NAME.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables with defaults
    ///
    /// Recognized variables:
    /// * `ELITE_CHAT_FRAME_HEIGHT` - layout height in pixels
    /// * `ELITE_CHAT_MOCK_DELAY_MS` - standalone reply delay
    /// * `ELITE_CHAT_DEFAULT_NAME` - placeholder user name
    /// * `ELITE_CHAT_WELCOME` - welcome message text
    ///
    /// Values that fail to parse fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            frame_height: env::var("ELITE_CHAT_FRAME_HEIGHT")
                .ok()
                .and_then(|h| h.trim().parse().ok())
                .unwrap_or(DEFAULT_FRAME_HEIGHT),
            mock_delay: Duration::from_millis(
                env::var("ELITE_CHAT_MOCK_DELAY_MS")
                    .ok()
                    .and_then(|d| d.trim().parse().ok())
                    .unwrap_or(DEFAULT_MOCK_DELAY_MS),
            ),
            default_user_name: env::var("ELITE_CHAT_DEFAULT_NAME")
                .ok()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            welcome_message: env::var("ELITE_CHAT_WELCOME")
                .unwrap_or_else(|_| DEFAULT_WELCOME_MESSAGE.to_string()),
        }
    }

    /// Override the frame height (e.g. from a command-line flag)
    pub fn with_frame_height(mut self, height: u32) -> Self {
        self.frame_height = height;
        self
    }

    /// Check the configuration for values the bridge cannot work with
    ///
    /// # Returns
    /// * `Ok(())` - configuration is usable
    /// * `Err(WidgetError::InvalidConfig)` - first offending field
    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.frame_height == 0 {
            return Err(WidgetError::InvalidConfig(
                "frame_height must be > 0".to_string(),
            ));
        }
        if self.default_user_name.trim().is_empty() {
            return Err(WidgetError::InvalidConfig(
                "default_user_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "ELITE_CHAT_FRAME_HEIGHT",
        "ELITE_CHAT_MOCK_DELAY_MS",
        "ELITE_CHAT_DEFAULT_NAME",
        "ELITE_CHAT_WELCOME",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = WidgetConfig::from_env();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.frame_height, 800);
        assert_eq!(config.mock_delay, Duration::from_millis(1000));
        assert_eq!(config.default_user_name, "User");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("ELITE_CHAT_FRAME_HEIGHT", "640");
        env::set_var("ELITE_CHAT_MOCK_DELAY_MS", "25");
        env::set_var("ELITE_CHAT_DEFAULT_NAME", "Guest");
        env::set_var("ELITE_CHAT_WELCOME", "Hi there");

        let config = WidgetConfig::from_env();
        clear_env();

        assert_eq!(config.frame_height, 640);
        assert_eq!(config.mock_delay, Duration::from_millis(25));
        assert_eq!(config.default_user_name, "Guest");
        assert_eq!(config.welcome_message, "Hi there");
    }

    #[test]
    #[serial]
    fn test_from_env_unparseable_values_fall_back() {
        clear_env();
        env::set_var("ELITE_CHAT_FRAME_HEIGHT", "tall");
        env::set_var("ELITE_CHAT_DEFAULT_NAME", "   ");

        let config = WidgetConfig::from_env();
        clear_env();

        assert_eq!(config.frame_height, DEFAULT_FRAME_HEIGHT);
        assert_eq!(config.default_user_name, DEFAULT_USER_NAME);
    }

    #[test]
    fn test_validate_rejects_zero_height() {
        let config = WidgetConfig::default().with_frame_height(0);
        match config.validate() {
            Err(WidgetError::InvalidConfig(msg)) => assert!(msg.contains("frame_height")),
            other => panic!("Expected InvalidConfig, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_blank_placeholder() {
        let config = WidgetConfig {
            default_user_name: " ".to_string(),
            ..WidgetConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(WidgetConfig::default().validate().is_ok());
    }
}
