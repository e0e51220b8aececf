// config.rs - Tunables for the rain
//
// Hosts pass an optional JSON object; missing keys keep their defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound for `max_frame_secs`
pub const MAX_FRAME_SECS: f32 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Cell size in CSS pixels, scaled by the pixel ratio
    pub base_cell_size: f32,
    /// Expected spawns per column per second
    pub spawn_rate: f32,
    /// Fall speed range in rows per second, `[speed_min, speed_max)`
    pub speed_min: f32,
    pub speed_max: f32,
    /// Trail length range in rows, `[trail_min, trail_max)`
    pub trail_min: usize,
    pub trail_max: usize,
    pub head_color: [u8; 3],
    /// Trail colour at full brightness; faded linearly toward black
    pub trail_color: [u8; 3],
    pub font_family: String,
    /// Longest frame delta the clock will report, in seconds
    pub max_frame_secs: f32,
    pub seed: u32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            base_cell_size: 16.0,
            spawn_rate: 0.3,
            speed_min: 2.4,
            speed_max: 26.4,
            trail_min: 8,
            trail_max: 40,
            head_color: [144, 238, 144],
            trail_color: [64, 191, 64],
            font_family: "sans-serif".to_string(),
            max_frame_secs: 1.0,
            seed: 0xDEADBEEF,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid rain config: {e}"),
            ConfigError::Invalid(why) => write!(f, "invalid rain config: {why}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl RainConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_cell_size > 0.0) {
            return Err(ConfigError::Invalid("base_cell_size must be positive"));
        }
        if !(self.spawn_rate >= 0.0) {
            return Err(ConfigError::Invalid("spawn_rate must not be negative"));
        }
        if !(self.speed_min > 0.0) || !(self.speed_max > self.speed_min) {
            return Err(ConfigError::Invalid("speed range must be positive and non-empty"));
        }
        if self.trail_min == 0 || self.trail_max <= self.trail_min {
            return Err(ConfigError::Invalid("trail range must be positive and non-empty"));
        }
        if !(self.max_frame_secs > 0.0 && self.max_frame_secs <= MAX_FRAME_SECS) {
            return Err(ConfigError::Invalid("max_frame_secs must be in (0, 10]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RainConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RainConfig::from_json(r#"{ "spawn_rate": 0.5, "head_color": [255, 255, 255] }"#).unwrap();
        assert_eq!(config.spawn_rate, 0.5);
        assert_eq!(config.head_color, [255, 255, 255]);
        assert_eq!(config.trail_max, 40);
        assert_eq!(config.font_family, "sans-serif");
    }

    #[test]
    fn empty_ranges_are_rejected() {
        let err = RainConfig::from_json(r#"{ "trail_min": 10, "trail_max": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RainConfig::from_json(r#"{ "speed_min": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn frame_cap_is_bounded() {
        assert!(RainConfig::from_json(r#"{ "max_frame_secs": 10.0 }"#).is_ok());
        let err = RainConfig::from_json(r#"{ "max_frame_secs": 1e6 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(RainConfig::from_json(r#"{ "max_frame_secs": 0.0 }"#).is_err());
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = RainConfig::from_json("{ spawn_rate: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid rain config"));
    }
}
