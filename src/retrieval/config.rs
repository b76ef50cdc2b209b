//! Retrieval estimation configuration.

/// Scales for the retrieval-time estimate.
///
/// The estimate for an item is
/// `(1 - accessibility_factor) * accessibility_minutes
///  + (position / count) * depth_minutes`,
/// so the defaults give 0–10 minutes of container access plus 0–5 minutes
/// of digging.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalConfig {
    /// Minutes attributed to reaching the hardest container.
    pub accessibility_minutes: f64,

    /// Minutes attributed to an item buried at the very bottom.
    pub depth_minutes: f64,

    /// Items expiring within this many days are flagged. There is no lower
    /// bound: already-expired items are flagged too.
    pub expiry_window_days: i64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            accessibility_minutes: 10.0,
            depth_minutes: 5.0,
            expiry_window_days: 7,
        }
    }
}

impl RetrievalConfig {
    pub fn with_accessibility_minutes(mut self, minutes: f64) -> Self {
        self.accessibility_minutes = minutes;
        self
    }

    pub fn with_depth_minutes(mut self, minutes: f64) -> Self {
        self.depth_minutes = minutes;
        self
    }

    pub fn with_expiry_window_days(mut self, days: i64) -> Self {
        self.expiry_window_days = days;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.accessibility_minutes < 0.0 {
            return Err("accessibility_minutes must be non-negative".into());
        }
        if self.depth_minutes < 0.0 {
            return Err("depth_minutes must be non-negative".into());
        }
        if self.expiry_window_days < 0 {
            return Err("expiry_window_days must be non-negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert!((config.accessibility_minutes - 10.0).abs() < 1e-10);
        assert!((config.depth_minutes - 5.0).abs() < 1e-10);
        assert_eq!(config.expiry_window_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_negative_scale() {
        let config = RetrievalConfig::default().with_depth_minutes(-1.0);
        assert!(config.validate().is_err());
    }
}
