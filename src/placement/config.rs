//! Placement scoring configuration.

/// Weights for the placement score.
///
/// The score of an eligible container is
/// `space_weight * space_efficiency + accessibility_weight * accessibility`;
/// both factors are in [0, 1], so with the default equal weights the score
/// is too.
///
/// # Examples
///
/// ```
/// use stowage::placement::PlacementConfig;
///
/// let config = PlacementConfig::default()
///     .with_space_weight(0.7)
///     .with_accessibility_weight(0.3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlacementConfig {
    /// Weight of the tight-fit factor.
    pub space_weight: f64,

    /// Weight of the accessibility factor.
    pub accessibility_weight: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            space_weight: 0.5,
            accessibility_weight: 0.5,
        }
    }
}

impl PlacementConfig {
    pub fn with_space_weight(mut self, w: f64) -> Self {
        self.space_weight = w;
        self
    }

    pub fn with_accessibility_weight(mut self, w: f64) -> Self {
        self.accessibility_weight = w;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.space_weight < 0.0 {
            return Err("space_weight must be non-negative".into());
        }
        if self.accessibility_weight < 0.0 {
            return Err("accessibility_weight must be non-negative".into());
        }
        if self.space_weight + self.accessibility_weight <= 0.0 {
            return Err("at least one weight must be positive".into());
        }
        Ok(())
    }
}
