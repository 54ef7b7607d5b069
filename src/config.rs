use std::time::Duration;

use crate::dataset::types::DimensionId;
use crate::error::{Result, SunburstError};
use crate::render::transition::Easing;

/// Default share of the sibling total below which a category is folded into "Other".
pub const DEFAULT_AGGREGATION_THRESHOLD: f64 = 0.05;

/// Maximum number of user-selectable grouping dimensions.
pub const MAX_DIMENSIONS: usize = 2;

/// Default zoom transition length.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(750);

/// Small-group folding settings, applied independently at every parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationPolicy {
    pub enabled: bool,
    /// Fraction of the sibling total a category needs to stay visible
    pub threshold: f64,
    /// Sibling sets of this size or smaller are never folded
    pub min_fan_out: usize,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_AGGREGATION_THRESHOLD,
            min_fan_out: 3,
        }
    }
}

impl AggregationPolicy {
    /// Policy that never folds anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(SunburstError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Configuration for the sunburst chart.
#[derive(Debug, Clone)]
pub struct SunburstConfig {
    /// Ordered grouping dimensions above the terminal category (0..=2)
    pub active_dimensions: Vec<DimensionId>,
    pub aggregation: AggregationPolicy,
    /// Length of a zoom transition
    pub transition: Duration,
    /// Progress curve applied to the transition clock
    pub easing: Easing,
    /// Minimum ring-units × radians area for an arc to carry a label
    pub label_min_area: f64,
    /// Unit shown after values in tooltips
    pub measure_label: String,
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            active_dimensions: Vec::new(),
            aggregation: AggregationPolicy::default(),
            transition: DEFAULT_TRANSITION,
            easing: Easing::Linear,
            label_min_area: 0.03,
            measure_label: "hospitalisations".to_string(),
        }
    }
}

impl SunburstConfig {
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(&self.active_dimensions)?;
        self.aggregation.validate()
    }
}

pub(crate) fn validate_dimensions(dimensions: &[DimensionId]) -> Result<()> {
    if dimensions.len() > MAX_DIMENSIONS {
        return Err(SunburstError::TooManyDimensions {
            requested: dimensions.len(),
            max: MAX_DIMENSIONS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SunburstConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.transition, Duration::from_millis(750));
        assert_eq!(config.aggregation.threshold, 0.05);
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        for bad in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let policy = AggregationPolicy {
                threshold: bad,
                ..AggregationPolicy::default()
            };
            assert!(policy.validate().is_err(), "threshold {bad} accepted");
        }
    }

    #[test]
    fn rejects_three_dimensions() {
        let config = SunburstConfig {
            active_dimensions: vec![DimensionId(0), DimensionId(1), DimensionId(2)],
            ..SunburstConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SunburstError::TooManyDimensions { requested: 3, max: 2 })
        );
    }
}
