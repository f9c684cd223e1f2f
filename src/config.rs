//! Estimation configuration.

/// Configuration for a DFA Hurst-exponent estimation run.
///
/// All fields default to "let the pipeline decide": empty candidate lists
/// mean the built-in defaults (detrend order 2, the full coordinate span,
/// generated box sizes).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DfaConfig {
    /// Candidate detrending orders. Empty means the default order 2; more
    /// than one candidate resolves to the maximum with a diagnostic.
    pub detrend_orders: Vec<usize>,
    /// Requested analysis range. Empty means the full default span; the
    /// usual form is `[xstart, xend]`. Anything else is auto-resolved with a
    /// diagnostic.
    pub range: Vec<f64>,
    /// Explicit box sizes. Empty means sizes are generated from the masked
    /// coordinates. Supplied sizes are filtered to distinct positive finite
    /// values and must leave at least two.
    pub box_sizes: Vec<f64>,
    /// Retain the per-size (log10 size, log10 fluctuation) points on the
    /// result, for external plotting or crossover diagnostics. The core
    /// never renders anything itself.
    pub capture_scaling_points: bool,
}

impl DfaConfig {
    /// Use one specific detrending order.
    pub fn with_detrend_order(mut self, order: usize) -> Self {
        self.detrend_orders = vec![order];
        self
    }

    /// Restrict the analysis to `[xstart, xend]`.
    pub fn with_range(mut self, xstart: f64, xend: f64) -> Self {
        self.range = vec![xstart, xend];
        self
    }

    /// Evaluate exactly these box sizes instead of generating a set.
    pub fn with_box_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.box_sizes = sizes;
        self
    }

    /// Keep the scaling points on the result.
    pub fn with_scaling_points(mut self) -> Self {
        self.capture_scaling_points = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_automatic() {
        let config = DfaConfig::default();
        assert!(config.detrend_orders.is_empty());
        assert!(config.range.is_empty());
        assert!(config.box_sizes.is_empty());
        assert!(!config.capture_scaling_points);
    }

    #[test]
    fn test_builders_compose() {
        let config = DfaConfig::default()
            .with_detrend_order(1)
            .with_range(0.0, 100.0)
            .with_scaling_points();
        assert_eq!(config.detrend_orders, vec![1]);
        assert_eq!(config.range, vec![0.0, 100.0]);
        assert!(config.capture_scaling_points);
    }
}
