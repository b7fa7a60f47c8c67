use web_time::Duration;

use crate::error::ConfigError;

/// Fixed settings of one windowed list. Built with chained setters:
///
/// ```rust
/// use linkshelf_virtual::ListConfig;
///
/// let cfg = ListConfig::default().item_height(120.0).buffer_size(3);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.intersection_margin(), 360.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ListConfig {
    /// Height of every item, in pixels.
    pub item_height: f32,
    /// Extra items rendered past each edge of the viewport.
    pub buffer_size: usize,
    /// Minimum spacing between scroll- or resize-driven passes.
    pub throttle_ms: u64,
    /// Visible fraction of an element that counts as intersecting.
    pub intersection_threshold: f32,
    /// Defer `data-src` content until an element nears the viewport. When
    /// off, deferred content is promoted as soon as the element renders.
    pub lazy_loading: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            item_height: 200.0,
            buffer_size: 5,
            throttle_ms: 100,
            intersection_threshold: 0.01,
            lazy_loading: true,
        }
    }
}

impl ListConfig {
    pub fn item_height(mut self, px: f32) -> Self {
        self.item_height = px;
        self
    }

    pub fn buffer_size(mut self, items: usize) -> Self {
        self.buffer_size = items;
        self
    }

    pub fn throttle(mut self, interval: Duration) -> Self {
        self.throttle_ms = interval.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn intersection_threshold(mut self, t: f32) -> Self {
        self.intersection_threshold = t;
        self
    }

    pub fn lazy_loading(mut self, on: bool) -> Self {
        self.lazy_loading = on;
        self
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Margin around the viewport, in pixels, inside which deferred content
    /// starts loading.
    pub fn intersection_margin(&self) -> f32 {
        self.item_height * self.buffer_size as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return Err(ConfigError::InvalidItemHeight(self.item_height));
        }
        if !(0.0..=1.0).contains(&self.intersection_threshold) {
            return Err(ConfigError::InvalidThreshold(self.intersection_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_card_grid() {
        let cfg = ListConfig::default();
        assert_eq!(cfg.item_height, 200.0);
        assert_eq!(cfg.buffer_size, 5);
        assert_eq!(cfg.throttle_interval(), Duration::from_millis(100));
        assert_eq!(cfg.intersection_margin(), 1000.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_item_height() {
        for h in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            let err = ListConfig::default().item_height(h).validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidItemHeight(_)));
        }
    }

    #[test]
    fn rejects_bad_threshold() {
        let err = ListConfig::default()
            .intersection_threshold(1.5)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidThreshold(1.5));
        assert!(
            ListConfig::default()
                .intersection_threshold(f32::NAN)
                .validate()
                .is_err()
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_partial_json() {
        let cfg: ListConfig =
            serde_json::from_str(r#"{ "item_height": 96.0, "throttle_ms": 50 }"#).unwrap();
        assert_eq!(cfg.item_height, 96.0);
        assert_eq!(cfg.throttle_interval(), Duration::from_millis(50));
        assert_eq!(cfg.buffer_size, 5);
        assert!(cfg.lazy_loading);
    }
}
