use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("item height must be a positive, finite number of pixels (got {0})")]
    InvalidItemHeight(f32),
    #[error("intersection threshold must be within 0.0..=1.0 (got {0})")]
    InvalidThreshold(f32),
}
