use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("missing patient identifier")]
    MissingIdentifier,
    #[error("unknown AHA segment id: {0}")]
    UnknownSegment(u8),
}

pub type Result<T> = std::result::Result<T, ModelError>;
