use thiserror::Error;

use crate::value::NumberPolicy;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Truncated buffer, overrunning length prefix or a dangling table index.
    #[error("malformed tile: {0}")]
    Format(String),

    #[error("feature index {index} out of range for layer with {len} features")]
    OutOfRange { index: usize, len: usize },

    #[error("integer {value} cannot be represented losslessly as {policy}")]
    PrecisionLoss { value: i128, policy: NumberPolicy },
}

impl Error {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Format(format!("read varint: {err}"))
    }
}
