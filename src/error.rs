use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The repeat count field of a record could not be parsed as a non negative integer
    #[error("malformed repeat count: {value:?}")]
    MalformedCount { value: String },
}
