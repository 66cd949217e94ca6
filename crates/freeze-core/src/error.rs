use thiserror::Error;

pub type FreezeResult<T> = Result<T, FreezeError>;

#[derive(Debug, Error)]
pub enum FreezeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error [{path}]: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("frame index {index} out of range (frames: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("capture error: {0}")]
    Capture(String),
}
