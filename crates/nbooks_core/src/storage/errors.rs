/// Errors raised while talking to the object store.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed, originating from `reqwest`
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered, but refused the object
    #[error("storage rejected the upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The configured API key cannot be sent as a header
    #[error("storage API key contains characters that are not allowed in a header")]
    InvalidApiKey,
}
