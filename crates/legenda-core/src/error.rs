pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("color map {location} is not accessible: {message}")]
    DocumentAccess { location: String, message: String },

    #[error("unable to parse color map document: {message}")]
    MalformedDocument { message: String },

    #[error("cannot parse {value:?} as a color-map bound")]
    NumericFormat { value: String },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    pub(crate) fn numeric(value: impl Into<String>) -> Self {
        Self::NumericFormat {
            value: value.into(),
        }
    }
}
