//! Crate-wide error type.

pub type Result<T> = std::result::Result<T, TableauError>;

#[derive(thiserror::Error, Debug)]
pub enum TableauError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request failed with HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("asset '{0}' is not loaded")]
    MissingAsset(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("gpu setup error: {0}")]
    Gpu(String),

    #[error("window error: {0}")]
    Window(String),
}

impl TableauError {
    pub fn missing_asset(alias: impl Into<String>) -> Self {
        Self::MissingAsset(alias.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::Gpu(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(TableauError::Status(404).to_string().contains("404"));
        assert!(
            TableauError::missing_asset("cards")
                .to_string()
                .contains("'cards'")
        );
        assert!(
            TableauError::transport("refused")
                .to_string()
                .starts_with("transport error:")
        );
    }
}
