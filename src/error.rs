use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("remote returned status {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("git command failed: {0}")]
    Git(String),
    #[error("failed to send request")]
    Http(#[from] reqwest::Error),
    #[error("failed to parse json")]
    Json(#[from] serde_json::Error),
    #[error("failed to read repository")]
    Repository(#[from] git2::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to render template")]
    Template(#[from] handlebars::RenderError),
    #[error("invalid template")]
    TemplateSyntax(#[from] handlebars::TemplateError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Error::Remote {
            status,
            message: message.into(),
        }
    }
}
