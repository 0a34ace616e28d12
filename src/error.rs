use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No grid widget could be located on the current page.")]
    GridNotFound,
    #[error("Couldn't read any rows from page 1. Finish logging in and filtering before continuing (the login button only needs one click).")]
    FirstPageEmpty,

    #[error("The selector you are trying to query with is invalid. Selector: {0}")]
    InvalidSelector(String),

    #[error("Chrome executable not found. Pass one with --chrome <PATH>.")]
    ChromeNotFound,
    #[error("Browser Error: {0}")]
    Browser(String),

    #[error("Export Error: {0}")]
    Export(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(value: chromiumoxide::error::CdpError) -> Self {
        Error::Browser(value.to_string())
    }
}
