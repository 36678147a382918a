use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid path data: {0}")]
    InvalidPath(String),

    #[error("No minifier registered for {0}")]
    NotRegistered(String),

    #[error("Minifier error: {0}")]
    Minifier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
