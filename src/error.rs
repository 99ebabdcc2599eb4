use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("not an SVG document: root element is <{0}>")]
    NotAnSvg(String),

    #[error("invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("invalid path data: {0}")]
    InvalidPath(String),

    #[error("import error: {0}")]
    Import(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
