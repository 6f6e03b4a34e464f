use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid vertex {0}")]
    InvalidVertex(usize),
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
