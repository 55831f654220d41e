use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("Database: {}", .0)]
    Connect(#[from] tastetrail_core::mode::ConnectError),

    #[error("Store: {}", .0)]
    Store(#[from] tastetrail_core::store::StoreError),
}
