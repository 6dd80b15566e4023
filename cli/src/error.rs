use seablock_client::SeaBlockError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] SeaBlockError),
    #[error("{0}")]
    Input(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn title(&self) -> &'static str {
        match self {
            CliError::Client(e) => e.title(),
            CliError::Input(_) => "Invalid Input",
            CliError::Io(_) => "I/O Error",
        }
    }
}
