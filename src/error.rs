use thiserror::Error;

#[derive(Error, Debug)]
pub enum PactopacError {
    #[error("Pacman command failed: {0}")]
    PacmanFailed(String),

    #[error("Flatpak command failed: {0}")]
    FlatpakFailed(String),

    #[error("{0} is not installed")]
    ToolMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl PactopacError {
    /// Map a spawn error, turning `NotFound` into `ToolMissing`
    pub fn from_spawn(tool: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            PactopacError::ToolMissing(tool.to_string())
        } else {
            PactopacError::Io(err)
        }
    }
}

impl From<dialoguer::Error> for PactopacError {
    fn from(err: dialoguer::Error) -> Self {
        PactopacError::Dialog(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PactopacError>;
