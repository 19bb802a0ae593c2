//! Error types for report building.

use std::io;
use thiserror::Error;

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The PDF encoder is not compiled into this build.
    #[error("Generador de PDF no disponible: compile con la característica `pdf`")]
    RendererUnavailable,

    /// One or more mandatory fields are blank. Holds every missing label, in form order.
    #[error("Faltan campos: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// Drawing or serialization failed after layout started.
    #[error("Ocurrió un error al generar el PDF: {0}")]
    Build(String),

    /// Form input that is not a flat JSON object of text answers.
    #[error("Formulario inválido: {0}")]
    Form(String),

    /// Invalid layout configuration or unreadable font file.
    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Labels of the missing fields when this is a validation failure.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Error::Validation { missing } => missing,
            _ => &[],
        }
    }
}
