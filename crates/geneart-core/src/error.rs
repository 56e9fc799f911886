//! Error type shared by the fallible operations of the engine.

/// Errors surfaced by configuration, sequence loading and generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneArtError {
    /// A generation was requested from a sequence with no characters.
    #[error("sequence is empty, nothing to assign to particles")]
    EmptySequence,
    /// A configuration value is outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A shape name other than `helix`, `circle` or `wave`.
    #[error("unknown shape '{0}'")]
    UnknownShape(String),
    /// A movement mode name other than `flow`, `helix` or `network`.
    #[error("unknown movement mode '{0}'")]
    UnknownMode(String),
    /// No sequence has been loaded under this gene identifier.
    #[error("no sequence loaded for gene '{0}'")]
    UnknownGene(String),
    /// A sequence payload or configuration document failed to parse.
    #[error("failed to parse payload: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeneArtError>;
