use thiserror::Error;

/// Failures loading the bot's `help.json` command catalogue.
///
/// Never surfaced to clients; the catalogue answers with an error document instead.
#[derive(Error, Debug)]
pub enum CommandCatalogError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// `metadata.totalCommands` or `metadata.categories` missing or not a number.
    #[error("Invalid help.json structure in {path}: missing or invalid metadata")]
    InvalidMetadata { path: String },
}
