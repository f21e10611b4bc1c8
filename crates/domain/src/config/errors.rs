use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error(
        "No sources selected: set ALL_SERVICES=true or SERVICE_NAMES (run `lancache-sync list-sources` to see the available names)"
    )]
    NoSourceSelection,

    #[error("ALL_SERVICES and SERVICE_NAMES are mutually exclusive")]
    ConflictingSourceSelection,
}
