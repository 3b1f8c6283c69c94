use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("node {node_id} has unknown location {location:?}")]
    MissingLocation { node_id: String, location: String },

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("failed to fetch {what}: {source}")]
    FetchFailure {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value {value} for simulation parameter {name}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

pub type Result<T> = std::result::Result<T, Error>;
