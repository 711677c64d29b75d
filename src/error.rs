use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("event configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("error loading event configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("error reading event configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("env variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("env variable {var} has an invalid value: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("no configuration found for event name: {0}")]
    UnknownEvent(String),

    #[error("invalid minCount value for service {0}")]
    InvalidTarget(String),

    #[error("autoscaler for service '{service}' not found in namespace '{namespace}'")]
    HpaNotFound { service: String, namespace: String },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
