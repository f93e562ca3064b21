//! Internal-consistency errors raised by the graph store

use thiserror::Error;

use crate::model::DependencyKey;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("node pairs are created from interface keys, got {0}")]
    NotAnInterfaceKey(DependencyKey),

    #[error("the whole-unit node must be created before {0}")]
    SourceFileNodeMissing(DependencyKey),

    #[error("the whole-unit node must be the first node in the graph, got {0}")]
    SourceFileNodeNotFirst(DependencyKey),

    #[error("fingerprint for {0} is empty")]
    EmptyFingerprint(DependencyKey),

    #[error("conflicting fingerprints for {key}: {existing} vs {requested}")]
    FingerprintConflict {
        key: DependencyKey,
        existing: String,
        requested: String,
    },

    #[error("node {0} does not exist")]
    NodeNotFound(usize),

    #[error("arc target {0} is not a provider")]
    UseNotProvider(DependencyKey),

    #[error("key {0} appears on more than one node")]
    DuplicateKey(DependencyKey),

    #[error("provider {0} has no provider counterpart for the other aspect")]
    UnpairedProvider(DependencyKey),

    #[error("malformed persisted graph: {0}")]
    Malformed(String),

    #[error("graph (de)serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
