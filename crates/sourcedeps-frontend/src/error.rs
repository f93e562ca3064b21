use sourcedeps_core::{GraphError, NodeKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("no {kind} key can be made from {entity}")]
    UnsupportedEntity { kind: NodeKind, entity: &'static str },

    #[error("{kind} entity must have a name")]
    UnnamedEntity { kind: NodeKind },

    #[error("the compilation unit has no name")]
    UnnamedUnit,
}
