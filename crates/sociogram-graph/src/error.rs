pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("edge {a} -- {b} references missing node: {missing}")]
    MissingEndpoint {
        a: String,
        b: String,
        missing: String,
    },

    #[error("self edges are not allowed: {id}")]
    SelfEdge { id: String },
}
