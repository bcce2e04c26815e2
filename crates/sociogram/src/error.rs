pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] sociogram_graph::GraphError),

    #[error("duplicate node id in ingest batch: {id}")]
    DuplicateNode { id: String },

    #[error("invalid persisted state: {0}")]
    Persist(#[from] serde_json::Error),
}
