use std::path::PathBuf;

/// Errors from loading the scene configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors from building a body registry out of user-supplied data.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read bodies file: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to parse bodies file: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("registry has no bodies")]
    Empty,

    #[error("first body ({0}) must sit still at the origin")]
    CentralBodyOrbits(String),

    #[error("body {0} must have a positive orbit radius")]
    InvalidOrbit(String),

    #[error("body name {0} is used more than once")]
    DuplicateName(String),

    #[error("body {0} must have a positive radius")]
    InvalidRadius(String),

    #[error("ring of {0} must satisfy 0 <= inner < outer")]
    InvalidRing(String),
}

/// Errors from turning generated geometry and image files into GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("texture {} not found", .0.display())]
    MissingTexture(PathBuf),

    #[error("texture {} could not be decoded: {source}", .path.display())]
    InvalidTexture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("mesh {name} has {vertices} vertices, more than 16-bit indices can address")]
    MeshTooLarge { name: String, vertices: usize },
}

/// Anything that stops the scene from starting. None of these are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("could not create a rendering context: {0}")]
    UnsupportedBackend(String),
}
