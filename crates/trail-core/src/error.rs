use thiserror::Error;

/// Failures while turning host-supplied text into configuration values.
///
/// None of these ever reach the render loop: hosts log them and keep the
/// previous snapshot.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown blend mode '{0}'")]
    UnknownBlendMode(String),
    #[error("unknown particle shape '{0}'")]
    UnknownShape(String),
}
