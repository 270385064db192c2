use thiserror::Error;

#[derive(Error, Debug)]
pub enum HolosphereError {
    #[error("Unknown neon color '{0}' (expected a color name, #rrggbb or 'cycle')")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HolosphereError>;
