//! Umbrella error type.

use thiserror::Error;

use crate::config::ConfigError;
use pagekit_form::FormError;
use pagekit_view::ViewError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
