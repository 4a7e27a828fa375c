use std::io;
use thiserror::Error;

use crate::recipe::RecipeError;

/// Failures a recording can surface to the invoking layer.
///
/// A non-zero exit from the program under test is not an error; it is part
/// of the recorded outcome.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("no command supplied; expected an executable followed by its arguments")]
    EmptyCommand,
    #[error("failed to start {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error(transparent)]
    Recipe(#[from] RecipeError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
