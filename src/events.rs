use crate::source::{SourceError, Table};
use crate::wheel::{Rgb, Slice};

/// The slice a spin stopped on, detached from the wheel that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub name: String,
    pub sub: Option<String>,
    pub extras: Vec<String>,
    pub color: Rgb,
}

impl From<&Slice> for Winner {
    fn from(slice: &Slice) -> Self {
        Self {
            name: slice.name.to_string(),
            sub: slice.sub.clone(),
            extras: slice.extras.clone(),
            color: slice.color,
        }
    }
}

/// Emitted by the engine for collaborators (audio, renderer, fetcher).
#[derive(Debug, Clone, PartialEq)]
pub enum WheelEvent {
    /// A different slice reached the pointer mid-spin.
    Tick,
    SpinStarted,
    Finished(Winner),
    /// An `import` marker was consumed; the caller should fetch the table and
    /// hand it back through `Engine::complete_import`.
    ImportRequested,
}

#[derive(Debug)]
pub enum AppEvent {
    Fetched(Result<Table, SourceError>),
}
