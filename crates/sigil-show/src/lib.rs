//! Sigil Show
//!
//! Everything around the path sampler that drives the installation.
//!
//! Features:
//! - Sigil library loading from JSON documents
//! - Feed message decoding (sigil, percept, phase, mind moment)
//! - Staggered point morphing on a disperse/form schedule
//! - Idle / percepts / sigil state context

pub mod feed;
pub mod library;
pub mod morph;
pub mod state;

pub use feed::{
    FeedEvent, MindMomentMessage, PerceptBody, PerceptMessage, Phase, PhaseMessage, PngData,
    SigilMessage,
};
pub use library::{Sigil, SigilLibrary, extract_points};
pub use morph::{
    Envelope, MorphFrame, MorphSettings, ParamRange, SigilMorph, VfxParams, blend, smoothstep,
};
pub use state::{Installation, Mode, Percept, PerceptBuffer, SigilCycle, StateDurations, StateEvent};

/// Show error
#[derive(Debug, thiserror::Error)]
pub enum ShowError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown feed event: {0}")]
    UnknownEvent(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}
