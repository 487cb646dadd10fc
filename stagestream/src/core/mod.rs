//! Core stage types.

mod status;

pub use status::{StageExit, StageKind};
