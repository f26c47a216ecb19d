//! Fallback layer: synthesized recurring contests and layered profile
//! resolution. Nothing here fails outward.

pub mod profile_chain;
pub mod recurring;

pub use profile_chain::{ProfileChain, ResolvedProfile};
pub use recurring::{ensure_minimum, next_occurrence, synthesize};
