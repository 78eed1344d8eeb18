//! Descriptor plumbing and process lifecycle for pipeline stages.

pub mod child;
pub mod launch;
pub mod pipe;
pub mod status;
pub mod stdio;
