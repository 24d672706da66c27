//! CLI command implementations.

pub(crate) mod indicator;
pub(crate) mod list;
pub(crate) mod profile;
pub(crate) mod replay;
pub(crate) mod transform;
