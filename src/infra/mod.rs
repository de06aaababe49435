//! Concrete collaborator backends.

pub mod snapshot;
