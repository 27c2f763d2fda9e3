// Adapters layer: concrete implementations for external collaborators.
// The dose engine has no in-crate adapter; hosts supply their own.

pub mod registry;
