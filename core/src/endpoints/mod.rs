//! Resource-specific wrappers over [`Client`](crate::Client).

mod characters;
mod fleets;

pub use characters::CharactersEndpoint;
pub use fleets::FleetsEndpoint;
