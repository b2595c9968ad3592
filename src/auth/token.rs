//! Token secrets and the pair issued by the token endpoint.

pub mod pair;
pub mod secret;
