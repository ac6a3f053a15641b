//! Editor-side building blocks: crop math for image framing and an
//! optimistic element store that mirrors the server state.

pub mod crop;
pub mod store;
