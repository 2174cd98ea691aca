//! Dictionary and codec utilities shared by the clients and the editor UI

pub mod codec;
pub mod dict;
