//! Storage abstractions for the service layer
//!
//! Client-local records are named JSON values, the way a browser's local
//! storage keeps them. `KvStorage` is the seam; `JsonMapStore` is the reusable
//! file-backed map behind the file implementation.

pub mod json_map_store;
pub mod kv;
pub mod memory;

pub use kv::KvStorage;
pub use memory::MemoryKvStorage;
