// Match archive persistence
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod manager;

pub use error::SaveError;
pub use format::{decompress_and_deserialize, serialize_and_compress, MatchArchive};
pub use manager::SaveManager;

/// Bumped whenever the persisted layout of `Match` changes.
pub const ARCHIVE_VERSION: u32 = 1;
