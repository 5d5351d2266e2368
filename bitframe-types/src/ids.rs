//! Identifiers shared across bitframe crates.

/// A horizontal partition of a table's rows. Shards are stored and committed
/// independently of each other; the id doubles as the shard file's name.
pub type ShardId = u64;

/// Shard-relative row id. Row ids arrive already un-sharded, so they index
/// directly into the shard's chunked columns. Signed to match the wire form
/// changesets are delivered in; negative ids are rejected at validation.
pub type RowId = i64;
