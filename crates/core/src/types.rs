/// Garden identifiers are opaque strings (server-generated UUIDs or
/// caller-chosen IDs of UUID shape).
pub type GardenId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
