/// Record identities are plain integers supplied by the record source.
pub type RecordId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
