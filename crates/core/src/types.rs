/// Quote identifiers are UUIDv7, assigned when a submission is accepted.
pub type QuoteId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
