/// Every primary key in the schema is a UUID issued by the database or the
/// identity service.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
