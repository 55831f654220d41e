// Record identifiers.
//
// Every user and recipe id is a UUIDv7 generated app-side, in both storage
// modes. v7 ids embed a timestamp, which keeps PostgreSQL index inserts
// append-mostly.
// Externally the id is always exposed as its hyphenated string form.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse an external id string, returning `None` for anything that is not a UUID.
///
/// Only the lowercase hyphenated form is accepted, so an id matches in
/// PostgreSQL exactly when it would match as a plain string in memory.
pub fn parse_id(id: &str) -> Option<Uuid> {
    let parsed = Uuid::try_parse(id).ok()?;
    let mut buf = Uuid::encode_buffer();
    let canonical: &str = parsed.hyphenated().encode_lower(&mut buf);
    (canonical == id).then_some(parsed)
}
