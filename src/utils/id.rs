//! Short random identifiers for vector records.

use uuid::Uuid;

/// Length of generated record ids.
pub const SHORT_ID_LEN: usize = 10;

/// Random 10-character lowercase hex id.
///
/// Taken from the random bits of a v4 UUID; the version nibble sits past
/// the prefix, so every character is random.
pub fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}
