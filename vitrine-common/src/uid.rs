//! Short random identifiers for items and evaluations

use uuid::Uuid;

/// Length of generated identifiers
pub const SHORT_ID_LEN: usize = 8;

/// Generate a fresh short identifier (8 lowercase hex chars from a UUIDv4)
///
/// No uniqueness is enforced across a collection; collisions are accepted
/// as negligible at catalog scale.
pub fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

/// Generate a stub identifier (`stub-` prefix plus 6 random chars)
pub fn stub_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(6);
    format!("stub-{}", id)
}
