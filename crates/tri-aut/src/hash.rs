use sha2::{Digest, Sha256};

use crate::uid::GraphUid;

/// SHA-256 over identities in the order given, rendered as lowercase hex.
pub fn uid_digest<'a, I>(uids: I) -> String
where
    I: IntoIterator<Item = &'a GraphUid>,
{
    let mut hasher = Sha256::new();
    for uid in uids {
        hasher.update(uid.as_bytes());
    }
    hex::encode(hasher.finalize())
}
