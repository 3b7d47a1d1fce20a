use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::MAX_VTX;

/// Byte width of a [`GraphUid`]: one vertex-count byte plus packed nibbles
/// for the lower triangle of a `MAX_VTX` matrix.
pub const UID_LEN: usize = 1 + (MAX_VTX * (MAX_VTX + 1) / 2 + 1) / 2;

/// Exact fixed-width identity of a canonical form.
///
/// The encoding is injective for every graph up to `MAX_VTX` vertices, so no
/// hashing is involved. Ordering sorts by vertex count first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphUid([u8; UID_LEN]);

impl GraphUid {
    /// Packs a vertex count and lower-triangle cell codes.
    pub(crate) fn pack(n: usize, cells: &[u8]) -> Self {
        let mut bytes = [0u8; UID_LEN];
        bytes[0] = n as u8;
        for (idx, &code) in cells.iter().enumerate() {
            let byte = &mut bytes[1 + idx / 2];
            if idx % 2 == 0 {
                *byte |= code << 4;
            } else {
                *byte |= code & 0x0f;
            }
        }
        Self(bytes)
    }

    /// Vertex count and lower-triangle cell codes.
    pub(crate) fn unpack(&self) -> (usize, Vec<u8>) {
        let n = usize::from(self.0[0]);
        let len = n * (n + 1) / 2;
        let cells = (0..len)
            .map(|idx| {
                let byte = self.0[1 + idx / 2];
                if idx % 2 == 0 {
                    byte >> 4
                } else {
                    byte & 0x0f
                }
            })
            .collect();
        (n, cells)
    }

    /// Restores an identity from raw bytes.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, TriError> {
        let bytes: [u8; UID_LEN] = raw.try_into().map_err(|_| {
            TriError::Serde(
                ErrorInfo::new("uid.length", "graph uid has the wrong length")
                    .with_context("len", raw.len().to_string())
                    .with_context("expected", UID_LEN.to_string()),
            )
        })?;
        let n = usize::from(bytes[0]);
        if n == 0 || n > MAX_VTX {
            return Err(TriError::Serde(
                ErrorInfo::new("uid.verts", "graph uid encodes an invalid vertex count")
                    .with_context("verts", n.to_string()),
            ));
        }
        Ok(Self(bytes))
    }

    /// Parses the lowercase hex rendering.
    pub fn from_hex(text: &str) -> Result<Self, TriError> {
        let raw = hex::decode(text)
            .map_err(|err| TriError::Serde(ErrorInfo::new("uid.hex", err.to_string())))?;
        Self::from_bytes(&raw)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Vertex count encoded in the identity.
    pub fn num_verts(&self) -> usize {
        usize::from(self.0[0])
    }
}

impl fmt::Display for GraphUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for GraphUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphUid({})", self.to_hex())
    }
}

impl Serialize for GraphUid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for GraphUid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        GraphUid::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
