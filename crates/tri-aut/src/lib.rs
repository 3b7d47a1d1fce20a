#![deny(missing_docs)]
#![doc = "Canonical forms, exact identities and automorphism counts for trivalent particle graphs."]

/// Canonical search over colour-respecting labelings.
pub mod canonical;
/// Digests over canonical identities.
pub mod hash;
/// Colour refinement used to prune the canonical search.
pub mod refine;
/// Iterator adapters keyed by canonical identity.
pub mod stream;
/// Fixed-width canonical identities.
pub mod uid;

pub use canonical::{
    canonical_form, canonical_graph, canonicalize, exhaustive_canonical_form, CanonOpts,
    CanonicalForm, CanonicalLabeling,
};
pub use hash::uid_digest;
pub use stream::{CanonicalDedup, CanonicalStreamExt};
pub use uid::{GraphUid, UID_LEN};

use tri_graph::Graph;

/// Returns `true` when the two graphs are isomorphic.
pub fn isomorphic(lhs: &Graph, rhs: &Graph) -> bool {
    lhs.num_verts() == rhs.num_verts() && canonical_form(lhs) == canonical_form(rhs)
}
