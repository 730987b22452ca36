use std::collections::BTreeSet;

use crate::descriptor::{CoarseKind, TypeDescriptor};

/// Substantive members at which an all-scalar union is treated as the
/// arbitrary-value shape even without an array/object arm.
const WIDE_UNION_MIN: usize = 4;

/// Does this union look like `string | number | boolean | null | {..} | T[]`?
///
/// Structural on purpose: members carry no identity to track, so the check
/// is on the set of coarse kinds. A union that merely happens to mix all
/// three scalars with an array or object is classified the same way.
pub fn is_self_referential_dynamic(members: &[TypeDescriptor]) -> bool {
    let mut kinds = BTreeSet::new();
    let mut substantive = 0usize;
    for member in members.iter().filter(|m| !m.is_absence()) {
        substantive += 1;
        if let Some(kind) = member.coarse_kind() {
            kinds.insert(kind);
        }
    }
    let scalars = kinds.contains(&CoarseKind::String)
        && kinds.contains(&CoarseKind::Number)
        && kinds.contains(&CoarseKind::Boolean);
    let container = kinds.contains(&CoarseKind::Array) || kinds.contains(&CoarseKind::Object);

    scalars && (container || substantive >= WIDE_UNION_MIN)
}
