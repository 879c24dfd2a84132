/// Compare two expression lists as sets: order and duplicates are ignored.
///
/// Recognises the level whose partition keys alias the statement's own
/// GROUP BY. Only `PartialEq` is required of expression nodes.
#[must_use]
pub fn deep_equals_ignore_dup_and_order<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    left.iter().all(|expr| right.contains(expr)) && right.iter().all(|expr| left.contains(expr))
}
