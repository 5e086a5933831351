//! The sole growth primitive used to assemble tokens and PAE buffers
//! without unnecessary reallocation.

/// Extends `buf` by `extra` bytes, returning a single buffer of length
/// `buf.len() + extra` whose first `buf.len()` bytes are unchanged.
///
/// If `buf`'s existing capacity can already hold `extra` more bytes, no
/// allocation occurs and the returned `Vec` keeps its original pointer.
/// Otherwise a fresh `Vec` with exact capacity `buf.len() + extra` is
/// allocated and the original contents are copied into it.
///
/// Rust's ownership rules make Go's two-aliasing-slices-from-one-call
/// signature unnecessary: callers that need a "before" view and an
/// "after" view into the same storage simultaneously take the single
/// returned buffer and split it with `split_at`/`split_at_mut` instead.
///
/// The new bytes past the original length are zero-initialized.
pub fn extend(mut buf: Vec<u8>, extra: usize) -> Vec<u8> {
    let len = buf.len();
    if buf.capacity() - len < extra {
        let mut grown = Vec::with_capacity(len + extra);
        grown.extend_from_slice(&buf);
        buf = grown;
    }
    buf.resize(len + extra, 0);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_without_realloc_keeps_pointer_when_capacity_suffices() {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(b"hello");
        let ptr_before = buf.as_ptr();

        let grown = extend(buf, 8);

        assert_eq!(ptr_before, grown.as_ptr());
        assert_eq!(&grown[..5], b"hello");
        assert_eq!(grown.len(), 13);
    }

    #[test]
    fn extend_reallocates_when_capacity_insufficient() {
        let mut buf = Vec::with_capacity(4);
        buf.extend_from_slice(b"abcd");

        let grown = extend(buf, 100);

        assert_eq!(&grown[..4], b"abcd");
        assert_eq!(grown.len(), 104);
    }

    #[test]
    fn extend_by_zero_is_a_no_op_on_contents() {
        let buf = b"payload".to_vec();
        let same = extend(buf.clone(), 0);
        assert_eq!(buf, same);
    }

    #[test]
    fn extend_idempotent_pointer_when_slack_suffices_repeatedly() {
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(b"x");
        let ptr = buf.as_ptr();

        let once = extend(buf, 10);
        assert_eq!(ptr, once.as_ptr());

        let twice = extend(once, 10);
        assert_eq!(ptr, twice.as_ptr());
    }
}
