//! Constant-time comparison.
//!
//! Execution time depends only on the lengths of the inputs, never on their
//! contents or on where they first differ.

/// Returns `true` if `a == b`, in constant time.
///
/// Lengths are compared without an early return: the length difference is
/// folded into the accumulator and the loop always runs over the longer
/// input, reading both sides on every iteration.
#[inline(never)]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    accumulate(a, b, |_| {}) == 0
}

/// XOR-OR accumulation over both inputs. `visit` is called once per byte
/// position so tests can count the work done.
#[inline(always)]
fn accumulate(a: &[u8], b: &[u8], mut visit: impl FnMut(usize)) -> u64 {
    let len = a.len().max(b.len());
    let mut diff = (a.len() ^ b.len()) as u64;

    for i in 0..len {
        // Out-of-range positions read index 0 of the shorter side (or a
        // zero byte when it is empty); the length term already forces a
        // mismatch in that case.
        let x = byte_at(a, i);
        let y = byte_at(b, i);
        diff |= (x ^ y) as u64;
        visit(i);
    }

    std::hint::black_box(diff)
}

#[inline(always)]
fn byte_at(bytes: &[u8], i: usize) -> u8 {
    if bytes.is_empty() {
        return 0;
    }
    let in_range = (i < bytes.len()) as usize;
    // Branchless select between `i` and 0.
    let idx = i * in_range;
    bytes[idx] & (0u8.wrapping_sub(in_range as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_ops(a: &[u8], b: &[u8]) -> (bool, usize) {
        let mut ops = 0;
        let equal = accumulate(a, b, |_| ops += 1) == 0;
        (equal, ops)
    }

    #[test]
    fn test_equal_inputs() {
        assert!(constant_time_eq(b"same bytes", b"same bytes"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_content_mismatch() {
        assert!(!constant_time_eq(b"abcd", b"abce"));
        assert!(!constant_time_eq(b"abcd", b"xbcd"));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(!constant_time_eq(b"abcd", b"abc"));
        assert!(!constant_time_eq(b"", b"a"));
        // A prefix padded with zeros must not compare equal.
        assert!(!constant_time_eq(b"ab", b"ab\0"));
    }

    #[test]
    fn test_same_work_regardless_of_mismatch_position() {
        let reference = [0x5au8; 32];
        let mut first = reference;
        first[0] ^= 0xff;
        let mut last = reference;
        last[31] ^= 0xff;

        let (eq_first, ops_first) = count_ops(&reference, &first);
        let (eq_last, ops_last) = count_ops(&reference, &last);
        let (eq_same, ops_same) = count_ops(&reference, &reference);

        assert!(!eq_first);
        assert!(!eq_last);
        assert!(eq_same);
        assert_eq!(ops_first, 32);
        assert_eq!(ops_first, ops_last);
        assert_eq!(ops_first, ops_same);
    }

    #[test]
    fn test_length_mismatch_still_visits_every_byte() {
        let (equal, ops) = count_ops(&[1u8; 16], &[1u8; 32]);
        assert!(!equal);
        assert_eq!(ops, 32);
    }
}
