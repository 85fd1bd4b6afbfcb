use crate::error::CoreError;

/// Returns the number of zero bytes needed to round `length` up to a
/// multiple of `block_size`.
///
/// The result is always in `[0, block_size)`. A `block_size` of zero means
/// no alignment and yields zero.
pub fn compute_padding(length: usize, block_size: usize) -> usize {
    if block_size == 0 {
        return 0;
    }
    match length % block_size {
        0 => 0,
        spare => block_size - spare,
    }
}

/// Zero-fills `buf[length..length + padding]` and returns the padded length.
///
/// Bytes before `length` are left untouched. Fails with
/// [`CoreError::OutOfBounds`] when `buf` cannot hold the padded length.
pub fn apply_padding(buf: &mut [u8], length: usize, block_size: usize) -> Result<usize, CoreError> {
    let total = length
        .checked_add(compute_padding(length, block_size))
        .ok_or(CoreError::InvalidInput("padded length overflows usize"))?;
    if total > buf.len() {
        return Err(CoreError::OutOfBounds {
            required: total,
            capacity: buf.len(),
        });
    }
    buf[length..total].fill(0);
    Ok(total)
}

/// Grows `buf` with zero bytes up to the next `block_size` boundary.
pub fn pad_to_block(mut buf: Vec<u8>, block_size: usize) -> Vec<u8> {
    let padding = compute_padding(buf.len(), block_size);
    buf.resize(buf.len() + padding, 0);
    buf
}

#[cfg(test)]
mod tests {
    use super::{apply_padding, compute_padding, pad_to_block};
    use crate::error::CoreError;
    use proptest::prelude::*;

    #[test]
    fn aligned_lengths_need_no_padding() {
        assert_eq!(compute_padding(0, 8), 0);
        assert_eq!(compute_padding(16, 8), 0);
        assert_eq!(compute_padding(7, 1), 0);
    }

    #[test]
    fn unaligned_lengths_round_up() {
        assert_eq!(compute_padding(1, 8), 7);
        assert_eq!(compute_padding(13, 8), 3);
        assert_eq!(compute_padding(100, 16), 12);
    }

    #[test]
    fn zero_block_size_means_no_alignment() {
        assert_eq!(compute_padding(13, 0), 0);
    }

    #[test]
    fn apply_zero_fills_only_the_padding_region() {
        let mut buf = [0xAA_u8; 16];
        let total = apply_padding(&mut buf, 5, 8).expect("buffer is large enough");
        assert_eq!(total, 8);
        assert_eq!(&buf[..5], &[0xAA; 5]);
        assert_eq!(&buf[5..8], &[0; 3]);
        assert_eq!(&buf[8..], &[0xAA; 8]);
    }

    #[test]
    fn apply_rejects_short_buffer() {
        let mut buf = [0xAA_u8; 6];
        let err = apply_padding(&mut buf, 5, 8).expect_err("buffer is too small");
        assert_eq!(
            err,
            CoreError::OutOfBounds {
                required: 8,
                capacity: 6
            }
        );
        assert_eq!(buf, [0xAA; 6]);
    }

    #[test]
    fn pad_to_block_extends_with_zeros() {
        let padded = pad_to_block(vec![1, 2, 3], 4);
        assert_eq!(padded, vec![1, 2, 3, 0]);
        assert_eq!(pad_to_block(vec![1, 2, 3, 4], 4).len(), 4);
    }

    proptest! {
        #[test]
        fn padding_reaches_smallest_block_multiple(length in 0usize..1 << 20, block in 1usize..4096) {
            let padding = compute_padding(length, block);
            prop_assert!(padding < block);
            prop_assert_eq!((length + padding) % block, 0);
        }

        #[test]
        fn apply_preserves_prefix_and_zeroes_tail(
            data in proptest::collection::vec(any::<u8>(), 0..256),
            block in 1usize..64,
        ) {
            let length = data.len();
            let mut buf = data.clone();
            buf.resize(length + block, 0xFF);
            let total = apply_padding(&mut buf, length, block).expect("capacity covers padding");
            prop_assert_eq!(total, length + compute_padding(length, block));
            prop_assert_eq!(&buf[..length], &data[..]);
            prop_assert!(buf[length..total].iter().all(|b| *b == 0));
            prop_assert!(buf[total..].iter().all(|b| *b == 0xFF));
        }
    }
}
