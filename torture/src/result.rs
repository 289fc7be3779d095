/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Packing observation buffers into histogram keys.
//!
//! Every observation is written into a fixed 8-byte buffer; a test declares how
//! many of those bytes are significant via `result_size()`. Keys are the
//! little-endian `u64` reading of the buffer with all insignificant bytes
//! masked to zero, so two observations that agree on their significant bytes
//! always collide into one histogram bucket.

/// Result buffers carry at most this many significant bytes.
pub const MAX_RESULT_BYTES: usize = 8;

/// Pack an observation buffer into a histogram key, zeroing every byte past
/// the first `significant` ones.
pub fn pack(buffer: &[u8; MAX_RESULT_BYTES], significant: usize) -> u64 {
    debug_assert!((1..=MAX_RESULT_BYTES).contains(&significant));
    u64::from_le_bytes(*buffer) & mask(significant)
}

/// Recover the full 8-byte buffer behind a key. Insignificant bytes read back
/// as zero.
pub fn unpack(key: u64) -> [u8; MAX_RESULT_BYTES] {
    key.to_le_bytes()
}

/// The `significant`-byte observation vector behind a key, as reported in the
/// results artifact and fed to classification.
pub fn truncate(key: u64, significant: usize) -> Vec<u8> {
    unpack(key)[..significant].to_vec()
}

fn mask(significant: usize) -> u64 {
    if significant >= MAX_RESULT_BYTES {
        u64::MAX
    } else {
        (1u64 << (8 * significant)) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_at_every_size() {
        for significant in 1..=MAX_RESULT_BYTES {
            let mut buffer = [0u8; MAX_RESULT_BYTES];
            for (i, b) in buffer.iter_mut().enumerate().take(significant) {
                *b = 0xA0 + i as u8;
            }
            let key = pack(&buffer, significant);
            assert_eq!(unpack(key), buffer);
            assert_eq!(truncate(key, significant), buffer[..significant]);
        }
    }

    #[test]
    fn bytes_past_the_significant_prefix_are_zeroed() {
        let buffer = [0xFF; MAX_RESULT_BYTES];
        for significant in 1..MAX_RESULT_BYTES {
            let key = pack(&buffer, significant);
            let back = unpack(key);
            assert!(back[..significant].iter().all(|&b| b == 0xFF));
            assert!(back[significant..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn full_width_keys_are_lossless() {
        let buffer = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(unpack(pack(&buffer, 8)), buffer);
    }

    #[test]
    fn identical_significant_bytes_collide() {
        let a = [7, 7, 0xDE, 0xAD, 0xBE, 0xEF, 0, 0];
        let b = [7, 7, 0, 0, 0, 0, 0, 0];
        assert_eq!(pack(&a, 2), pack(&b, 2));
    }
}
