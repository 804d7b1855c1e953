//! Positional bitmask helpers for Multi group selections.

/// Remove bit `index` from `mask`, shifting every higher bit down by one.
///
/// Bits below `index` are kept as they are.
pub fn remove_bit(mask: u32, index: usize) -> u32 {
    if index >= u32::BITS as usize {
        return mask;
    }

    let low_mask = (1u32 << index) - 1;
    let high = if index + 1 >= u32::BITS as usize {
        0
    } else {
        (mask & !((1u32 << (index + 1)) - 1)) >> 1
    };

    (mask & low_mask) | high
}

/// Flip bit `index` of `mask`. Indices past the mask width leave it unchanged.
pub fn toggle_bit(mask: u32, index: usize) -> u32 {
    if index >= u32::BITS as usize {
        return mask;
    }
    mask ^ (1u32 << index)
}

pub fn is_set(mask: u32, index: usize) -> bool {
    index < u32::BITS as usize && mask & (1u32 << index) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_remove_middle_bit() {
        // A, B, C with A and C active; removing B leaves A, C both active
        assert_eq!(remove_bit(0b101, 1), 0b011);
    }

    #[test]
    fn test_remove_first_and_last_bit() {
        assert_eq!(remove_bit(0b111, 0), 0b011);
        assert_eq!(remove_bit(0b111, 2), 0b011);
        assert_eq!(remove_bit(0b100, 2), 0);
    }

    #[test]
    fn test_toggle_past_width_is_ignored() {
        assert_eq!(toggle_bit(0b1, 32), 0b1);
        assert_eq!(toggle_bit(0, 31), 1 << 31);
    }

    #[test]
    fn test_remove_top_bit() {
        assert_eq!(remove_bit(u32::MAX, 31), u32::MAX >> 1);
        assert_eq!(remove_bit(1 << 31, 0), 1 << 30);
    }

    #[test]
    fn test_toggle_and_is_set() {
        let mask = toggle_bit(0, 3);
        assert!(is_set(mask, 3));
        assert!(!is_set(toggle_bit(mask, 3), 3));
        assert!(!is_set(u32::MAX, 32));
    }

    proptest! {
        #[test]
        fn prop_remove_bit_matches_formula(mask in any::<u32>(), index in 0usize..31) {
            let expected = (mask & ((1u32 << index) - 1))
                | ((mask & !((1u32 << (index + 1)) - 1)) >> 1);
            prop_assert_eq!(remove_bit(mask, index), expected);
        }

        #[test]
        fn prop_remove_bit_stays_in_range(count in 1usize..32, raw in any::<u32>(), index in 0usize..32) {
            let index = index % count;
            let mask = raw & ((1u32 << count) - 1);
            let result = remove_bit(mask, index);
            prop_assert!(result < (1u32 << (count - 1)));
        }

        #[test]
        fn prop_remove_bit_preserves_other_bits(mask in any::<u32>(), index in 0usize..32) {
            let result = remove_bit(mask, index);
            for bit in 0..index {
                prop_assert_eq!(is_set(result, bit), is_set(mask, bit));
            }
            for bit in (index + 1)..32 {
                prop_assert_eq!(is_set(result, bit - 1), is_set(mask, bit));
            }
        }
    }
}
