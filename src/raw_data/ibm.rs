// src/raw_data/ibm.rs

/// Convert an IBM System/360 single precision word to `f64`.
///
/// Layout: sign bit, 7-bit base-16 exponent biased by 64, 24-bit fraction
/// with the radix point in front of it. Every IBM single is exactly
/// representable as an `f64`, so the conversion is lossless.
#[inline]
pub fn ibm_to_f64(word: u32) -> f64 {
    let fraction = word & 0x00FF_FFFF;
    if fraction == 0 {
        return 0.0;
    }

    let exponent = ((word >> 24) & 0x7F) as i32 - 64;
    let magnitude = fraction as f64 / 16_777_216.0 * 16f64.powi(exponent);

    if word & 0x8000_0000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_words() {
        assert_eq!(ibm_to_f64(0x4110_0000), 1.0);
        assert_eq!(ibm_to_f64(0xC110_0000), -1.0);
        assert_eq!(ibm_to_f64(0x41A0_0000), 10.0);
        assert_eq!(ibm_to_f64(0x4228_0000), 40.0);
        assert_eq!(ibm_to_f64(0x4064_0000), 0.390625);
        assert_eq!(ibm_to_f64(0xC276_A000), -118.625);
    }

    #[test]
    fn test_zero_fraction_is_zero() {
        assert_eq!(ibm_to_f64(0), 0.0);
        assert_eq!(ibm_to_f64(0x8000_0000), 0.0);
        assert_eq!(ibm_to_f64(0x4500_0000), 0.0);
    }

    proptest! {
        #[test]
        fn prop_matches_reference_formula(word in any::<u32>()) {
            let sign = if word >> 31 == 1 { -1.0 } else { 1.0 };
            let exponent = ((word >> 24) & 0x7F) as i32;
            let fraction = (word & 0x00FF_FFFF) as f64 / (1u64 << 24) as f64;
            let expected = sign * fraction * 16f64.powi(exponent - 64);

            let decoded = ibm_to_f64(word);
            if fraction == 0.0 {
                prop_assert_eq!(decoded, 0.0);
            } else {
                prop_assert!(((decoded - expected) / expected).abs() < 1e-12);
            }
        }
    }
}
