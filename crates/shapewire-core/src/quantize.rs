//! Quantized fixed-point encoding
//!
//! A floating value `v` is stored as `raw = trunc(v * resolution)`, minus one
//! when `v` is negative. Decoding adds the one back for negative raws before
//! dividing by `resolution`. The correction keys off the sign of the input,
//! not of the product, so an exactly integral negative product still drops a
//! bucket on encode. Peers rely on reproducing this byte-for-byte.
//!
//! Products outside the raw integer range saturate (and `NaN` truncates to
//! zero); the negative correction saturates at the raw minimum too.

macro_rules! quantizer {
    (
        $(#[$meta:meta])*
        $encode:ident, $decode:ident, $float:ty => $raw:ty
    ) => {
        $(#[$meta])*
        pub fn $encode(value: $float, resolution: $float) -> $raw {
            let raw = (value * resolution) as $raw;
            if value < 0.0 {
                raw.saturating_sub(1)
            } else {
                raw
            }
        }

        /// Inverse of the matching encoder.
        pub fn $decode(raw: $raw, resolution: $float) -> $float {
            let mut value = raw as $float;
            if value < 0.0 {
                value += 1.0;
            }
            value / resolution
        }
    };
}

quantizer!(
    /// Single-precision value into 16 bits.
    encode_f32_i16, decode_f32_i16, f32 => i16
);
quantizer!(
    /// Single-precision value into a signed byte.
    encode_f32_i8, decode_f32_i8, f32 => i8
);
quantizer!(
    /// Double-precision value into 32 bits.
    encode_f64_i32, decode_f64_i32, f64 => i32
);
quantizer!(
    /// Double-precision value into 16 bits.
    encode_f64_i16, decode_f64_i16, f64 => i16
);
quantizer!(
    /// Double-precision value into a signed byte.
    encode_f64_i8, decode_f64_i8, f64 => i8
);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const VAL_F: f32 = 16.0 / 3.0;
    const VAL_D: f64 = 16.0 / 3.0;

    fn reference(value: f64, resolution: f64) -> f64 {
        let mut floored = (value * resolution).floor();
        if floored < 0.0 {
            floored += 1.0;
        }
        floored / resolution
    }

    #[test]
    fn test_positive_truncates() {
        let raw = encode_f32_i16(4.666_666, 10.0);
        assert_eq!(raw, 46);
        assert_eq!(raw.to_be_bytes(), [0x00, 0x2E]);
        assert_eq!(decode_f32_i16(raw, 10.0), 4.6);
    }

    #[test]
    fn test_negative_floors() {
        let raw = encode_f32_i16(-VAL_F, 10.0);
        assert_eq!(raw, -54);
        assert_eq!(decode_f32_i16(raw, 10.0), -5.3);

        assert_eq!(encode_f32_i8(-VAL_F, 1.0), -6);
        assert_eq!(decode_f32_i8(-6, 1.0), -5.0);
    }

    #[test]
    fn test_integral_negative_product_drops_a_bucket() {
        assert_eq!(encode_f64_i32(-0.5, 2.0), -2);
        assert_eq!(decode_f64_i32(-2, 2.0), -0.5);

        assert_eq!(encode_f64_i16(-5.0, 1.0), -6);
        assert_eq!(decode_f64_i16(-6, 1.0), -5.0);
    }

    #[test]
    fn test_small_negative_rounds_to_zero() {
        assert_eq!(encode_f32_i16(-0.05, 10.0), -1);
        assert_eq!(decode_f32_i16(-1, 10.0), 0.0);
    }

    #[test]
    fn test_matches_floor_reference() {
        for resolution in [1.0f64, 10.0, 16.0, 30.3] {
            for value in [VAL_D, -VAL_D] {
                let raw = encode_f64_i32(value, resolution);
                assert_eq!(decode_f64_i32(raw, resolution), reference(value, resolution));
            }
        }
    }

    #[test]
    fn test_saturates_out_of_range() {
        assert_eq!(encode_f32_i8(1000.0, 1.0), i8::MAX);
        assert_eq!(encode_f32_i16(f32::NAN, 10.0), 0);
        assert_eq!(encode_f32_i8(-1000.0, 1.0), i8::MIN);
        assert_eq!(encode_f32_i8(-128.0, 1.0), i8::MIN);
        assert_eq!(encode_f64_i16(-1.0e9, 1.0), i16::MIN);
        assert!(decode_f32_i8(i8::MIN, 1.0) < 0.0);
    }

    #[test]
    fn test_quantization_bound() {
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let resolution: f64 = rng.gen_range(0.5..100.0);
            let value: f64 = rng.gen_range(-1000.0..1000.0);
            let decoded = decode_f64_i32(encode_f64_i32(value, resolution), resolution);
            assert!(
                (decoded - value).abs() <= 1.0 / resolution + 1e-9,
                "value {value} resolution {resolution} decoded {decoded}"
            );
        }

        for _ in 0..10_000 {
            let resolution: f32 = rng.gen_range(0.5..10.0);
            let value: f32 = rng.gen_range(-1000.0..1000.0);
            let decoded = decode_f32_i16(encode_f32_i16(value, resolution), resolution);
            let slack = f32::EPSILON * value.abs().max(1.0) * 4.0;
            assert!(
                (decoded - value).abs() <= 1.0 / resolution + slack,
                "value {value} resolution {resolution} decoded {decoded}"
            );
        }
    }
}
