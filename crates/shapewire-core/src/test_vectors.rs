//! Wire-format test vectors
//!
//! Any peer implementation must reproduce these bytes and signatures exactly.

use crate::codec::{Codec, Mode};
use crate::error::Result;
use serde::Serialize;
use std::io::Cursor;

/// Test vector output format (JSON serializable)
#[derive(Serialize)]
pub struct TestVector {
    pub name: String,
    pub description: String,
    pub inputs: serde_json::Value,
    pub bytes_hex: String,
    pub signature_hex: String,
}

/// Generate all test vectors
pub fn generate_test_vectors() -> Result<Vec<TestVector>> {
    Ok(vec![
        point_vector()?,
        ifloat16_vector()?,
        idouble32_vector()?,
        string_vector()?,
    ])
}

fn capture<F>(walk: F) -> Result<(String, String)>
where
    F: FnOnce(&mut Codec<Cursor<Vec<u8>>>) -> Result<()>,
{
    let mut codec = Codec::new(Cursor::new(Vec::new()), Mode::Serialize);
    walk(&mut codec)?;
    let signature = codec.signature().to_string();
    Ok((hex::encode(codec.into_inner().into_inner()), signature))
}

fn point_vector() -> Result<TestVector> {
    let (mut x, mut y) = (3i32, -3i32);
    let (bytes_hex, signature_hex) = capture(|c| c.i32(&mut x)?.i32(&mut y).map(drop))?;

    Ok(TestVector {
        name: "point".into(),
        description: "Point { x: i32, y: i32 } walked as two I32 operations".into(),
        inputs: serde_json::json!({ "x": 3, "y": -3 }),
        bytes_hex,
        signature_hex,
    })
}

fn ifloat16_vector() -> Result<TestVector> {
    let mut value = 14.0f32 / 3.0;
    let (bytes_hex, signature_hex) = capture(|c| c.ifloat16(&mut value, 10.0).map(drop))?;

    Ok(TestVector {
        name: "ifloat16".into(),
        description: "IFloat16 at resolution 10.0: raw = trunc(v * r)".into(),
        inputs: serde_json::json!({ "value": 14.0f32 / 3.0, "resolution": 10.0 }),
        bytes_hex,
        signature_hex,
    })
}

fn idouble32_vector() -> Result<TestVector> {
    let mut value = 14.0f64 / 3.0;
    let (bytes_hex, signature_hex) = capture(|c| c.idouble32(&mut value, 10.0).map(drop))?;

    Ok(TestVector {
        name: "idouble32".into(),
        description: "IDouble32 at resolution 10.0, both resolution halves folded".into(),
        inputs: serde_json::json!({ "value": 14.0f64 / 3.0, "resolution": 10.0 }),
        bytes_hex,
        signature_hex,
    })
}

fn string_vector() -> Result<TestVector> {
    let mut text = String::from("Point");
    let (bytes_hex, signature_hex) = capture(|c| c.string(&mut text).map(drop))?;

    Ok(TestVector {
        name: "string".into(),
        description: "i16 big-endian length followed by ASCII bytes".into(),
        inputs: serde_json::json!({ "text": "Point" }),
        bytes_hex,
        signature_hex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(vectors: &'a [TestVector], name: &str) -> &'a TestVector {
        vectors.iter().find(|v| v.name == name).unwrap()
    }

    #[test]
    fn test_vectors_are_pinned() {
        let vectors = generate_test_vectors().unwrap();

        let point = find(&vectors, "point");
        assert_eq!(point.bytes_hex, "00000003fffffffd");
        assert_eq!(point.signature_hex, "c7d23956");

        let ifloat = find(&vectors, "ifloat16");
        assert_eq!(ifloat.bytes_hex, "002e");
        assert_eq!(ifloat.signature_hex, "08f31060");

        let idouble = find(&vectors, "idouble32");
        assert_eq!(idouble.bytes_hex, "0000002e");
        assert_eq!(idouble.signature_hex, "c48543c0");

        let string = find(&vectors, "string");
        assert_eq!(string.bytes_hex, "0005506f696e74");
        assert_eq!(string.signature_hex, "008d4669");
    }

    #[test]
    fn test_vectors_serialize_to_json() {
        let vectors = generate_test_vectors().unwrap();
        let json = serde_json::to_string_pretty(&vectors).unwrap();
        assert!(json.contains("\"bytes_hex\": \"00000003fffffffd\""));
    }
}
