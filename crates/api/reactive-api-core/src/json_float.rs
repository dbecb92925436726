//! Serde helpers for floats that may be non-finite.
//!
//! JSON numbers cannot carry infinities or NaN, and `serde_json` writes them as `null`,
//! which then fails to load. Fields tagged `#[serde(with = "json_float")]` write finite
//! values as numbers and the rest as `"inf"`, `"-inf"` or `"nan"`. Both forms are
//! accepted on load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f32),
    Text(String),
}

impl Repr {
    fn decode<E: serde::de::Error>(self) -> Result<f32, E> {
        match self {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => match s.as_str() {
                "inf" | "+inf" | "Infinity" => Ok(f32::INFINITY),
                "-inf" | "-Infinity" => Ok(f32::NEG_INFINITY),
                "nan" | "NaN" => Ok(f32::NAN),
                other => Err(E::custom(format!("invalid float '{other}'"))),
            },
        }
    }
}

/// Borrowed float with the text encoding applied.
struct Encoded(f32);

impl Serialize for Encoded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() {
            serializer.serialize_f32(v)
        } else if v.is_nan() {
            serializer.serialize_str("nan")
        } else if v > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    Encoded(*value).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Repr::deserialize(deserializer)?.decode()
}

/// Same encoding for fixed-size float arrays (`Vec3`, RGB triples).
pub mod array {
    use super::{Encoded, Repr};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        values: &[f32; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|&v| Encoded(v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[f32; N], D::Error> {
        let values = Vec::<Repr>::deserialize(deserializer)?
            .into_iter()
            .map(Repr::decode)
            .collect::<Result<Vec<f32>, D::Error>>()?;
        let len = values.len();
        values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"a fixed-size float array"))
    }
}
