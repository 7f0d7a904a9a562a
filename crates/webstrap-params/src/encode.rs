//! Fixed-width binary encoding of coerced parameters.

use std::fmt;
use std::str::FromStr;

use crate::coerce::Coerce;

/// The binary shape a parameter is encoded as.
///
/// Numbers are written little-endian at their natural width. The native
/// integer kinds (`Int`, `Uint`) are always written as 64-bit values so the
/// encoding does not depend on the host. `Bool` is a single `0`/`1` byte and
/// `Text` is the raw UTF-8 of the parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Raw UTF-8 text, not coerced.
    Text,
    /// Native signed integer, encoded as `i64`.
    Int,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// Native unsigned integer, encoded as `u64`.
    Uint,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// Lenient boolean, one byte.
    Bool,
}

impl PrimitiveKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Text,
        Self::Int,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::Uint,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Bool,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Int => "int",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::Uint => "uint",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::Bool => "bool",
        }
    }

    /// Encoded size in bytes, or `None` for variable-length text.
    #[must_use]
    pub const fn width(self) -> Option<usize> {
        match self {
            Self::Text => None,
            Self::I8 | Self::U8 | Self::Bool => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::Int | Self::I64 | Self::Uint | Self::U64 | Self::F64 => Some(8),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown primitive kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for PrimitiveKind {
    type Err = UnknownKind;

    /// Accepts canonical names (`int32`, `float64`, ...), Rust spellings
    /// (`i32`, `f64`, ...) and a few aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Self::Text,
            "int" | "isize" => Self::Int,
            "int8" | "i8" => Self::I8,
            "int16" | "i16" => Self::I16,
            "int32" | "i32" => Self::I32,
            "int64" | "i64" => Self::I64,
            "uint" | "usize" => Self::Uint,
            "uint8" | "u8" | "byte" => Self::U8,
            "uint16" | "u16" => Self::U16,
            "uint32" | "u32" => Self::U32,
            "uint64" | "u64" => Self::U64,
            "float32" | "f32" => Self::F32,
            "float64" | "f64" => Self::F64,
            "bool" | "boolean" => Self::Bool,
            _ => return Err(UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

fn le<T: Coerce, const N: usize>(raw: &str, to_le: fn(T) -> [u8; N]) -> Option<Vec<u8>> {
    T::coerce(raw).map(|v| to_le(v).to_vec())
}

/// Coerces `raw` to `kind` and encodes it, or returns `None` if the text is
/// not a valid value of that kind.
#[must_use]
pub fn encode(raw: &str, kind: PrimitiveKind) -> Option<Vec<u8>> {
    match kind {
        PrimitiveKind::Text => Some(raw.as_bytes().to_vec()),
        PrimitiveKind::Int => isize::coerce(raw)
            .and_then(|v| i64::try_from(v).ok())
            .map(|v| v.to_le_bytes().to_vec()),
        PrimitiveKind::I8 => le(raw, i8::to_le_bytes),
        PrimitiveKind::I16 => le(raw, i16::to_le_bytes),
        PrimitiveKind::I32 => le(raw, i32::to_le_bytes),
        PrimitiveKind::I64 => le(raw, i64::to_le_bytes),
        PrimitiveKind::Uint => usize::coerce(raw)
            .and_then(|v| u64::try_from(v).ok())
            .map(|v| v.to_le_bytes().to_vec()),
        PrimitiveKind::U8 => le(raw, u8::to_le_bytes),
        PrimitiveKind::U16 => le(raw, u16::to_le_bytes),
        PrimitiveKind::U32 => le(raw, u32::to_le_bytes),
        PrimitiveKind::U64 => le(raw, u64::to_le_bytes),
        PrimitiveKind::F32 => le(raw, f32::to_le_bytes),
        PrimitiveKind::F64 => le(raw, f64::to_le_bytes),
        PrimitiveKind::Bool => bool::coerce(raw).map(|b| vec![u8::from(b)]),
    }
}

/// Encodes `raw` as `kind`, returning `default` unchanged on failure.
#[must_use]
pub fn to_bytes(raw: &str, kind: PrimitiveKind, default: Vec<u8>) -> Vec<u8> {
    encode(raw, kind).unwrap_or(default)
}

/// Like [`to_bytes`], with the kind given by name. An unknown name yields
/// `default`.
#[must_use]
pub fn to_bytes_named(raw: &str, kind: &str, default: Vec<u8>) -> Vec<u8> {
    match kind.parse() {
        Ok(kind) => to_bytes(raw, kind, default),
        Err(_) => default,
    }
}
