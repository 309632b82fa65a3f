use std::fmt;
use std::str::FromStr;

use crate::error::{RenderError, RenderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Unsigned,
    Signed,
    Float,
}

impl NumericKind {
    fn from_letter(c: char) -> Option<Self> {
        match c {
            'u' => Some(NumericKind::Unsigned),
            'i' => Some(NumericKind::Signed),
            'f' => Some(NumericKind::Float),
            _ => None,
        }
    }

    fn letter(&self) -> char {
        match self {
            NumericKind::Unsigned => 'u',
            NumericKind::Signed => 'i',
            NumericKind::Float => 'f',
        }
    }

    fn renderer_prefix(&self) -> &'static str {
        match self {
            NumericKind::Unsigned => "uint",
            NumericKind::Signed => "int",
            NumericKind::Float => "float",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// A parsed SigMF `core:datatype` token such as `cf32_le` or `ci8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub is_complex: bool,
    pub kind: NumericKind,
    pub precision_bits: u32,
    pub byte_order: ByteOrder,
}

impl FormatDescriptor {
    /// Parse a datatype token. Real and big-endian tokens parse fine; they are
    /// only rejected by [`FormatDescriptor::renderer_type_name`].
    pub fn parse(token: &str) -> RenderResult<Self> {
        let mut chars = token.chars();
        let is_complex = match chars.next() {
            Some(c) => c == 'c',
            None => return Err(RenderError::format_token(token, "empty token")),
        };
        let rest = chars.as_str();

        let (base, endian) = match rest.split_once('_') {
            Some((base, endian)) => (base, Some(endian)),
            None => (rest, None),
        };

        let mut base_chars = base.chars();
        let kind = base_chars
            .next()
            .and_then(NumericKind::from_letter)
            .ok_or_else(|| RenderError::format_token(token, "base type must be one of u, i, f"))?;

        let digits = base_chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RenderError::format_token(token, "missing or malformed bit precision"));
        }
        let precision_bits: u32 = digits
            .parse()
            .map_err(|_| RenderError::format_token(token, "bit precision out of range"))?;
        if precision_bits == 0 || precision_bits % 8 != 0 {
            return Err(RenderError::format_token(
                token,
                "bit precision must be a non-zero multiple of 8",
            ));
        }

        // Single-byte types carry no byte order; SigMF writes them as `ci8`.
        let byte_order = match endian {
            Some("le") => ByteOrder::Little,
            Some("be") => ByteOrder::Big,
            None if precision_bits == 8 => ByteOrder::Little,
            None => return Err(RenderError::format_token(token, "missing endianness suffix")),
            Some(other) => {
                return Err(RenderError::format_token(
                    token,
                    format!("unknown endianness '{other}'"),
                ))
            }
        };

        Ok(Self {
            is_complex,
            kind,
            precision_bits,
            byte_order,
        })
    }

    /// Bytes per sample, counting both components of a complex sample.
    pub fn element_byte_size(&self) -> u64 {
        let components = if self.is_complex { 2 } else { 1 };
        components * u64::from(self.precision_bits / 8)
    }

    pub fn is_renderable(&self) -> bool {
        self.is_complex && self.byte_order == ByteOrder::Little
    }

    /// Type name handed to the rasterizer's `-f` option, e.g. `float32`.
    pub fn renderer_type_name(&self) -> RenderResult<String> {
        if !self.is_renderable() {
            return Err(RenderError::UnsupportedFormat(self.to_string()));
        }
        Ok(format!("{}{}", self.kind.renderer_prefix(), self.precision_bits))
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = if self.is_complex { 'c' } else { 'r' };
        write!(f, "{}{}{}", shape, self.kind.letter(), self.precision_bits)?;
        match self.byte_order {
            ByteOrder::Little => write!(f, "_le"),
            ByteOrder::Big => write!(f, "_be"),
        }
    }
}

impl FromStr for FormatDescriptor {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Complex sample component types the built-in waterfall can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
}

impl SampleType {
    /// Parse a renderer type name (`uint8`, `float32`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "uint8" => Some(SampleType::Uint8),
            "int8" => Some(SampleType::Int8),
            "uint16" => Some(SampleType::Uint16),
            "int16" => Some(SampleType::Int16),
            "uint32" => Some(SampleType::Uint32),
            "int32" => Some(SampleType::Int32),
            "float32" => Some(SampleType::Float32),
            "float64" => Some(SampleType::Float64),
            _ => None,
        }
    }

    pub fn component_bytes(&self) -> usize {
        match self {
            SampleType::Uint8 | SampleType::Int8 => 1,
            SampleType::Uint16 | SampleType::Int16 => 2,
            SampleType::Uint32 | SampleType::Int32 | SampleType::Float32 => 4,
            SampleType::Float64 => 8,
        }
    }

    /// I + Q
    pub fn bytes_per_sample(&self) -> usize {
        2 * self.component_bytes()
    }
}
