use gofold_common::Symbol;
use std::fmt;

/// Go's predeclared basic types that constants may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Bool,
    String,
    // Signed integers
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    // Unsigned integers
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    // Floats
    Float32,
    Float64,
}

impl BasicType {
    /// Resolve a predeclared type name. `byte` and `rune` are aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "bool" => BasicType::Bool,
            "string" => BasicType::String,
            "int" => BasicType::Int,
            "int8" => BasicType::Int8,
            "int16" => BasicType::Int16,
            "int32" | "rune" => BasicType::Int32,
            "int64" => BasicType::Int64,
            "uint" => BasicType::Uint,
            "uint8" | "byte" => BasicType::Uint8,
            "uint16" => BasicType::Uint16,
            "uint32" => BasicType::Uint32,
            "uint64" => BasicType::Uint64,
            "uintptr" => BasicType::Uintptr,
            "float32" => BasicType::Float32,
            "float64" => BasicType::Float64,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(self) -> &'static str {
        match self {
            BasicType::Bool => "bool",
            BasicType::String => "string",
            BasicType::Int => "int",
            BasicType::Int8 => "int8",
            BasicType::Int16 => "int16",
            BasicType::Int32 => "int32",
            BasicType::Int64 => "int64",
            BasicType::Uint => "uint",
            BasicType::Uint8 => "uint8",
            BasicType::Uint16 => "uint16",
            BasicType::Uint32 => "uint32",
            BasicType::Uint64 => "uint64",
            BasicType::Uintptr => "uintptr",
            BasicType::Float32 => "float32",
            BasicType::Float64 => "float64",
        }
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            BasicType::Int | BasicType::Int8 | BasicType::Int16 | BasicType::Int32 | BasicType::Int64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            BasicType::Uint
                | BasicType::Uint8
                | BasicType::Uint16
                | BasicType::Uint32
                | BasicType::Uint64
                | BasicType::Uintptr
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, BasicType::Float32 | BasicType::Float64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Width in bits for numeric types. `int_size` is the target width of
    /// `int`, `uint` and `uintptr`.
    pub fn bit_size(self, int_size: u32) -> Option<u32> {
        let bits = match self {
            BasicType::Int8 | BasicType::Uint8 => 8,
            BasicType::Int16 | BasicType::Uint16 => 16,
            BasicType::Int32 | BasicType::Uint32 | BasicType::Float32 => 32,
            BasicType::Int64 | BasicType::Uint64 | BasicType::Float64 => 64,
            BasicType::Int | BasicType::Uint | BasicType::Uintptr => int_size,
            BasicType::Bool | BasicType::String => return None,
        };
        Some(bits)
    }

    /// Ordering used when mixing typed numeric operands: every float
    /// outranks every integer, then wider outranks narrower, then signed
    /// outranks unsigned.
    pub fn numeric_rank(self, int_size: u32) -> Option<(u8, u32, bool)> {
        if !self.is_numeric() {
            return None;
        }
        let bits = self.bit_size(int_size)?;
        Some((self.is_float() as u8, bits, self.is_signed()))
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type as written in a constant declaration or conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Basic(BasicType),
    /// Any other type name; constants of named types are not supported.
    Named(Symbol),
}

impl Type {
    pub fn basic(self) -> Option<BasicType> {
        match self {
            Type::Basic(b) => Some(b),
            Type::Named(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(BasicType::from_name("byte"), Some(BasicType::Uint8));
        assert_eq!(BasicType::from_name("rune"), Some(BasicType::Int32));
        assert_eq!(BasicType::from_name("complex128"), None);
    }

    #[test]
    fn test_rank_prefers_floats() {
        let int = BasicType::Int64.numeric_rank(64).unwrap();
        let f32 = BasicType::Float32.numeric_rank(64).unwrap();
        assert!(f32 > int);
        assert!(BasicType::Int.numeric_rank(64) > BasicType::Int32.numeric_rank(64));
        assert_eq!(BasicType::String.numeric_rank(64), None);
    }

    #[test]
    fn test_int_size_applies_to_platform_types() {
        assert_eq!(BasicType::Uintptr.bit_size(32), Some(32));
        assert_eq!(BasicType::Int16.bit_size(32), Some(16));
        assert_eq!(BasicType::Bool.bit_size(64), None);
    }
}
