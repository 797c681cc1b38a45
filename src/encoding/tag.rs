use super::constants::*;
use crate::errors::Error;
use std::fmt;

/// Coarse value families, as seen on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Uint,
    Int,
    Float,
    Str,
    Array,
    Map,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Nil => "nil",
            Kind::Bool => "bool",
            Kind::Uint => "unsigned integer",
            Kind::Int => "signed integer",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::Array => "array",
            Kind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A decoded format byte.
///
/// Fixed-size variants carry the value or length embedded in the byte; the
/// rest announce a payload that follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Nil,
    Bool(bool),
    PosFixint(u8),
    NegFixint(i8),
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    FixStr(u8),
    Str8,
    Str16,
    Str32,
    FixArray(u8),
    Array16,
    Array32,
    FixMap(u8),
    Map16,
    Map32,
}

impl Tag {
    /// Classifies a format byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormat`] for bytes the format leaves unassigned.
    pub fn from_byte(byte: u8) -> Result<Tag, Error> {
        let tag = match byte {
            0x00..=POS_FIXINT_MAX => Tag::PosFixint(byte),
            NEG_FIXINT..=0xff => Tag::NegFixint(byte as i8),
            b if b & MASK_FIXCOL == FIXMAP => Tag::FixMap(b & MASK_FIXCOL_LEN),
            b if b & MASK_FIXCOL == FIXARRAY => Tag::FixArray(b & MASK_FIXCOL_LEN),
            b if b & MASK_FIXSTR == FIXSTR => Tag::FixStr(b & MASK_FIXSTR_LEN),
            NIL => Tag::Nil,
            FALSE => Tag::Bool(false),
            TRUE => Tag::Bool(true),
            FLOAT32 => Tag::F32,
            FLOAT64 => Tag::F64,
            UINT8 => Tag::U8,
            UINT16 => Tag::U16,
            UINT32 => Tag::U32,
            UINT64 => Tag::U64,
            INT8 => Tag::I8,
            INT16 => Tag::I16,
            INT32 => Tag::I32,
            INT64 => Tag::I64,
            STR8 => Tag::Str8,
            STR16 => Tag::Str16,
            STR32 => Tag::Str32,
            ARRAY16 => Tag::Array16,
            ARRAY32 => Tag::Array32,
            MAP16 => Tag::Map16,
            MAP32 => Tag::Map32,
            unknown => return Err(Error::UnknownFormat(unknown)),
        };
        Ok(tag)
    }

    /// The value family this tag introduces.
    pub fn kind(self) -> Kind {
        match self {
            Tag::Nil => Kind::Nil,
            Tag::Bool(_) => Kind::Bool,
            Tag::PosFixint(_) | Tag::U8 | Tag::U16 | Tag::U32 | Tag::U64 => Kind::Uint,
            Tag::NegFixint(_) | Tag::I8 | Tag::I16 | Tag::I32 | Tag::I64 => Kind::Int,
            Tag::F32 | Tag::F64 => Kind::Float,
            Tag::FixStr(_) | Tag::Str8 | Tag::Str16 | Tag::Str32 => Kind::Str,
            Tag::FixArray(_) | Tag::Array16 | Tag::Array32 => Kind::Array,
            Tag::FixMap(_) | Tag::Map16 | Tag::Map32 => Kind::Map,
        }
    }
}
