//! Format bytes and the boundaries that select between them.

/// Largest value stored directly in a positive fixint, 0x7f
pub const POS_FIXINT_MAX: u8 = 0x7f;
/// Smallest value stored directly in a negative fixint
pub const NEG_FIXINT_MIN: i64 = -32;
/// First negative fixint byte, 0xe0 (-32)
pub const NEG_FIXINT: u8 = 0b1110_0000;

/// Fixmap prefix, 0x80
pub const FIXMAP: u8 = 0b1000_0000;
/// Fixarray prefix, 0x90
pub const FIXARRAY: u8 = 0b1001_0000;
/// Fixstr prefix, 0xa0
pub const FIXSTR: u8 = 0b1010_0000;

/// Length bits of a fixmap or fixarray
pub const MASK_FIXCOL_LEN: u8 = 0b0000_1111;
/// Length bits of a fixstr
pub const MASK_FIXSTR_LEN: u8 = 0b0001_1111;
/// Prefix bits shared by every fixstr
pub const MASK_FIXSTR: u8 = 0b1110_0000;
/// Prefix bits shared by every fixmap and fixarray
pub const MASK_FIXCOL: u8 = 0b1111_0000;

pub const NIL: u8 = 0xc0;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;

pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;

pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;

pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;

pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;

pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Longest string held in a fixstr
pub const FIXSTR_MAX_LEN: usize = MASK_FIXSTR_LEN as usize;
/// Longest array or map held in a fixarray or fixmap
pub const FIXCOL_MAX_LEN: usize = MASK_FIXCOL_LEN as usize;
/// Longest length held in a 1-byte length prefix
pub const LEN8_MAX: usize = u8::MAX as usize;
/// Longest length held in a 2-byte length prefix
pub const LEN16_MAX: usize = u16::MAX as usize;
/// Longest length held in a 4-byte length prefix
pub const LEN32_MAX: u64 = u32::MAX as u64;

/// Upper bound on elements reserved up front from a declared length.
pub(crate) const PREALLOC_MAX: usize = 4096;
