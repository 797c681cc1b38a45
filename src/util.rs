/// Implements `From<$from>` for `$to` with a constructor or function.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

/// Implements `From<$from>` for `$to` by widening to `$as` first.
macro_rules! from_as {
    ($to:tt, $from:ty, $as:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $to::from(f as $as) }
        }
    };
}

/// Renders a string payload, quoted if it is UTF-8 and as hex otherwise.
pub(crate) fn fmt_str(bs: &[u8], f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match std::str::from_utf8(bs) {
        Ok(s) => write!(f, "{:?}", s),
        Err(_) => {
            f.write_str("b\"")?;
            for b in bs {
                write!(f, "{:02x}", b)?;
            }
            f.write_str("\"")
        }
    }
}
