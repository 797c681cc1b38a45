pub mod enum_impl;
pub mod struct_impl;
