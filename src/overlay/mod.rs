pub(crate) mod accumulate;
pub(crate) mod buffer;
pub(crate) mod glyph;
