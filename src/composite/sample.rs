use std::fmt;

use crate::composite::plane::{AnyFrame, DestFrame};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// Storage type of one destination (and overlay channel) sample.
///
/// Implemented for `u8` (8-bit formats) and `u16` (9–16-bit formats). Arithmetic is done in
/// `u32`/`u64` so 16-bit products never overflow.
pub trait Sample: Copy + Default + Eq + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    /// Bytes per sample; byte pitches are divided by this.
    const BYTES: usize;
    /// Largest storable code.
    const MAX: u32;

    /// Widen to `u32`.
    fn to_u32(self) -> u32;

    /// Narrow from `u32`, saturating at [`Sample::MAX`].
    fn from_u32(v: u32) -> Self;

    #[doc(hidden)]
    fn wrap<'f, 'a>(frame: &'f mut DestFrame<'a, Self>) -> AnyFrame<'f, 'a>;
}

impl Sample for u8 {
    const BYTES: usize = 1;
    const MAX: u32 = u8::MAX as u32;

    #[inline]
    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v.min(<Self as Sample>::MAX) as u8
    }

    fn wrap<'f, 'a>(frame: &'f mut DestFrame<'a, Self>) -> AnyFrame<'f, 'a> {
        AnyFrame::Narrow(frame)
    }
}

impl Sample for u16 {
    const BYTES: usize = 2;
    const MAX: u32 = u16::MAX as u32;

    #[inline]
    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v.min(<Self as Sample>::MAX) as u16
    }

    fn wrap<'f, 'a>(frame: &'f mut DestFrame<'a, Self>) -> AnyFrame<'f, 'a> {
        AnyFrame::Wide(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/sample.rs"]
mod tests;
