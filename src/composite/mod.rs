pub(crate) mod blend;
pub(crate) mod formats;
pub(crate) mod plane;
pub(crate) mod sample;
