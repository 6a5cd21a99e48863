pub(crate) mod entry;
pub(crate) mod metadata;
pub(crate) mod picture;
pub(crate) mod properties;
