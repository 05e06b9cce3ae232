pub(crate) mod modal;
pub(crate) mod progress;
pub(crate) mod text;
