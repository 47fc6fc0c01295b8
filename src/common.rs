pub mod error;
pub mod format;
pub mod i18n;
pub mod schema;
