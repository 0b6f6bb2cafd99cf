mod errors;
mod main;

pub use errors::CsrfError;

pub(crate) use main::CsrfCache;
