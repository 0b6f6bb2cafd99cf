mod cache;


pub(crate) use cache::CsrfCache;
