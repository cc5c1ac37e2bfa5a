// Infrastructure for textstat: the shared result cache and file loading.

pub mod file_loader;
pub mod result_cache;

pub use file_loader::load_text;
pub use result_cache::ResultCache;
