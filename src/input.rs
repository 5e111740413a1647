//! Committed translation input: loading locale documents and flattening them.

pub mod flatten;
pub mod locale;

pub use flatten::flatten_locales;
pub use locale::{
    LoadError,
    load_locales,
    translation_file_path,
};
