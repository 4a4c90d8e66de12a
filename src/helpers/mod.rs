//! Helper functions for generated pages

mod html;
mod list;
mod url;

pub use html::*;
pub use list::*;
pub use url::*;
