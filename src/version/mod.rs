//! Release tags, version specifiers, and tag selection.
//!
//! Everything here is pure: no I/O, no network, no prompts.

mod select;
mod specifier;
mod tag;

pub use select::{Selection, display_tags, format_tag_menu, parse_selection, retry_prompt};
pub use specifier::{Specifier, resolve};
pub use tag::Tag;
