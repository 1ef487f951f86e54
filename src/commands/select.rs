use anyhow::Result;
use log::debug;

use crate::cache::CacheStore;
use crate::config::AppConfig;
use crate::error::HvmError;
use crate::runtime::Runtime;
use crate::version::{Selection, Tag, display_tags, format_tag_menu, parse_selection, retry_prompt};

/// Shows the tag menu and asks until the user picks a tag or cancels.
/// Returns `None` when the user cancels with an empty line.
pub(crate) fn select_tag<R: Runtime>(
    runtime: &R,
    tags: &[Tag],
    config: &AppConfig,
    cache: &CacheStore<'_, R>,
    message: &str,
) -> Result<Option<Tag>> {
    let shown = display_tags(tags, config.sort_ascending, config.num_tags_to_display);
    if shown.is_empty() {
        return Err(HvmError::NoTags.into());
    }
    debug!("Offering {} of {} tags", shown.len(), tags.len());

    println!();
    print!("{}", format_tag_menu(&shown, |tag| cache.is_cached(tag)));
    println!();

    let mut prompt = format!("{}: ", message);
    loop {
        let input = runtime.prompt(&prompt)?;
        match parse_selection(&input, shown.len()) {
            Selection::Selected(index) => return Ok(Some(shown[index].clone())),
            Selection::Cancelled => {
                println!("Canceled.");
                return Ok(None);
            }
            Selection::Invalid => prompt = retry_prompt(shown.len()),
        }
    }
}
