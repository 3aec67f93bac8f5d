//! Fragrance name extraction

use crate::dom::PageDom;
use crate::utils::helpers::collapse_whitespace;
use lazy_static::lazy_static;
use regex::Regex;

/// Returned when no source yields a name
pub const UNKNOWN_FRAGRANCE: &str = "Unknown Fragrance";

lazy_static! {
    // Image file extension left over from a file-name alt text
    static ref FILE_EXTENSION: Regex = Regex::new(r"(?i)\.(jpe?g|png|gif|webp)$").unwrap();

    // Generic words that add nothing to a search query
    static ref GENERIC_WORDS: Regex = Regex::new(r"(?i)cologne|perfume|fragrance|bottle|image").unwrap();
}

/// Strip a trailing file extension and generic marketing words
pub fn clean_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_extension = FILE_EXTENSION.replace(trimmed, "");
    let without_generic = GENERIC_WORDS.replace_all(&without_extension, "");
    collapse_whitespace(&without_generic)
}

/// Name for a single image: the first non-empty of alt, title and figure
/// caption, cleaned. A source that cleans to nothing (even a blank alt) falls
/// back to the page title up to the first `|`.
pub fn extract_image_name<P: PageDom>(page: &P, image: &P::Node) -> String {
    let described = [
        page.attribute(image, "alt"),
        page.attribute(image, "title"),
        figure_caption(page, image),
    ]
    .into_iter()
    .flatten()
    .find(|text| !text.is_empty());

    if let Some(text) = described {
        let cleaned = clean_name(&text);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }

    page_title_name(page).unwrap_or_else(|| UNKNOWN_FRAGRANCE.to_string())
}

/// First real name among the container's images, in document order
pub fn extract_container_name<P: PageDom>(page: &P, container: &P::Node) -> String {
    page.images_within(container)
        .iter()
        .map(|image| extract_image_name(page, image))
        .find(|name| name != UNKNOWN_FRAGRANCE)
        .unwrap_or_else(|| UNKNOWN_FRAGRANCE.to_string())
}

fn figure_caption<P: PageDom>(page: &P, image: &P::Node) -> Option<String> {
    let figure = page.closest(image, "figure")?;
    let caption = page.first_descendant_by_tag(&figure, "figcaption")?;
    Some(page.text_content(&caption))
}

fn page_title_name<P: PageDom>(page: &P) -> Option<String> {
    let title = page.title()?;
    let name = title.split('|').next().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
