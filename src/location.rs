//! Title fallback from the viewer's current location

use url::Url;

const BOOK_PARAM: &str = "book";

/// File stem of the `book` query parameter of `href`, if any.
///
/// `https://host/read?book=shelf%2FMy%20Novel.pdf` yields `My Novel`.
pub fn file_name_from_location(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    let book = url
        .query_pairs()
        .find(|(key, _)| key == BOOK_PARAM)
        .map(|(_, value)| value.into_owned())?;

    let file_name = book.rsplit('/').next()?;
    let stem = strip_extension(file_name);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => file_name,
    }
}
