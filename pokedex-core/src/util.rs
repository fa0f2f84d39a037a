use crate::EntityId;

/// Last non-empty path segment of a resource URL.
///
/// The catalog API addresses every resource as `.../<kind>/<id>/`, so
/// `https://pokeapi.co/api/v2/type/12/` yields `"12"`.
pub fn id_from_url(url: &str) -> Option<&str> {
    url.split('/').rev().find(|segment| !segment.is_empty())
}

/// Official-artwork image URL for an entity id.
///
/// The asset host is addressed purely by id: `<base>/<id>.png`.
pub fn artwork_url(base: &str, id: EntityId) -> String {
    format!("{}/{}.png", base.trim_end_matches('/'), id)
}

/// Replace the form-feed / newline / carriage-return characters the API
/// embeds in flavor text with plain spaces.
pub fn clean_flavor_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{000C}' | '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

/// `ceil(total / page_size)`; zero when `page_size` is zero.
pub fn total_pages(total: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
