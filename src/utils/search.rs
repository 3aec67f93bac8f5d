//! Outbound Fragrantica search links

/// Search endpoint; `{query}` is replaced with the percent-encoded name
pub const FRAGRANTICA_SEARCH: &str = "https://www.fragrantica.com/search/?q={query}";

/// Build the Fragrantica search URL for a fragrance name
pub fn search_url(name: &str) -> String {
    search_url_with(FRAGRANTICA_SEARCH, name)
}

/// Build a search URL from a custom template
pub fn search_url_with(template: &str, name: &str) -> String {
    template.replace("{query}", &urlencoding::encode(name))
}
