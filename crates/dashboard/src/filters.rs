//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Turns a bare website ("hildegard.org") into a link target.
///
/// Usage in templates: `{{ website|website_href }}`
#[askama::filter_fn]
pub fn website_href(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(to_href(&value.to_string()))
}

fn to_href(website: &str) -> String {
    let website = website.trim();
    if website.starts_with("http://") || website.starts_with("https://") {
        website.to_string()
    } else {
        format!("https://{website}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_href() {
        assert_eq!(to_href("hildegard.org"), "https://hildegard.org");
        assert_eq!(to_href(" anastasia.net "), "https://anastasia.net");
        assert_eq!(to_href("http://kale.biz"), "http://kale.biz");
        assert_eq!(to_href("https://ola.org"), "https://ola.org");
    }
}
