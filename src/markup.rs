//! HTML tags that reference assets through the manifest

use cdn_core_manifest::{resolve, Manifest};

/// `<link rel="stylesheet">` pointing at the resolved URL of `href`
pub fn stylesheet_tag(href: &str, manifest: &Manifest) -> String {
    format!(
        r#"<link rel="stylesheet" href="{}">"#,
        escape_attribute(resolve(href, manifest))
    )
}

/// `<script>` pointing at the resolved URL of `src`
pub fn script_tag(src: &str, manifest: &Manifest) -> String {
    format!(
        r#"<script type="text/javascript" src="{}"></script>"#,
        escape_attribute(resolve(src, manifest))
    )
}

/// Escape a value for use inside a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        [
            ("/css/site.css", "https://cdn.example.com/css/site-0a1b2c3d4e.css"),
            ("/js/app.js", "https://cdn.example.com/js/app-9f8e7d6c5b.js"),
            ("/js/pending.js", ""),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_stylesheet_uses_manifest_url() {
        assert_eq!(
            stylesheet_tag("/css/site.css", &manifest()),
            r#"<link rel="stylesheet" href="https://cdn.example.com/css/site-0a1b2c3d4e.css">"#
        );
    }

    #[test]
    fn test_script_uses_manifest_url() {
        assert_eq!(
            script_tag("/js/app.js", &manifest()),
            r#"<script type="text/javascript" src="https://cdn.example.com/js/app-9f8e7d6c5b.js"></script>"#
        );
    }

    #[test]
    fn test_unresolved_and_untracked_fall_back_to_path() {
        let m = manifest();
        assert_eq!(
            script_tag("/js/pending.js", &m),
            r#"<script type="text/javascript" src="/js/pending.js"></script>"#
        );
        assert_eq!(
            stylesheet_tag("/css/print.css", &m),
            r#"<link rel="stylesheet" href="/css/print.css">"#
        );
    }

    #[test]
    fn test_attribute_is_escaped() {
        assert_eq!(
            stylesheet_tag("/css/a\"b.css?x=1&y=<2>", &Manifest::new()),
            r#"<link rel="stylesheet" href="/css/a&quot;b.css?x=1&amp;y=&lt;2&gt;">"#
        );
    }
}
