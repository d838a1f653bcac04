use scraper::{Html, Selector};
use url::Url;

/// Resolve every `<a href>` of `html` against `base`, keeping http(s)
/// targets with the fragment stripped.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let anchors = Selector::parse("a").expect("valid selector");
    let mut links = Vec::new();
    for a in doc.select(&anchors) {
        if let Some(href) = a.value().attr("href") {
            if let Ok(mut url) = Url::parse(href).or_else(|_| base.join(href)) {
                if url.scheme().starts_with("http") {
                    url.set_fragment(None);
                    links.push(url);
                }
            }
        }
    }
    links
}

/// Flatten an HTML body to its visible text.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body = Selector::parse("body").expect("valid selector");
    match doc.select(&body).next() {
        Some(node) => node.text().collect::<Vec<_>>().join(" "),
        None => doc.root_element().text().collect::<Vec<_>>().join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_links_and_strips_fragments() {
        let base = Url::parse("https://example.com/a/b.html").unwrap();
        let html = r##"<html><body>
            <a href="c.html">rel</a>
            <a href="/top.html#section">frag</a>
            <a href="https://other.org/x">abs</a>
            <a href="mailto:someone@example.com">mail</a>
        </body></html>"##;
        let links = extract_links(html, &base);
        let got: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(
            got,
            vec![
                "https://example.com/a/c.html",
                "https://example.com/top.html",
                "https://other.org/x",
            ]
        );
    }

    #[test]
    fn text_skips_markup() {
        let text = extract_text("<html><body><p>one <b>two</b></p>three</body></html>");
        let words: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(words, vec!["one", "two", "three"]);
    }
}
