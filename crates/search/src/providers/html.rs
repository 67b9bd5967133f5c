//! DuckDuckGo HTML results page parsing.
//!
//! The markup is not a stable contract. Everything that knows about class
//! names and redirect links lives in this file so a markup change stays
//! local to it.

use crate::types::SearchResult;

/// Ways a result title anchor is recognised, in order of preference.
///
/// The first selector that matches any anchor on the page is used for the
/// whole page.
const ANCHOR_SELECTORS: [AnchorSelector; 3] = [
    AnchorSelector::Class("result__a"),
    AnchorSelector::Class("result-link"),
    AnchorSelector::HrefPrefix("/l/?kh=1&uddg="),
];

/// Classes that mark the snippet following a result anchor.
const SNIPPET_CLASSES: [&str; 2] = ["result__snippet", "snippet"];

/// Element used as the snippet when no snippet class is present.
const SNIPPET_FALLBACK_TAG: &str = "p";

/// Closing tags that can end a title or snippet element.
const CLOSING_TAGS: [&str; 5] = ["</a>", "</td>", "</div>", "</p>", "</span>"];

/// Base used to resolve relative redirect links.
const DDG_BASE: &str = "https://duckduckgo.com";

#[derive(Debug, Clone, Copy)]
enum AnchorSelector {
    /// `<a>` carrying this class
    Class(&'static str),
    /// `<a>` whose decoded href starts with this prefix
    HrefPrefix(&'static str),
}

impl AnchorSelector {
    fn matches(&self, tag: &Tag<'_>) -> bool {
        if !tag.name.eq_ignore_ascii_case("a") {
            return false;
        }
        match self {
            Self::Class(class) => tag.has_class(class),
            Self::HrefPrefix(prefix) => tag
                .attribute("href")
                .is_some_and(|href| href.starts_with(prefix)),
        }
    }
}

/// An opening tag: its byte span in the page and its raw text.
#[derive(Debug)]
struct Tag<'a> {
    start: usize,
    end: usize,
    name: &'a str,
    raw: &'a str,
}

impl Tag<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        attribute(self.raw, name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }
}

/// Extract up to `limit` results from a results page.
///
/// The snippet is the first snippet element between a result anchor and
/// the next one, falling back to the anchor text. Results with neither are
/// skipped.
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchResult> {
    let tags = open_tags(html);

    let Some(anchors) = ANCHOR_SELECTORS
        .iter()
        .map(|selector| tags.iter().filter(|t| selector.matches(t)).collect::<Vec<_>>())
        .find(|anchors| !anchors.is_empty())
    else {
        return Vec::new();
    };

    let mut results = Vec::new();

    for (i, anchor) in anchors.iter().enumerate() {
        if results.len() >= limit {
            break;
        }

        let segment_end = anchors.get(i + 1).map_or(html.len(), |next| next.start);
        let segment = |tag: &&Tag<'_>| tag.start >= anchor.end && tag.start < segment_end;

        let title = element_text(&html[anchor.end..segment_end]);
        let href = anchor.attribute("href").unwrap_or_default();

        let snippet_tag = tags
            .iter()
            .filter(segment)
            .find(|t| SNIPPET_CLASSES.iter().any(|c| t.has_class(c)))
            .or_else(|| {
                tags.iter()
                    .filter(segment)
                    .find(|t| t.name.eq_ignore_ascii_case(SNIPPET_FALLBACK_TAG))
            });

        let snippet = snippet_tag
            .map(|t| element_text(&html[t.end..segment_end]))
            .filter(|s| !s.is_empty())
            .unwrap_or(title);

        if snippet.is_empty() {
            continue;
        }

        results.push(SearchResult::new(snippet, resolve_url(&href)));
    }

    tracing::debug!("Parsed {} results from HTML page", results.len());
    results
}

/// Every opening tag in the page, in document order.
fn open_tags(html: &str) -> Vec<Tag<'_>> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        let Some(len) = html[start..].find('>') else {
            break;
        };
        let end = start + len + 1;
        let raw = &html[start..end];

        let inner = &raw[1..raw.len() - 1];
        let name_len = inner
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let name = &inner[..name_len];

        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric()) {
            tags.push(Tag {
                start,
                end,
                name,
                raw,
            });
        }

        pos = end;
    }

    tags
}

/// Text from the start of `body` up to the first closing tag.
fn element_text(body: &str) -> String {
    let end = CLOSING_TAGS
        .iter()
        .filter_map(|tag| body.find(tag))
        .min()
        .unwrap_or(body.len());

    clean_text(&body[..end])
}

/// Value of the `name` attribute in an opening tag.
///
/// Accepts double-quoted, single-quoted and unquoted values.
fn attribute(tag: &str, name: &str) -> Option<String> {
    let mut search = 0;

    while let Some(offset) = tag[search..].find(name) {
        let idx = search + offset;
        search = idx + name.len();

        let starts_attribute = tag[..idx].ends_with(|c: char| c.is_whitespace());
        let Some(value) = tag[search..].strip_prefix('=') else {
            continue;
        };
        if !starts_attribute {
            continue;
        }

        let raw = match value.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let value = &value[1..];
                &value[..value.find(quote)?]
            }
            _ => {
                let end = value
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(value.len());
                &value[..end]
            }
        };

        return Some(decode_entities(raw));
    }

    None
}

/// Turn a result href into the destination URL.
///
/// DuckDuckGo wraps targets in `/l/?uddg=<encoded>`; the encoded target is
/// returned when present, otherwise the href made absolute.
pub fn resolve_url(href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }

    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("{}{}", DDG_BASE, href)
    } else {
        href.to_string()
    };

    match reqwest::Url::parse(&absolute) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        Err(_) => absolute,
    }
}

/// Strip tags, decode entities and collapse whitespace.
pub fn clean_text(fragment: &str) -> String {
    let stripped = strip_tags(fragment);
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode the named entities DuckDuckGo emits plus numeric references.
fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];

        let decoded = after.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &after[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<div class="result results_links">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FParis&amp;rut=abc">Paris - <b>Wikipedia</b></a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">Paris is the <b>capital</b> of France &amp; its largest city.</a>
</div>
<div class="result results_links">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="https://www.britannica.com/place/Paris">Paris | History</a>
  </h2>
</div>
"#;

    #[test]
    fn test_parse_results_extracts_snippet_and_url() {
        let results = parse_results(PAGE, 6);
        assert_eq!(results.len(), 2);

        assert_eq!(
            results[0].snippet,
            "Paris is the capital of France & its largest city."
        );
        assert_eq!(results[0].url, "https://en.wikipedia.org/wiki/Paris");
    }

    #[test]
    fn test_parse_results_falls_back_to_title() {
        let results = parse_results(PAGE, 6);
        assert_eq!(results[1].snippet, "Paris | History");
        assert_eq!(results[1].url, "https://www.britannica.com/place/Paris");
    }

    #[test]
    fn test_parse_results_respects_limit() {
        let results = parse_results(PAGE, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_parse_results_without_markers() {
        assert!(parse_results("<html><body>No results.</body></html>", 6).is_empty());
    }

    #[test]
    fn test_href_before_class_keeps_urls_aligned() {
        let page = r#"
<a href="https://example.com/one" class="result__a">One</a><td class="result__snippet">First snippet.</td>
<a href="https://example.com/two" class="result__a">Two</a><td class="result__snippet">Second snippet.</td>
"#;

        assert_eq!(
            parse_results(page, 6),
            vec![
                SearchResult::new("First snippet.", "https://example.com/one"),
                SearchResult::new("Second snippet.", "https://example.com/two"),
            ]
        );
    }

    #[test]
    fn test_lite_page_single_quoted_classes() {
        let page = r#"
<tr><td><a rel="nofollow" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Frust-lang.org%2F" class='result-link'>Rust</a></td></tr>
<tr><td class='snippet'>A language empowering everyone.</td></tr>
<tr><td><a rel="nofollow" href="https://doc.rust-lang.org/book/" class='result-link'>The Book</a></td></tr>
"#;

        assert_eq!(
            parse_results(page, 6),
            vec![
                SearchResult::new("A language empowering everyone.", "https://rust-lang.org/"),
                SearchResult::new("The Book", "https://doc.rust-lang.org/book/"),
            ]
        );
    }

    #[test]
    fn test_redirect_links_without_classes() {
        let page = r#"
<div><a href="/l/?kh=1&amp;uddg=https%3A%2F%2Fexample.com%2Fa">Example A</a><p>About A.</p></div>
<div><a href="/about">About DuckDuckGo</a></div>
"#;

        assert_eq!(
            parse_results(page, 6),
            vec![SearchResult::new("About A.", "https://example.com/a")]
        );
    }

    #[test]
    fn test_attribute_quoting() {
        assert_eq!(
            attribute(r#"<a class="x y" href='/l'>"#, "href").as_deref(),
            Some("/l")
        );
        assert_eq!(attribute("<td class=snippet>", "class").as_deref(), Some("snippet"));
        // data-href is not href
        assert_eq!(attribute(r#"<a data-href="a" href="b">"#, "href").as_deref(), Some("b"));
        assert_eq!(attribute("<a>", "href"), None);
    }

    #[test]
    fn test_resolve_url_variants() {
        assert_eq!(resolve_url(""), "");
        assert_eq!(
            resolve_url("/l/?kh=1&uddg=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"),
            "https://example.com/a?b=c"
        );
        assert_eq!(resolve_url("https://example.com/x"), "https://example.com/x");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#39;quoted&#x27;"), "'quoted'");
        assert_eq!(decode_entities("AT&T rocks"), "AT&T rocks");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }
}
