use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::node::Node;
use scraper::ElementRef;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Marker the docs put on "read more" links.
const SEE_MORE: char = '»';

/// Render an element to one line of plain prose.
pub fn normalize(el: ElementRef, base: &Url) -> String {
    let mut raw = String::new();
    render(el, base, &mut raw);
    clean(&raw)
}

/// Collapse whitespace and swap typographic glyphs for ASCII.
pub fn clean(raw: &str) -> String {
    WS_RE
        .replace_all(raw, " ")
        .replace('…', "...")
        .replace(['\u{2013}', '\u{2014}'], "-")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .trim()
        .to_string()
}

/// Resolve an href from the page against the API page URL.
pub fn resolve_url(base: &Url, link: &str) -> String {
    base.join(link)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| link.to_string())
}

fn render(el: ElementRef, base: &Url, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match e.name() {
                    // emoji are shipped as images
                    "img" => out.push_str(e.attr("alt").unwrap_or_default()),
                    "br" => out.push('\n'),
                    "a" => {
                        let mut label = String::new();
                        render(child_el, base, &mut label);
                        if label.contains(SEE_MORE) {
                            if let Some(href) = e.attr("href") {
                                let inline = format!(": {}", resolve_url(base, href));
                                label = label.replace(" »", &inline);
                            }
                        }
                        out.push_str(&label);
                    }
                    _ => render(child_el, base, out),
                }
            }
            _ => {}
        }
    }
}
