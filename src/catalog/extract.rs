//! Listing and card page markup extraction

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;

pub const LOADER: &str = ".loader";
pub const RESULTS: &str = "#api-area-results";
pub const CARD_NAME: &str = ".column2 .card-name";
pub const CARD_TEXT: &str = ".column2 .card-text";
pub const CARD_INFO: &str = ".card-data-info";
const CARD_INFO_HEADER: &str = ".card-data-header";
const CARD_INFO_VALUE: &str = ".card-data-subheader";

/// Name and description block of a card page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardHeading {
    pub name: String,
    pub description: String,
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector(format!("{}: {:?}", css, e)))
}

fn first<'a>(doc: &'a Html, css: &str) -> Result<ElementRef<'a>, ScraperError> {
    doc.select(&selector(css)?)
        .next()
        .ok_or_else(|| ScraperError::ElementNotFound(css.to_string()))
}

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "tr", "ul", "ol", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];

fn push_text(elem: ElementRef<'_>, raw: &mut String) {
    let block = BLOCK_ELEMENTS.contains(&elem.value().name());
    if block {
        raw.push('\n');
    }

    for child in elem.children() {
        if let Some(child_elem) = ElementRef::wrap(child) {
            if child_elem.value().name() == "br" {
                raw.push('\n');
            } else {
                push_text(child_elem, raw);
            }
        } else if let Node::Text(text) = child.value() {
            raw.push_str(text);
        }
    }

    if block {
        raw.push('\n');
    }
}

/// Visible-ish text: `<br>` and block elements break lines, whitespace runs collapse.
pub fn element_text(elem: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(elem, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Anchors found in the results container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardLinks {
    pub urls: Vec<String>,
    /// Anchors that had no href to follow
    pub missing_href: usize,
}

/// Absolute card URLs for every anchor inside the results container.
///
/// Root-relative hrefs get `base_url` prepended, anything else is kept
/// verbatim. Anchors without an href are counted, not followed.
pub fn parse_card_links(html: &str, base_url: &str) -> Result<CardLinks, ScraperError> {
    let doc = Html::parse_document(html);
    let results = first(&doc, RESULTS)?;
    let anchor = selector("a")?;

    let base = base_url.trim_end_matches('/');
    let mut links = CardLinks::default();
    for a in results.select(&anchor) {
        match a.value().attr("href") {
            Some(href) if href.starts_with('/') => links.urls.push(format!("{}{}", base, href)),
            Some(href) => links.urls.push(href.to_string()),
            None => links.missing_href += 1,
        }
    }
    Ok(links)
}

pub fn parse_card_heading(html: &str) -> Result<CardHeading, ScraperError> {
    let doc = Html::parse_document(html);
    Ok(CardHeading {
        name: element_text(first(&doc, CARD_NAME)?),
        description: element_text(first(&doc, CARD_TEXT)?),
    })
}

/// Header/value pairs of the card info list, paired by position.
pub fn parse_card_attributes(html: &str) -> Result<Vec<(String, String)>, ScraperError> {
    let doc = Html::parse_document(html);
    let info = first(&doc, CARD_INFO)?;
    let headers = selector(CARD_INFO_HEADER)?;
    let values = selector(CARD_INFO_VALUE)?;

    Ok(info
        .select(&headers)
        .zip(info.select(&values))
        .map(|(h, v)| (element_text(h), element_text(v)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="loader" style="display:none"></div>
          <a href="/about">About</a>
          <div id="api-area-results">
            <a href="/card/dark-magician-4003"><img alt="Dark Magician"></a>
            <a href="https://ygoprodeck.com/card/kuriboh-1234">Kuriboh</a>
            <a name="anchor-without-href">skip</a>
          </div>
        </body></html>
    "#;

    const CARD: &str = r#"
        <html><body>
          <div class="column1"><span class="card-name">Sidebar</span></div>
          <div class="column2">
            <h1 class="card-name"> Dark   Magician </h1>
            <p class="card-text">The ultimate wizard<br>in terms of attack and defense.</p>
          </div>
          <ul class="card-data-info">
            <li><span class="card-data-header">Attribute</span><span class="card-data-subheader">DARK</span></li>
            <li><span class="card-data-header">Level</span><span class="card-data-subheader"> 7 </span></li>
            <li><span class="card-data-header">Orphan header</span></li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn test_parse_card_links() {
        let links = parse_card_links(LISTING, "https://ygoprodeck.com").unwrap();
        assert_eq!(
            links.urls,
            vec![
                "https://ygoprodeck.com/card/dark-magician-4003",
                "https://ygoprodeck.com/card/kuriboh-1234",
            ]
        );
        assert_eq!(links.missing_href, 1);
    }

    #[test]
    fn test_parse_card_links_trailing_slash_base() {
        let links = parse_card_links(LISTING, "https://ygoprodeck.com/").unwrap();
        assert_eq!(links.urls[0], "https://ygoprodeck.com/card/dark-magician-4003");
    }

    #[test]
    fn test_parse_card_links_missing_container() {
        let err = parse_card_links("<html><body></body></html>", "https://x").unwrap_err();
        assert!(matches!(err, ScraperError::ElementNotFound(_)));
    }

    #[test]
    fn test_empty_results_container() {
        let html = r#"<div id="api-area-results"></div>"#;
        assert_eq!(parse_card_links(html, "https://x").unwrap(), CardLinks::default());
    }

    #[test]
    fn test_parse_card_heading() {
        let heading = parse_card_heading(CARD).unwrap();
        assert_eq!(heading.name, "Dark Magician");
        assert_eq!(
            heading.description,
            "The ultimate wizard\nin terms of attack and defense."
        );
    }

    #[test]
    fn test_parse_card_attributes_zips_by_position() {
        let attrs = parse_card_attributes(CARD).unwrap();
        assert_eq!(
            attrs,
            vec![
                ("Attribute".to_string(), "DARK".to_string()),
                ("Level".to_string(), "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_paragraphs_in_card_text_stay_separate() {
        let html = r#"
            <div class="column2">
              <h1 class="card-name">Odd-Eyes Pendulum Dragon</h1>
              <div class="card-text"><p>[ Pendulum Effect ] Once per turn.</p><p>[ Monster Effect ] Double damage.</p></div>
            </div>
        "#;
        let heading = parse_card_heading(html).unwrap();
        assert_eq!(
            heading.description,
            "[ Pendulum Effect ] Once per turn.\n[ Monster Effect ] Double damage."
        );
    }

    #[test]
    fn test_inline_elements_do_not_break_lines() {
        let html = r#"<div class="column2"><span class="card-name">Dark <b>Magician</b></span>
            <span class="card-text">Negate <i>that</i> effect.</span></div>"#;
        let heading = parse_card_heading(html).unwrap();
        assert_eq!(heading.name, "Dark Magician");
        assert_eq!(heading.description, "Negate that effect.");
    }

    #[test]
    fn test_heading_requires_description() {
        let html = r#"<div class="column2"><h1 class="card-name">Kuriboh</h1></div>"#;
        let err = parse_card_heading(html).unwrap_err();
        assert!(matches!(err, ScraperError::ElementNotFound(ref css) if css == CARD_TEXT));
    }
}
