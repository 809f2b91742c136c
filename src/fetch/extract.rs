//! Heading extraction from update-history pages.
//!
//! Every announcement on a history page is linked from the left-hand
//! navigation with a fixed CSS class. The link text, once entities are
//! decoded, is the heading string the pipeline parses.

use scraper::{Html, Selector};

/// Collapse runs of whitespace (including non-breaking spaces) to one space.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decoded text of every `<a>` carrying `link_class`, in document order.
pub fn extract_headings(html: &str, link_class: &str) -> Vec<String> {
    let selector = match Selector::parse(&format!("a.{}", link_class.trim())) {
        Ok(selector) => selector,
        Err(e) => {
            log::warn!("invalid link class {:?}: {:?}", link_class, e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .map(|link| normalize_ws(&link.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Drop headings mentioning the excluded category unless it is included.
pub fn filter_excluded(headings: Vec<String>, marker: &str, include: bool) -> Vec<String> {
    if include || marker.is_empty() {
        return headings;
    }

    let before = headings.len();
    let kept: Vec<String> = headings.into_iter().filter(|h| !h.contains(marker)).collect();
    if kept.len() < before {
        log::debug!("excluded {} headings containing {:?}", before - kept.len(), marker);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <nav>
            <a class="supLeftNavLink" href="/a">January 17, 2022&#x2014;KB5010793 (OS Builds 19042.1469, 19043.1469, and 19044.1469) Out-of-band</a>
            <a class="supLeftNavLink other" href="/b">January&nbsp;11, 2022&mdash;KB5009557
               (OS Build 17763.2452)</a>
            <a class="footerLink" href="/c">Privacy</a>
            <a class="supLeftNavLink" href="/d"><span>  </span></a>
          </nav>
        </body></html>
    "#;

    #[test]
    fn test_extracts_decoded_link_text() {
        let headings = extract_headings(PAGE, "supLeftNavLink");
        assert_eq!(
            headings,
            vec![
                "January 17, 2022—KB5010793 (OS Builds 19042.1469, 19043.1469, and 19044.1469) Out-of-band",
                "January 11, 2022—KB5009557 (OS Build 17763.2452)",
            ]
        );
    }

    #[test]
    fn test_unknown_class_yields_nothing() {
        assert!(extract_headings(PAGE, "missing").is_empty());
        assert!(extract_headings(PAGE, "not a class!").is_empty());
    }

    #[test]
    fn test_filter_excluded() {
        let headings = vec![
            "May 8, 2018—KB4103731 (OS Build 15063.1088)".to_string(),
            "May 8, 2018—KB4103731 (OS Build 15063.1088) - Windows 10 Mobile".to_string(),
        ];

        let kept = filter_excluded(headings.clone(), "Mobile", false);
        assert_eq!(kept, vec![headings[0].clone()]);

        let kept = filter_excluded(headings.clone(), "Mobile", true);
        assert_eq!(kept, headings);
    }
}
