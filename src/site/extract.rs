//! HTML extraction for the course website
//!
//! The year overview page links every student as `<a href=".../{year}/students/...">`.
//! The playground page lives under the same path, so it shows up as a
//! "student" unless it is filtered out by its link text.

use scraper::{Html, Selector};

use crate::error::{Error, Result};

/// Extracts student names from the year overview page
#[derive(Debug, Clone)]
pub struct StudentExtractor {
    link_marker: String,
    include_playground: bool,
    anchors: Selector,
}

impl StudentExtractor {
    /// Create an extractor matching hrefs that contain `link_marker`
    pub fn new(link_marker: impl Into<String>, include_playground: bool) -> Self {
        Self {
            link_marker: link_marker.into(),
            include_playground,
            anchors: Selector::parse("a[href]").expect("static selector is valid"),
        }
    }

    /// Collect the trimmed link text of every student link, in page order
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut students = Vec::new();

        for anchor in document.select(&self.anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains(&self.link_marker) {
                continue;
            }

            let name = anchor.text().collect::<String>().trim().to_string();
            if !self.include_playground && name.to_lowercase().contains("playground") {
                tracing::debug!("Found playground link in student links, skipping");
                continue;
            }
            if name.is_empty() {
                continue;
            }
            students.push(name);
        }

        students
    }
}

/// Collect the trimmed text of every element matching `selector`
///
/// # Errors
///
/// Returns `Error::Config` if the selector is not valid CSS
pub fn extract_elements(html: &str, selector: &str) -> Result<Vec<String>> {
    let selector = Selector::parse(selector)
        .map_err(|e| Error::config(format!("Invalid CSS selector '{selector}': {e}")))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}
