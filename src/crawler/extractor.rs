//! HTML extraction of crawlable links and media references
//!
//! This module walks a parsed page and returns:
//! - Links to follow (`<a href>` on the origin that pass the path rules)
//! - Media URLs from `<img src>`, `<img srcset>` and `<source srcset>`
//!
//! CSS `background-image` references, inline or external, are not extracted.

use crate::url::{normalize, PathFilter};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Links and media found on a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Same-origin, path-allowed URLs to crawl
    pub links: BTreeSet<Url>,

    /// URLs that mention the media prefix
    pub media: BTreeSet<Url>,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.media.is_empty()
    }
}

/// Parses HTML and extracts links and media
///
/// Malformed markup never fails: the parser recovers, and a degenerate
/// document simply yields empty sets.
///
/// # Example
///
/// ```
/// use media_mirror::crawler::extract_page;
/// use media_mirror::url::PathFilter;
/// use url::Url;
///
/// let page = Url::parse("https://shop.example.com/").unwrap();
/// let filter = PathFilter::new(
///     &page,
///     vec!["/".to_string()],
///     vec!["/media".to_string()],
///     "/media/product_images/",
/// );
/// let html = r#"<img src="/media/product_images/shoe.jpg"><a href="/products/x">x</a>"#;
/// let result = extract_page(html, &page, &filter);
/// assert_eq!(result.media.len(), 1);
/// assert_eq!(result.links.len(), 1);
/// ```
pub fn extract_page(html: &str, page_url: &Url, filter: &PathFilter) -> PageResult {
    let document = Html::parse_document(html);
    extract_from_document(&document, page_url, filter)
}

/// Extracts links and media from an already parsed document
pub fn extract_from_document(document: &Html, page_url: &Url, filter: &PathFilter) -> PageResult {
    let mut result = PageResult::default();

    collect_links(document, page_url, filter, &mut result.links);
    collect_img_media(document, page_url, filter, &mut result.media);
    collect_source_media(document, page_url, filter, &mut result.media);

    result
}

fn collect_links(document: &Html, page_url: &Url, filter: &PathFilter, links: &mut BTreeSet<Url>) {
    let Ok(selector) = Selector::parse("a[href]") else {
        return;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match normalize(href, page_url) {
            Some(url) if filter.is_crawlable_origin_path(&url) => {
                links.insert(url);
            }
            Some(url) => tracing::trace!("Not following {}", url),
            None => tracing::trace!("Unresolvable href {:?} on {}", href, page_url),
        }
    }
}

fn collect_img_media(
    document: &Html,
    page_url: &Url,
    filter: &PathFilter,
    media: &mut BTreeSet<Url>,
) {
    let Ok(selector) = Selector::parse("img") else {
        return;
    };

    for element in document.select(&selector) {
        if let Some(src) = element.value().attr("src") {
            add_media_reference(src, page_url, filter, media);
        }
        collect_srcset(element, page_url, filter, media);
    }
}

/// `<source>` elements inside `<picture>` only carry candidates in srcset
fn collect_source_media(
    document: &Html,
    page_url: &Url,
    filter: &PathFilter,
    media: &mut BTreeSet<Url>,
) {
    let Ok(selector) = Selector::parse("source[srcset]") else {
        return;
    };

    for element in document.select(&selector) {
        collect_srcset(element, page_url, filter, media);
    }
}

fn collect_srcset(
    element: ElementRef<'_>,
    page_url: &Url,
    filter: &PathFilter,
    media: &mut BTreeSet<Url>,
) {
    if let Some(srcset) = element.value().attr("srcset") {
        for candidate in srcset_candidates(srcset) {
            add_media_reference(candidate, page_url, filter, media);
        }
    }
}

fn add_media_reference(reference: &str, page_url: &Url, filter: &PathFilter, media: &mut BTreeSet<Url>) {
    if !filter.is_media_reference(reference) {
        return;
    }

    if let Some(url) = normalize(reference, page_url) {
        media.insert(url);
    }
}

/// Splits a srcset value into its candidate URLs
///
/// Each comma-separated candidate is trimmed and cut at the first space,
/// dropping width/density descriptors. A candidate without a descriptor
/// yields the whole trimmed URL.
pub fn srcset_candidates(srcset: &str) -> impl Iterator<Item = &str> {
    srcset
        .split(',')
        .filter_map(|part| part.trim().split(' ').next())
        .filter(|candidate| !candidate.is_empty())
}
