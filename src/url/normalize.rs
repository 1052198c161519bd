use url::Url;

/// Resolves a reference found on a page into an absolute, fragment-free URL
///
/// Absolute references pass through; relative references are resolved
/// against `base` using standard URL resolution. No further canonicalization
/// is applied: trailing slashes, query order and letter case in the path are
/// preserved, so two URLs are the same entity only if they are byte-equal
/// after this step.
///
/// # Arguments
///
/// * `reference` - The raw attribute value (href, src, srcset candidate)
/// * `base` - The URL of the page the reference appeared on
///
/// # Returns
///
/// * `Some(Url)` - The resolved URL with any fragment removed
/// * `None` - The reference was empty or could not be resolved
///
/// # Examples
///
/// ```
/// use media_mirror::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://h/base/").unwrap();
/// let url = normalize("/a/b?x=1#frag", &base).unwrap();
/// assert_eq!(url.as_str(), "https://h/a/b?x=1");
/// ```
pub fn normalize(reference: &str, base: &Url) -> Option<Url> {
    if reference.trim().is_empty() {
        return None;
    }

    let mut url = base.join(reference).ok()?;
    url.set_fragment(None);
    Some(url)
}

/// Returns the root page of an origin (`scheme://host[:port]/`)
pub fn origin_root(origin: &Url) -> Url {
    let mut root = origin.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}
