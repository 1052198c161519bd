use crate::config::SiteConfig;
use crate::MirrorError;
use url::Url;

/// Path rules deciding which URLs are pages to crawl and which are media
///
/// Configuration is fixed at construction; both predicates are pure.
#[derive(Debug, Clone)]
pub struct PathFilter {
    host: Option<String>,
    port: Option<u16>,
    allow_prefixes: Vec<String>,
    deny_prefixes: Vec<String>,
    media_prefix: String,
}

impl PathFilter {
    /// Creates a filter for the given origin and path rules
    pub fn new(
        origin: &Url,
        allow_prefixes: Vec<String>,
        deny_prefixes: Vec<String>,
        media_prefix: impl Into<String>,
    ) -> Self {
        Self {
            host: origin.host_str().map(str::to_string),
            port: origin.port(),
            allow_prefixes,
            deny_prefixes,
            media_prefix: media_prefix.into(),
        }
    }

    /// Builds a filter from the `[site]` configuration table
    pub fn from_config(site: &SiteConfig) -> Result<Self, MirrorError> {
        let origin = Url::parse(&site.origin)?;
        Ok(Self::new(
            &origin,
            site.allow_prefixes.clone(),
            site.deny_prefixes.clone(),
            site.media_prefix.clone(),
        ))
    }

    /// The configured media path prefix
    pub fn media_prefix(&self) -> &str {
        &self.media_prefix
    }

    /// Returns true if the URL is on the origin's network location and its
    /// path passes the deny/allow rules
    ///
    /// A deny-prefix match wins over any allow-prefix match.
    pub fn is_crawlable_origin_path(&self, url: &Url) -> bool {
        if !self.same_network_location(url) {
            return false;
        }

        let path = url.path();

        if self.deny_prefixes.iter().any(|bad| path.starts_with(bad.as_str())) {
            return false;
        }

        self.allow_prefixes
            .iter()
            .any(|good| path.starts_with(good.as_str()))
    }

    /// Returns true if the media prefix occurs anywhere in the URL's path
    pub fn is_media_path(&self, url: &Url) -> bool {
        self.is_media_reference(url.path())
    }

    /// Returns true if a raw attribute value mentions the media prefix
    ///
    /// Matching is substring containment, so prefixes embedded in generated or
    /// query-decorated references also count.
    pub fn is_media_reference(&self, reference: &str) -> bool {
        reference.contains(self.media_prefix.as_str())
    }

    fn same_network_location(&self, url: &Url) -> bool {
        url.host_str() == self.host.as_deref() && url.port() == self.port
    }
}
