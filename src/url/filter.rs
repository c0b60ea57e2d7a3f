use crate::url::extract_domain;
use std::fmt;
use url::Url;

/// File extensions that never hold documentation pages
const DENIED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".ico", ".webp", ".js", ".css", ".xml",
    ".zip", ".tar", ".gz",
];

/// Path components of account and legal pages
const DENIED_SEGMENTS: &[&str] = &[
    "login", "signin", "signup", "register", "logout", "privacy", "terms", "legal", "cookie",
    "contact",
];

/// Why a URL was refused by the admission filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not http or https
    Scheme,
    /// Outside the locked crawl domain
    OffDomain,
    /// Final path segment names a non-document file
    Extension,
    /// Path contains an account/legal component
    DeniedSegment,
    /// Disallowed by the domain's robots.txt
    Robots,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Scheme => "unsupported scheme",
            Self::OffDomain => "outside crawl domain",
            Self::Extension => "non-document extension",
            Self::DeniedSegment => "denied path segment",
            Self::Robots => "disallowed by robots.txt",
        };
        f.write_str(reason)
    }
}

/// Applies the static part of the admission filter
///
/// Robots directives are checked separately by the crawler since they need
/// network access.
///
/// # Examples
///
/// ```
/// use docmap::url::{check_admission, Rejection};
/// use url::Url;
///
/// let ok = Url::parse("https://example.com/docs/intro").unwrap();
/// assert!(check_admission(&ok, "example.com").is_ok());
///
/// let login = Url::parse("https://example.com/Login").unwrap();
/// assert_eq!(check_admission(&login, "example.com"), Err(Rejection::DeniedSegment));
/// ```
pub fn check_admission(url: &Url, allowed_domain: &str) -> Result<(), Rejection> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Rejection::Scheme);
    }

    if extract_domain(url).as_deref() != Some(allowed_domain) {
        return Err(Rejection::OffDomain);
    }

    let path = url.path().to_lowercase();

    if DENIED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return Err(Rejection::Extension);
    }

    if path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .any(|segment| DENIED_SEGMENTS.contains(&segment))
    {
        return Err(Rejection::DeniedSegment);
    }

    Ok(())
}
