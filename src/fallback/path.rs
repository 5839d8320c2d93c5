//! Fallback target computation.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// `Url::set_path` leaves `%` alone, so a literal one is escaped up front.
/// Everything else is left to `set_path`.
const LITERAL_PERCENT: &AsciiSet = &CONTROLS.add(b'%');

/// Path of the fallback target.
///
/// A target without a leading `/` replaces the last segment of `logical_path`
/// (`index.html` next to the missing file). A target with a leading `/` is a
/// route under `base_path`.
pub fn fallback_path(target: &str, logical_path: &str, base_path: &str) -> String {
    if target.starts_with('/') {
        return format!("{}{}", base_path, target);
    }

    match logical_path.rfind('/') {
        Some(idx) => format!("{}{}", &logical_path[..=idx], target),
        None => target.to_string(),
    }
}

/// `scheme://host` origin that fallback and request URLs are built on.
pub fn origin(scheme: &str, host: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}://{}", scheme, host))
}

/// URL on `origin` with the given logical (unescaped) path and optional query.
/// The path is percent-encoded as needed, a literal `%` included.
pub fn url_on(origin: &Url, path: &str, query: Option<&str>) -> Url {
    let mut url = origin.clone();
    url.set_path(&utf8_percent_encode(path, LITERAL_PERCENT).to_string());
    url.set_query(query);
    url
}
