//! Subdomain identifier extraction.

use regex::Regex;

/// Leftmost dot-delimited label followed by at least one more character.
const HOST_PATTERN: &str = r"^(?P<identifier>[^\.]+)\..+$";

/// Compiled matcher splitting a host into `(identifier, remainder)`.
///
/// Immutable after construction, shared by every request.
#[derive(Debug, Clone)]
pub struct IdentifierPattern {
    regex: Regex,
}

impl IdentifierPattern {
    /// Compile the host pattern.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(HOST_PATTERN)?,
        })
    }

    /// Split `host` into its identifier and the host that remains after the
    /// first dot.
    ///
    /// A host the pattern does not match (no dot, leading dot, trailing dot
    /// only) yields an empty identifier and the host unchanged.
    pub fn extract<'h>(&self, host: &'h str) -> (&'h str, &'h str) {
        match self
            .regex
            .captures(host)
            .and_then(|caps| caps.name("identifier"))
        {
            Some(identifier) => {
                let identifier = identifier.as_str();
                (identifier, &host[identifier.len() + 1..])
            }
            None => ("", host),
        }
    }
}
