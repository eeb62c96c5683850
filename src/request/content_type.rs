//! Content-type descriptor shared by requests, responses and decoders.

use std::fmt;

/// A `Content-Type` header value such as `application/json; charset=utf-8`.
///
/// The raw text is kept verbatim so it can be sent exactly as declared;
/// the accessors parse it lazily.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType(String);

impl ContentType {
    /// Wraps a raw descriptor without validating it.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// `application/json`
    #[must_use]
    pub fn json() -> Self {
        Self::new("application/json")
    }

    /// `text/plain; charset=utf-8`, the default for requests built without one.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text/plain; charset=utf-8")
    }

    /// `application/x-www-form-urlencoded`
    #[must_use]
    pub fn form_urlencoded() -> Self {
        Self::new("application/x-www-form-urlencoded")
    }

    /// The descriptor exactly as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lower-cased `type/subtype` part, without parameters.
    #[must_use]
    pub fn mime_type(&self) -> String {
        self.0
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// The lower-cased `charset` parameter, with surrounding quotes removed.
    #[must_use]
    pub fn charset(&self) -> Option<String> {
        self.0.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
        })
    }

    /// Returns true for `application/json` and any `+json` structured suffix type.
    #[must_use]
    pub fn is_json(&self) -> bool {
        let mime = self.mime_type();
        mime == "application/json" || mime.ends_with("+json")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ContentType {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
