//! `User-Agent` token list composition.
//!
//! # Responsibilities
//! - Represent product (`name/version`) and comment (`(text)`) tokens
//! - Sanitize the OS description into a legal comment
//! - Compose caller tokens, the platform comment and baseline tokens
//!
//! # Design Decisions
//! - Deduplication is exact string equality, first occurrence wins
//! - Each connection flavor composes its own list; lists are never merged

use reqwest::header::HeaderValue;
use serde::Serialize;

use crate::error::{Result, TransportError};
use crate::http::platform::PlatformInfo;

/// One product or comment token of a `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserAgentToken(String);

impl UserAgentToken {
    /// A product token, `name` or `name/version`.
    pub fn product(name: &str, version: Option<&str>) -> Result<Self> {
        if name.is_empty() || !name.chars().all(is_tchar) {
            return Err(invalid(format!("'{}' is not a valid product name", name)));
        }
        match version {
            Some(v) if v.is_empty() || !v.chars().all(is_tchar) => {
                Err(invalid(format!("'{}' is not a valid product version", v)))
            }
            Some(v) => Ok(Self(format!("{}/{}", name, v))),
            None => Ok(Self(name.to_string())),
        }
    }

    /// A comment token. The text is sanitized, so this never fails.
    pub fn comment(text: &str) -> Self {
        Self(format!("({})", sanitize_comment(text)))
    }

    /// Parse a configured token: `(text)` is a comment, anything else a product.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Some(inner) = raw.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            return Ok(Self::comment(inner));
        }
        match raw.split_once('/') {
            Some((name, version)) => Self::product(name, Some(version)),
            None => Self::product(raw, None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserAgentToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid(reason: String) -> TransportError {
    TransportError::InvalidHeader {
        name: "User-Agent",
        reason,
    }
}

/// RFC 9110 `tchar`.
fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// Make arbitrary text safe inside a `User-Agent` comment.
///
/// Parentheses become brackets, control and non-ASCII characters are
/// dropped, whitespace runs collapse to a single space.
pub fn sanitize_comment(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| match c {
            '(' => '[',
            ')' => ']',
            c => c,
        })
        .filter(|c| c.is_ascii_graphic() || c.is_whitespace())
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compose the final token list for one connection flavor.
pub fn compose_user_agent(
    explicit: &[UserAgentToken],
    platform: &dyn PlatformInfo,
    existing: &[UserAgentToken],
) -> Vec<UserAgentToken> {
    let platform_token = UserAgentToken::comment(&platform.os_description());

    let mut composed: Vec<UserAgentToken> = Vec::with_capacity(explicit.len() + existing.len() + 1);
    let candidates = explicit
        .iter()
        .chain(std::iter::once(&platform_token))
        .chain(existing.iter());
    for token in candidates {
        if !composed.contains(token) {
            composed.push(token.clone());
        }
    }
    composed
}

/// Render the token list as a header value.
pub fn render_user_agent(tokens: &[UserAgentToken]) -> Result<HeaderValue> {
    let joined = tokens
        .iter()
        .map(UserAgentToken::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    HeaderValue::from_str(&joined).map_err(|e| invalid(e.to_string()))
}
