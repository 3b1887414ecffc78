//! Remote address normalization and local path derivation
//!
//! Remote addresses come in two syntaxes that overlap ambiguously: generic
//! URLs (`https://host/path`, `ssh://user@host/path`, `file:///path`) and the
//! SCP-like shorthand used by ssh (`user@host:path`). The shorthand is tried
//! first and, when it matches, generic parsing is skipped entirely.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use url::Url;

use crate::{Error, Result};

/// SCP-like addresses, eg. `git@github.com:user/repo.git`
static SCP_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9_]+)@([a-zA-Z0-9._-]+):(.*)$").expect("SCP pattern is valid")
});

/// Characters escaped when rendering a path
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped when rendering a user
const USERINFO: &AsciiSet = &PATH.add(b'/').add(b':').add(b'@');

/// Stand-in scheme for parsing scheme-relative `//host/path` addresses
const RELATIVE_SCHEME: &str = "relative";

const DEFAULT_SCHEME: &str = "https";
const DEFAULT_SSH_USER: &str = "git";

/// A normalized remote address
///
/// Scheme is never empty. `host` may carry a `:port` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl {
    scheme: String,
    user: Option<String>,
    host: String,
    path: String,
}

impl CanonicalUrl {
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Local path this remote is cloned into, relative to the repos root
    pub fn to_path(&self) -> String {
        url_to_path(self)
    }

    fn normalize(mut self) -> Self {
        if self.scheme == "git+ssh" {
            self.scheme = "ssh".to_string();
        }

        if self.scheme == "ssh" && self.user.is_none() {
            self.user = Some(DEFAULT_SSH_USER.to_string());
        }

        if self.scheme.is_empty() {
            self.scheme = DEFAULT_SCHEME.to_string();
        }

        self
    }
}

impl fmt::Display for CanonicalUrl {
    /// Renders the address in generic URL form, which is what the git engine
    /// is handed for clone.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if let Some(user) = &self.user {
            write!(f, "{}@", utf8_percent_encode(user, USERINFO))?;
        }
        f.write_str(&self.host)?;
        if !self.path.is_empty() && !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        write!(f, "{}", utf8_percent_encode(&self.path, PATH))
    }
}

impl FromStr for CanonicalUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_url(s)
    }
}

/// Parse a raw remote address into its canonical form
///
/// Supports:
/// - `user@host:path` (SCP-like, always `ssh`)
/// - `scheme://[user@]host[:port]/path`, including `git+ssh://` and `file://`
pub fn parse_url(raw: &str) -> Result<CanonicalUrl> {
    let url = match parse_scp(raw) {
        Some(url) => url,
        None => parse_generic(raw)?,
    };

    if url.host.is_empty() && url.path.is_empty() {
        return Err(Error::EmptyUrl);
    }

    Ok(url.normalize())
}

fn parse_scp(raw: &str) -> Option<CanonicalUrl> {
    let caps = SCP_SYNTAX.captures(raw)?;

    Some(CanonicalUrl {
        scheme: "ssh".to_string(),
        user: Some(caps[1].to_string()),
        host: caps[2].to_string(),
        path: caps[3].to_string(),
    })
}

fn parse_generic(raw: &str) -> Result<CanonicalUrl> {
    match Url::parse(raw) {
        Ok(url) => Ok(from_url(&url, url.scheme())),
        Err(url::ParseError::RelativeUrlWithoutBase) => parse_relative(raw),
        Err(e) => Err(Error::InvalidUrl(e)),
    }
}

/// Address without a scheme, eg. `github.com/user/repo` or `//host/path`
///
/// The scheme is left empty for `normalize` to fill in.
fn parse_relative(raw: &str) -> Result<CanonicalUrl> {
    if raw.starts_with("//") {
        let url = Url::parse(&format!("{}:{}", RELATIVE_SCHEME, raw)).map_err(Error::InvalidUrl)?;
        return Ok(from_url(&url, ""));
    }

    let path = raw.split(['?', '#']).next().unwrap_or_default();

    // A colon in the first segment would read as a scheme
    let first_segment = path.split('/').next().unwrap_or_default();
    if first_segment.contains(':') {
        return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithoutBase));
    }

    Ok(CanonicalUrl {
        scheme: String::new(),
        user: None,
        host: String::new(),
        path: decode(path),
    })
}

fn from_url(url: &Url, scheme: &str) -> CanonicalUrl {
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    let user = match url.username() {
        "" => None,
        user => Some(decode(user)),
    };

    // `scheme:opaque` names no location, eg. `github.com:user/repo`
    let path = if url.cannot_be_a_base() {
        String::new()
    } else {
        decode(url.path())
    };

    CanonicalUrl {
        scheme: scheme.to_string(),
        user,
        host,
        path,
    }
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Derive the local path for a canonical URL
///
/// Applied in order: drop any `:port` from the host, join host and path
/// (collapsing `//`, `.` and `..` lexically), strip one trailing `.git`,
/// remove every `~`. The result is not sandboxed: `..` in an untrusted path
/// can climb above the host segment.
pub fn url_to_path(url: &CanonicalUrl) -> String {
    let host = url.host.split(':').next().unwrap_or_default();

    let joined = join_clean(host, &url.path);
    let trimmed = joined.strip_suffix(".git").unwrap_or(&joined);

    trimmed.replace('~', "")
}

/// Join two slash-separated segments and lexically clean the result
fn join_clean(base: &str, rest: &str) -> String {
    let joined = match (base.is_empty(), rest.is_empty()) {
        (true, true) => return String::new(),
        (true, false) => rest.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, rest),
    };

    let rooted = joined.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            part => parts.push(part),
        }
    }

    let cleaned = parts.join("/");
    match (rooted, cleaned.is_empty()) {
        (true, _) => format!("/{}", cleaned),
        (false, true) => ".".to_string(),
        (false, false) => cleaned,
    }
}
