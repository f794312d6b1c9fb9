//! Connection targets
//!
//! Supported forms:
//!
//! ```text
//! memory://[user:password@]<name>[?read_only=true]
//! file://<path>[?read_only=true]
//! ```
//!
//! Parsing happens when a client first connects, never when it is created.
//! Every parse failure is an [`Error::Unreachable`] naming the redacted target.

use nutriflow_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// User name and password presented to a server
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name
    pub user: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Parsed connection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    /// Named in-process server
    Memory {
        /// Registry name
        name: String,
        /// Presented credentials
        credentials: Option<Credentials>,
        /// Deny writes on connections from this URI
        read_only: bool,
    },
    /// Directory-backed server
    File {
        /// Root directory
        root: PathBuf,
        /// Deny writes on connections from this URI
        read_only: bool,
    },
}

impl StoreUri {
    /// Parse a connection URI
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unreachable`] for a missing or unknown scheme, an empty
    /// target, or a malformed option.
    pub fn parse(uri: &str) -> Result<Self> {
        let unreachable = |reason: &str| Error::unreachable(redact(uri), reason);

        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| unreachable("missing scheme, expected memory:// or file://"))?;
        let (target, query) = match rest.split_once('?') {
            Some((target, query)) => (target, Some(query)),
            None => (rest, None),
        };
        let read_only = parse_options(query).map_err(|reason| unreachable(&reason))?;

        match scheme {
            "memory" => {
                let (credentials, name) = match target.rsplit_once('@') {
                    Some((userinfo, name)) => {
                        let (user, password) = userinfo
                            .split_once(':')
                            .ok_or_else(|| unreachable("credentials must be user:password"))?;
                        (Some(Credentials::new(user, password)), name)
                    }
                    None => (None, target),
                };
                if name.is_empty() {
                    return Err(unreachable("missing server name"));
                }
                Ok(StoreUri::Memory {
                    name: name.to_string(),
                    credentials,
                    read_only,
                })
            }
            "file" => {
                if target.is_empty() {
                    return Err(unreachable("missing root directory"));
                }
                Ok(StoreUri::File {
                    root: PathBuf::from(target),
                    read_only,
                })
            }
            other => Err(unreachable(&format!("unsupported scheme '{other}'"))),
        }
    }

    /// True if connections from this URI may not write
    pub fn read_only(&self) -> bool {
        match self {
            StoreUri::Memory { read_only, .. } | StoreUri::File { read_only, .. } => *read_only,
        }
    }

    /// Registry key identifying the server this URI points at
    pub fn server_key(&self) -> String {
        match self {
            StoreUri::Memory { name, .. } => format!("memory://{name}"),
            StoreUri::File { root, .. } => format!("file://{}", root.display()),
        }
    }
}

fn parse_options(query: Option<&str>) -> std::result::Result<bool, String> {
    let mut read_only = false;
    let Some(query) = query else {
        return Ok(read_only);
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "read_only" => {
                read_only = match value {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    other => return Err(format!("invalid read_only value '{other}'")),
                }
            }
            other => warn!(option = other, "ignoring unknown connection option"),
        }
    }
    Ok(read_only)
}

/// Replace the password in a URI with `***`
pub fn redact(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let Some((userinfo, tail)) = rest.split_once('@') else {
        return uri.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{tail}"),
        None => uri.to_string(),
    }
}
