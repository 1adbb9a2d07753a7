//! Local file naming for downloads
//!
//! Objects are written locally under the final segment of their key. When a
//! batch contains several keys with the same final segment, later ones are
//! renamed `{n}_{name}` where `n` is a single counter shared by the whole
//! batch: it starts at 1 and advances on every collision, regardless of which
//! name collided.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::uri::ObjectPath;

/// Return the final `/`-delimited segment of `path`
///
/// If `extensions` is non-empty, the first one (in list order) that the
/// segment ends with is stripped. Nothing is stripped when none match.
pub fn base_name<S: AsRef<str>>(path: &str, extensions: &[S]) -> String {
    let name = path.rsplit('/').next().unwrap_or_default();
    extensions
        .iter()
        .find_map(|ext| name.strip_suffix(ext.as_ref()))
        .unwrap_or(name)
        .to_string()
}

/// Names handed out during one batch
#[derive(Debug)]
pub struct NameRegistry {
    order: Vec<String>,
    seen: HashMap<String, usize>,
    next_dup: usize,
}

impl NameRegistry {
    /// Create an empty registry with the collision counter at 1
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            seen: HashMap::new(),
            next_dup: 1,
        }
    }

    /// Assign a local name for `candidate`
    ///
    /// The first occurrence keeps its name. Any repeat gets the current
    /// counter value as a prefix and advances the counter. Prefixed names are
    /// not registered themselves.
    pub fn assign(&mut self, candidate: &str) -> String {
        match self.seen.get_mut(candidate) {
            Some(count) => {
                *count += 1;
                let name = format!("{}_{candidate}", self.next_dup);
                self.next_dup += 1;
                name
            }
            None => {
                self.seen.insert(candidate.to_string(), 1);
                self.order.push(candidate.to_string());
                candidate.to_string()
            }
        }
    }

    /// Registered base names, in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// How many times `name` has been offered to this registry
    pub fn seen_count(&self, name: &str) -> usize {
        self.seen.get(name).copied().unwrap_or(0)
    }

    /// Number of collisions so far
    pub fn collisions(&self) -> usize {
        self.next_dup - 1
    }
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A source URI paired with the local name it downloads to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    pub uri: String,
    pub local_name: String,
}

/// Resolve local names for a batch of URIs, preserving input order
///
/// Fails on the first URI that cannot be parsed.
pub fn resolve_batch_names<I, S>(uris: I) -> Result<Vec<ResolvedName>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut registry = NameRegistry::new();
    let mut resolved = Vec::new();

    for uri in uris {
        let uri = uri.as_ref();
        let path = ObjectPath::parse(uri)?;
        let local_name = registry.assign(path.file_name());
        tracing::debug!(uri, local_name = %local_name, "resolved local name");
        resolved.push(ResolvedName {
            uri: uri.to_string(),
            local_name,
        });
    }

    Ok(resolved)
}
