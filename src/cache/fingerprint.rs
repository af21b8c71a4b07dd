//! Cache keys derived from user agents.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::options::ClassifyOptions;

const NAMESPACE: &str = "fingerprint";

/// SHA-256 digest identifying one `(options, user agent)` pair.
///
/// Results depend on the options, so the option tag is hashed in front of
/// the user agent. The tag never contains `/`, which keeps the encoding
/// unambiguous.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn new(user_agent: &str, options: &ClassifyOptions) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(NAMESPACE.as_bytes());
        hasher.update(b"/");
        hasher.update(options.tag().as_bytes());
        hasher.update(b"/");
        hasher.update(user_agent.as_bytes());
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Key under which the entry is kept in a shared store.
    pub fn storage_key(&self) -> String {
        format!("{}/{}", NAMESPACE, self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
