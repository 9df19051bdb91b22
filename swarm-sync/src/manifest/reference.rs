//! Swarm reference hashes returned by `swarm-cli upload`.

use crate::utils::errors::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a Swarm reference in hex characters
pub const REFERENCE_LEN: usize = 64;

/// A 64-character hex Swarm reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SwarmHash(String);

impl SwarmHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pull the reference swarm-cli prints at the very end of its output.
    ///
    /// Any preceding text (curl traces, progress lines) is ignored; the
    /// trimmed output must end in exactly [`REFERENCE_LEN`] hex characters.
    pub fn from_cli_output(output: &str) -> Option<Self> {
        let trimmed = output.trim_end();
        let start = trimmed.len().checked_sub(REFERENCE_LEN)?;
        let tail = trimmed.get(start..)?;
        tail.parse().ok()
    }
}

impl FromStr for SwarmHash {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == REFERENCE_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(SyncError::InvalidReference(s.to_string()))
        }
    }
}

impl TryFrom<String> for SwarmHash {
    type Error = SyncError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SwarmHash> for String {
    fn from(value: SwarmHash) -> Self {
        value.0
    }
}

impl fmt::Display for SwarmHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "3f2a9c0e51b7d4e8a6f0c2b9e1d3a5f7c9e0b2d4f6a8c0e2b4d6f8a0c2e4b6d8";

    #[test]
    fn test_parse_valid_reference() {
        let hash: SwarmHash = HASH.parse().unwrap();
        assert_eq!(hash.as_str(), HASH);
    }

    #[test]
    fn test_reject_wrong_length_and_non_hex() {
        assert!("abc".parse::<SwarmHash>().is_err());
        assert!(HASH.replace('3', "g").parse::<SwarmHash>().is_err());
        assert!(format!("{}0", HASH).parse::<SwarmHash>().is_err());
    }

    #[test]
    fn test_reference_from_cli_output_tail() {
        let output = format!(
            "curl -X POST http://localhost:1633/bzz -H 'swarm-deferred-upload: true'\n{}\n",
            HASH
        );
        assert_eq!(SwarmHash::from_cli_output(&output).unwrap().as_str(), HASH);
    }

    #[test]
    fn test_no_reference_in_cli_output() {
        assert!(SwarmHash::from_cli_output("").is_none());
        assert!(SwarmHash::from_cli_output("upload failed: stamp not usable").is_none());
        assert!(SwarmHash::from_cli_output(&format!("{} done", HASH)).is_none());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let hash: SwarmHash = HASH.parse().unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", HASH));

        let bad: Result<SwarmHash, _> = serde_json::from_str("\"not-a-hash\"");
        assert!(bad.is_err());
    }
}
