//! Per-tree configuration shared by the builder and the verifier.
//!
//! A tree fixes two knobs at construction time:
//!
//! * **Node encoding:** child digests are fed to the interior hash either as
//!   raw bytes or as lowercase hexadecimal strings.
//! * **Separator:** a single byte inserted between the two encoded children.
//!
//! Both knobs must travel with any exported proof, otherwise an independent
//! verifier cannot recombine the path.

use serde::{Deserialize, Serialize};

/// Encoding applied to child digests before they are combined.
///
/// | Variant | Preimage of an interior node |
/// |---------|------------------------------|
/// | `Raw` | `left || sep || right` |
/// | `Hex` | `hex(left) || sep || hex(right)` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeEncoding {
    /// Digests are concatenated as raw bytes.
    #[default]
    Raw,
    /// Digests are concatenated as lowercase hexadecimal ASCII.
    Hex,
}

impl NodeEncoding {
    pub(crate) const fn code(self) -> u8 {
        match self {
            NodeEncoding::Raw => 0,
            NodeEncoding::Hex => 1,
        }
    }

    pub(crate) const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(NodeEncoding::Raw),
            1 => Some(NodeEncoding::Hex),
            _ => None,
        }
    }

    fn append(self, out: &mut Vec<u8>, digest: &[u8]) {
        match self {
            NodeEncoding::Raw => out.extend_from_slice(digest),
            NodeEncoding::Hex => out.extend_from_slice(hex::encode(digest).as_bytes()),
        }
    }

    fn encoded_len(self, digest_len: usize) -> usize {
        match self {
            NodeEncoding::Raw => digest_len,
            NodeEncoding::Hex => digest_len * 2,
        }
    }
}

/// Combination rule of a tree.
///
/// | Field | Default |
/// |-------|---------|
/// | `encoding` | [`NodeEncoding::Raw`] |
/// | `separator` | `0x00` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TreeConfig {
    pub encoding: NodeEncoding,
    pub separator: u8,
}

impl TreeConfig {
    pub const fn new(encoding: NodeEncoding, separator: u8) -> Self {
        Self {
            encoding,
            separator,
        }
    }

    /// Raw-byte combination with the given separator.
    pub const fn raw(separator: u8) -> Self {
        Self::new(NodeEncoding::Raw, separator)
    }

    /// Hex-string combination with the given separator.
    pub const fn hex(separator: u8) -> Self {
        Self::new(NodeEncoding::Hex, separator)
    }

    pub const fn encoding(&self) -> NodeEncoding {
        self.encoding
    }

    pub const fn separator(&self) -> u8 {
        self.separator
    }

    pub const fn use_hex(&self) -> bool {
        matches!(self.encoding, NodeEncoding::Hex)
    }

    /// Returns the exact byte string hashed for an interior node whose
    /// children carry the `left` and `right` digests.
    pub fn interior_preimage(&self, left: &[u8], right: &[u8]) -> Vec<u8> {
        let capacity =
            self.encoding.encoded_len(left.len()) + 1 + self.encoding.encoded_len(right.len());
        let mut out = Vec::with_capacity(capacity);
        self.encoding.append(&mut out, left);
        out.push(self.separator);
        self.encoding.append(&mut out, right);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_preimage_concatenates_bytes() {
        let config = TreeConfig::raw(0x31);
        assert_eq!(
            config.interior_preimage(&[0xab, 0x01], &[0xff]),
            vec![0xab, 0x01, 0x31, 0xff]
        );
    }

    #[test]
    fn hex_preimage_uses_lowercase_ascii() {
        let config = TreeConfig::hex(b':');
        assert_eq!(config.interior_preimage(&[0xAB, 0x01], &[0xFF]), b"ab01:ff".to_vec());
        assert!(config.use_hex());
    }

    #[test]
    fn default_is_raw_with_zero_separator() {
        let config = TreeConfig::default();
        assert_eq!(config.encoding(), NodeEncoding::Raw);
        assert_eq!(config.separator(), 0);
        assert!(!config.use_hex());
    }

    #[test]
    fn encoding_codes_are_stable() {
        for encoding in [NodeEncoding::Raw, NodeEncoding::Hex] {
            assert_eq!(NodeEncoding::from_code(encoding.code()), Some(encoding));
        }
        assert_eq!(NodeEncoding::from_code(7), None);
    }
}
