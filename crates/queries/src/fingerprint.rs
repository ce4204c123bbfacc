use sha2::{Digest, Sha256};

use crate::types::TimeParam;

/// Incremental SHA-256 over an unambiguous field encoding.
///
/// Text is length-prefixed and optional fields carry a tag byte, so moving bytes
/// between adjacent fields always changes the digest.
pub(crate) struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub(crate) fn new(kind: u8) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([kind]);
        Self { hasher }
    }

    pub(crate) fn text(&mut self, value: &str) {
        self.hasher.update((value.len() as u64).to_be_bytes());
        self.hasher.update(value.as_bytes());
    }

    pub(crate) fn time(&mut self, value: Option<&TimeParam>) {
        match value {
            None => self.hasher.update([0u8]),
            Some(TimeParam::Int(seconds)) => {
                self.hasher.update([1u8]);
                self.hasher.update(seconds.to_be_bytes());
            }
            Some(TimeParam::Token(token)) => {
                self.hasher.update([2u8]);
                self.text(token);
            }
        }
    }

    pub(crate) fn finish(self) -> String {
        let digest = self.hasher.finalize();
        let head = u64::from_be_bytes([
            digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
        ]);
        format!("{head:016x}")
    }
}
