//! Canonical little-endian byte layout for proofs and proof envelopes.
//!
//! Proof:
//!
//! ```text
//! version: u16 | digest_size: u16 | step_count: u32 | step_count × (kind: u8 | digest)
//! ```
//!
//! Envelope:
//!
//! ```text
//! version: u16 | algorithm: u8 | encoding: u8 | separator: u8 | proof
//! ```

use super::envelope::ProofEnvelope;
use super::proof::Proof;
use super::types::{Digest, MerkleError, ProofStep, SerKind, StepKind};
use crate::config::{NodeEncoding, TreeConfig};
use crate::hash::HashAlgorithm;

/// Version of the proof layout.
pub const PROOF_VERSION: u16 = 1;

/// Version of the envelope layout.
pub const ENVELOPE_VERSION: u16 = 1;

struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    kind: SerKind,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8], kind: SerKind) -> Self {
        Self {
            bytes,
            offset: 0,
            kind,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    fn read_exact(&mut self, len: usize) -> Result<&'a [u8], MerkleError> {
        if len > self.remaining() {
            return Err(MerkleError::Serialization(self.kind));
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..start + len])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], MerkleError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8, MerkleError> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u16(&mut self) -> Result<u16, MerkleError> {
        self.read_array().map(u16::from_le_bytes)
    }

    fn read_u32(&mut self) -> Result<u32, MerkleError> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn finish(self) -> Result<(), MerkleError> {
        if self.remaining() != 0 {
            return Err(MerkleError::Serialization(self.kind));
        }
        Ok(())
    }
}

/// Serialises a [`Proof`] into the canonical byte layout.
///
/// Every step must carry a digest of the same non-zero width.
pub fn encode_proof(proof: &Proof) -> Result<Vec<u8>, MerkleError> {
    let mut out = Vec::new();
    write_proof(&mut out, proof, SerKind::Proof)?;
    Ok(out)
}

/// Deserialises a [`Proof`] from its canonical byte representation.
pub fn decode_proof(bytes: &[u8]) -> Result<Proof, MerkleError> {
    let mut reader = ByteReader::new(bytes, SerKind::Proof);
    let proof = read_proof(&mut reader)?;
    reader.finish()?;
    Ok(proof)
}

/// Serialises a [`ProofEnvelope`] into the canonical byte layout.
pub fn encode_envelope(envelope: &ProofEnvelope) -> Result<Vec<u8>, MerkleError> {
    let mut out = Vec::new();
    out.extend_from_slice(&ENVELOPE_VERSION.to_le_bytes());
    out.push(envelope.algorithm.code());
    out.push(envelope.config.encoding.code());
    out.push(envelope.config.separator);
    write_proof(&mut out, &envelope.proof, SerKind::Envelope)?;
    Ok(out)
}

/// Deserialises a [`ProofEnvelope`] from its canonical byte representation.
pub fn decode_envelope(bytes: &[u8]) -> Result<ProofEnvelope, MerkleError> {
    let invalid = MerkleError::Serialization(SerKind::Envelope);
    let mut reader = ByteReader::new(bytes, SerKind::Envelope);
    if reader.read_u16()? != ENVELOPE_VERSION {
        return Err(invalid);
    }
    let algorithm = HashAlgorithm::from_code(reader.read_u8()?).ok_or(invalid.clone())?;
    let encoding = NodeEncoding::from_code(reader.read_u8()?).ok_or(invalid.clone())?;
    let separator = reader.read_u8()?;
    let proof = read_proof(&mut reader)?;
    reader.finish()?;
    if proof
        .steps()
        .iter()
        .any(|step| step.digest.len() != algorithm.digest_size())
    {
        return Err(invalid);
    }
    Ok(ProofEnvelope::new(
        algorithm,
        TreeConfig::new(encoding, separator),
        proof,
    ))
}

fn write_proof(out: &mut Vec<u8>, proof: &Proof, kind: SerKind) -> Result<(), MerkleError> {
    let invalid = MerkleError::Serialization(kind);
    let first = proof.steps().first().ok_or(invalid.clone())?;
    let digest_size = u16::try_from(first.digest.len()).map_err(|_| invalid.clone())?;
    if digest_size == 0 {
        return Err(invalid);
    }
    let step_count = u32::try_from(proof.len()).map_err(|_| invalid.clone())?;

    out.extend_from_slice(&PROOF_VERSION.to_le_bytes());
    out.extend_from_slice(&digest_size.to_le_bytes());
    out.extend_from_slice(&step_count.to_le_bytes());
    for step in proof.steps() {
        if step.digest.len() != digest_size as usize {
            return Err(invalid);
        }
        out.push(step.kind.code());
        out.extend_from_slice(step.digest.as_bytes());
    }
    Ok(())
}

fn read_proof(reader: &mut ByteReader<'_>) -> Result<Proof, MerkleError> {
    let invalid = MerkleError::Serialization(reader.kind);
    if reader.read_u16()? != PROOF_VERSION {
        return Err(invalid);
    }
    let digest_size = reader.read_u16()? as usize;
    if digest_size == 0 {
        return Err(invalid);
    }
    let step_count = reader.read_u32()? as usize;
    // Bound the allocation by what the input can actually hold.
    let mut steps = Vec::with_capacity(step_count.min(reader.remaining() / (digest_size + 1)));
    for _ in 0..step_count {
        let kind = StepKind::from_code(reader.read_u8()?).ok_or(invalid.clone())?;
        let digest = Digest::new(reader.read_exact(digest_size)?.to_vec());
        steps.push(ProofStep::new(kind, digest));
    }
    Ok(Proof::new(steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof() -> Proof {
        Proof::new(vec![
            ProofStep::leaf(Digest::new(vec![0x11; 4])),
            ProofStep::left(Digest::new(vec![0x22; 4])),
            ProofStep::root(Digest::new(vec![0x33; 4])),
        ])
    }

    #[test]
    fn proof_layout_is_little_endian() {
        let bytes = encode_proof(&sample_proof()).unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "0100040003000000001111111101222222220333333333"
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode_proof(&sample_proof()).unwrap();
        bytes.push(0);
        assert_eq!(
            decode_proof(&bytes).unwrap_err(),
            MerkleError::Serialization(SerKind::Proof)
        );
    }

    #[test]
    fn truncated_input_is_rejected() {
        let bytes = encode_proof(&sample_proof()).unwrap();
        for len in 0..bytes.len() {
            assert!(decode_proof(&bytes[..len]).is_err(), "prefix of {len} bytes");
        }
    }

    #[test]
    fn unknown_step_kind_is_rejected() {
        let mut bytes = encode_proof(&sample_proof()).unwrap();
        bytes[8] = 9;
        assert!(decode_proof(&bytes).is_err());
    }

    #[test]
    fn uneven_digests_cannot_be_encoded() {
        let proof = Proof::new(vec![
            ProofStep::leaf(Digest::new(vec![0x11; 4])),
            ProofStep::root(Digest::new(vec![0x33; 5])),
        ]);
        assert_eq!(
            encode_proof(&proof).unwrap_err(),
            MerkleError::Serialization(SerKind::Proof)
        );
        assert!(encode_proof(&Proof::new(Vec::new())).is_err());
    }

    #[test]
    fn envelope_digest_width_must_match_algorithm() {
        let envelope =
            ProofEnvelope::new(HashAlgorithm::Sha256, TreeConfig::raw(1), sample_proof());
        let bytes = encode_envelope(&envelope).unwrap();
        assert_eq!(
            decode_envelope(&bytes).unwrap_err(),
            MerkleError::Serialization(SerKind::Envelope)
        );
    }
}
