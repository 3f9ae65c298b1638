//! Frozen chain checkpoints.
//!
//! A checkpoint is a known `(height, header)` pair that bounds where initial
//! chain synchronization starts for a wallet created at a given date. The
//! table is validated once on construction: each header is serialized into
//! its 80-byte wire form, double-SHA-256 hashed, and compared against the
//! digest recorded next to it.
//!
//! That digest is not the chain's block hash: the chain identifies blocks by
//! its own proof-of-work hash, which is carried alongside as
//! [`Checkpoint::block_hash`] for display and lookups.

use sha2::{Digest, Sha256};

use crate::error::RatesError;

/// Block header fields needed to start syncing from a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: i32,
    /// Previous block hash, internal (little-endian) byte order.
    pub prev_block: [u8; 32],
    /// Merkle root, internal (little-endian) byte order.
    pub merkle_root: [u8; 32],
    /// Unix seconds.
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// 80-byte wire serialization.
    pub fn serialize(&self) -> [u8; 80] {
        let mut out = [0u8; 80];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_block);
        out[36..68].copy_from_slice(&self.merkle_root);
        out[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Double-SHA-256 of the serialized header, as a display-order hex string.
    pub fn sha256d_hex(&self) -> String {
        let first = Sha256::digest(self.serialize());
        let mut second = [0u8; 32];
        second.copy_from_slice(&Sha256::digest(first));
        second.reverse();
        hex::encode(second)
    }
}

/// A trusted `(height, header)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub height: u32,
    pub header: BlockHeader,
    /// Block hash as reported by the chain (display order).
    pub block_hash: &'static str,
}

/// Raw table entry as written in source: display-order hex hashes.
struct RawCheckpoint {
    height: u32,
    version: i32,
    prev_block: &'static str,
    merkle_root: &'static str,
    timestamp: u32,
    bits: u32,
    nonce: u32,
    /// Chain block hash.
    block_hash: &'static str,
    /// [`BlockHeader::sha256d_hex`] of the header, checked on load.
    header_digest: &'static str,
}

const MAINNET: &[RawCheckpoint] = &[RawCheckpoint {
    height: 400_000,
    version: 4,
    prev_block: "66aa54b9a85e32c3d466fe38cbd40553120a32e15f99b107e31c20a6f56882e7",
    merkle_root: "5f19fc2b20e25c9ebdc373fd7b4fe49d164b0d139f1121e603f956a1ae8d0b28",
    timestamp: 1_529_796_056,
    bits: 453_089_485,
    nonce: 0,
    block_hash: "9491894ab30da4bae4e8a2ca9547f2f6a01ac29fc4006342cc690fd61dbe55b3",
    header_digest: "0bffeb6f831a3a86fe53f5a33b67b98e672b7ae451f5090e0f60203fc6141691",
}];

/// Validated, immutable checkpoint table ordered by ascending height.
#[derive(Debug, Clone)]
pub struct Checkpoints {
    entries: Vec<Checkpoint>,
}

impl Checkpoints {
    /// Build and self-check the mainnet table.
    pub fn mainnet() -> Result<Self, RatesError> {
        let entries = MAINNET.iter().map(decode_raw).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Checkpoint] {
        &self.entries
    }

    /// Newest checkpoint whose header time is strictly before
    /// `created_at_secs`; the earliest entry when the date predates them all.
    pub fn select(&self, created_at_secs: u64) -> Checkpoint {
        self.entries
            .iter()
            .rev()
            .find(|cp| created_at_secs > u64::from(cp.header.timestamp))
            .copied()
            .unwrap_or(self.entries[0])
    }
}

fn decode_raw(raw: &RawCheckpoint) -> Result<Checkpoint, RatesError> {
    let header = BlockHeader {
        version: raw.version,
        prev_block: hash_from_display_hex(raw.prev_block)?,
        merkle_root: hash_from_display_hex(raw.merkle_root)?,
        timestamp: raw.timestamp,
        bits: raw.bits,
        nonce: raw.nonce,
    };
    let computed = header.sha256d_hex();
    if computed != raw.header_digest {
        return Err(RatesError::Checkpoint(format!(
            "height {}: header digest {computed} does not match {}",
            raw.height, raw.header_digest
        )));
    }
    Ok(Checkpoint { height: raw.height, header, block_hash: raw.block_hash })
}

/// Parse a display-order (byte-reversed) 32-byte hash.
fn hash_from_display_hex(s: &str) -> Result<[u8; 32], RatesError> {
    let bytes = hex::decode(s).map_err(|e| RatesError::Checkpoint(format!("bad hash '{s}': {e}")))?;
    let mut out: [u8; 32] =
        bytes.try_into().map_err(|_| RatesError::Checkpoint(format!("hash '{s}' is not 32 bytes")))?;
    out.reverse();
    Ok(out)
}
