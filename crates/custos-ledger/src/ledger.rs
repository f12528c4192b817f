use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use custos_crypto::{compute_link, Keyring};
use custos_types::{ChainDigest, PrincipalId, StreamId, SubjectId, UnixMillis};

use crate::entry::LedgerEntry;
use crate::error::LedgerError;

/// In-memory append-only ledger over independent hash-chained streams.
///
/// Appends to one stream are serialized behind a write lock: the tail
/// lookup, link computation, and push happen in one critical section, so
/// two writers can never claim the same previous link. Reads take the read
/// lock and may run concurrently with each other.
#[derive(Default)]
pub struct ChainLedger {
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    streams: HashMap<StreamId, Stream>,
}

/// One stream: entries in append order plus an explicit tail cursor.
#[derive(Default)]
struct Stream {
    entries: Vec<LedgerEntry>,
    /// `current_link` of the most recently appended entry.
    tail: Option<ChainDigest>,
    link_index: HashMap<ChainDigest, usize>,
}

impl ChainLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry to `stream`.
    ///
    /// The canonical payload must already embed `signed_at`; the signature
    /// covers only the payload and is produced by the keyring before the
    /// stream lock is taken. A signing failure leaves the stream untouched.
    pub fn append(
        &self,
        stream: StreamId,
        subject: SubjectId,
        canonical_payload: Vec<u8>,
        signer: PrincipalId,
        signed_at: UnixMillis,
        keyring: &dyn Keyring,
    ) -> Result<LedgerEntry, LedgerError> {
        let signature = keyring.sign(&signer, &canonical_payload)?;

        let mut state = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        let chain = state.streams.entry(stream).or_default();

        let previous_link = chain.tail;
        let current_link = compute_link(&canonical_payload, previous_link.as_ref());
        if chain.link_index.contains_key(&current_link) {
            return Err(LedgerError::LinkCollision { stream });
        }

        let entry = LedgerEntry {
            stream,
            seq: (chain.entries.len() + 1) as u64,
            subject,
            current_link,
            previous_link,
            canonical_payload,
            signature,
            signer,
            signed_at,
        };

        chain.link_index.insert(current_link, chain.entries.len());
        chain.entries.push(entry.clone());
        chain.tail = Some(current_link);

        debug!(
            %stream,
            seq = entry.seq,
            subject = %entry.subject.short_id(),
            link = %entry.current_link.short_hex(),
            "ledger append"
        );

        Ok(entry)
    }

    /// Single-hop continuity check.
    ///
    /// True when some entry in the same stream has `current_link ==
    /// entry.previous_link`, or when the entry claims genesis and really is
    /// the stream's first link. This detects a dangling or forged link but
    /// does not prove the whole prefix chain; use
    /// [`audit_stream`](Self::audit_stream) for the end-to-end walk.
    pub fn verify_continuity(&self, entry: &LedgerEntry) -> bool {
        let Ok(state) = self.inner.read() else {
            return false;
        };
        let Some(chain) = state.streams.get(&entry.stream) else {
            // No earlier entry exists, so only a genesis claim is coherent.
            return entry.previous_link.is_none();
        };

        match entry.previous_link {
            Some(prev) => chain.link_index.contains_key(&prev),
            None => match chain.entries.first() {
                Some(first) => first.current_link == entry.current_link,
                None => true,
            },
        }
    }

    /// All entries of a stream in append order.
    pub fn entries(&self, stream: StreamId) -> Vec<LedgerEntry> {
        self.inner
            .read()
            .ok()
            .and_then(|state| state.streams.get(&stream).map(|c| c.entries.clone()))
            .unwrap_or_default()
    }

    /// All entries attesting one subject, in append order.
    pub fn entries_for_subject(&self, stream: StreamId, subject: SubjectId) -> Vec<LedgerEntry> {
        self.inner
            .read()
            .ok()
            .and_then(|state| {
                state.streams.get(&stream).map(|chain| {
                    chain
                        .entries
                        .iter()
                        .filter(|e| e.subject == subject)
                        .cloned()
                        .collect()
                })
            })
            .unwrap_or_default()
    }

    /// Look up an entry by its current link.
    pub fn find_by_link(&self, stream: StreamId, link: &ChainDigest) -> Option<LedgerEntry> {
        let state = self.inner.read().ok()?;
        let chain = state.streams.get(&stream)?;
        let index = *chain.link_index.get(link)?;
        chain.entries.get(index).cloned()
    }

    /// The stream's tail cursor: `current_link` of the last appended entry.
    pub fn tail(&self, stream: StreamId) -> Option<ChainDigest> {
        self.inner
            .read()
            .ok()
            .and_then(|state| state.streams.get(&stream).and_then(|c| c.tail))
    }

    /// Number of entries appended to the stream.
    pub fn len(&self, stream: StreamId) -> u64 {
        self.inner
            .read()
            .ok()
            .and_then(|state| state.streams.get(&stream).map(|c| c.entries.len() as u64))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, stream: StreamId) -> bool {
        self.len(stream) == 0
    }
}

#[cfg(test)]
impl ChainLedger {
    /// Test hook: overwrite a stored payload in place without re-hashing,
    /// simulating direct tampering with persisted state.
    pub(crate) fn corrupt_payload(&self, stream: StreamId, seq: u64, payload: Vec<u8>) {
        let mut state = self.inner.write().unwrap();
        let chain = state.streams.get_mut(&stream).unwrap();
        chain.entries[(seq - 1) as usize].canonical_payload = payload;
    }
}
