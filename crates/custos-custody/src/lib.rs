//! Custody composition layer for Custos.
//!
//! Ties the ledger, index, keyring, and stores together into the custody
//! operations:
//! - write paths: collect, amend, and delete evidence; record movements and
//!   evidence-room visits
//! - [`verify`](service::CustodyService::verify): the composite integrity
//!   verdict per evidence record (signature, hash chain, Merkle inclusion)
//! - [`timeline`](service::CustodyService::timeline): the merged,
//!   sequence-numbered chain-of-custody history per evidence item

pub mod canonical;
pub mod config;
pub mod error;
pub mod service;
pub mod timeline;
pub mod verifier;

pub use canonical::{AttachmentRef, EvidenceCanonical, MovementCanonical};
pub use config::CustodyConfig;
pub use error::CustodyError;
pub use service::{
    AccessDraft, AttachmentDraft, CustodyService, EvidenceChanges, EvidenceDraft, MovementDraft,
};
pub use timeline::{
    Attestation, EventDetail, Timeline, TimelineEvent, TimelineEventKind, TimelineSummary,
};
pub use verifier::{IntegrityStatus, IntegrityVerifier, VerificationReport};
