use custos_types::{ChainDigest, GENESIS};

use crate::hasher::DomainHasher;

/// Compute a chain link: `H(canonical_payload || previous_link)`.
///
/// When there is no previous link, the literal bytes `GENESIS` stand in for
/// it, so the first link of a stream is `H(payload || "GENESIS")`. The
/// substitution is part of the link definition: recomputing a stored link
/// must use the same rule.
pub fn compute_link(payload: &[u8], previous: Option<&ChainDigest>) -> ChainDigest {
    let mut input = Vec::with_capacity(payload.len() + 64);
    input.extend_from_slice(payload);
    match previous {
        Some(prev) => input.extend_from_slice(prev.to_hex().as_bytes()),
        None => input.extend_from_slice(GENESIS.as_bytes()),
    }
    DomainHasher::LINK.hash(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn genesis_link_uses_sentinel_bytes() {
        let payload = b"first entry";
        let expected = {
            let mut input = payload.to_vec();
            input.extend_from_slice(b"GENESIS");
            DomainHasher::LINK.hash(&input)
        };
        assert_eq!(compute_link(payload, None), expected);
    }

    #[test]
    fn link_depends_on_previous() {
        let payload = b"entry";
        let prev_a = ChainDigest::from_hash([1; 32]);
        let prev_b = ChainDigest::from_hash([2; 32]);
        assert_ne!(
            compute_link(payload, Some(&prev_a)),
            compute_link(payload, Some(&prev_b))
        );
        assert_ne!(compute_link(payload, Some(&prev_a)), compute_link(payload, None));
    }

    #[test]
    fn link_depends_on_payload() {
        let prev = ChainDigest::from_hash([3; 32]);
        assert_ne!(
            compute_link(b"one", Some(&prev)),
            compute_link(b"two", Some(&prev))
        );
    }

    proptest! {
        #[test]
        fn recomputed_chain_matches(payloads in proptest::collection::vec(
            proptest::collection::vec(any::<u8>(), 0..64), 1..12)
        ) {
            // Build a chain, then recompute every link from scratch.
            let mut links = Vec::new();
            let mut prev: Option<ChainDigest> = None;
            for payload in &payloads {
                let link = compute_link(payload, prev.as_ref());
                links.push(link);
                prev = Some(link);
            }

            for (i, payload) in payloads.iter().enumerate() {
                let expected_prev = if i == 0 { None } else { Some(&links[i - 1]) };
                prop_assert_eq!(compute_link(payload, expected_prev), links[i]);
            }
        }
    }
}
