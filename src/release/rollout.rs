//! Rollout eligibility.
//!
//! A rule admits a client when ANY of its conditions holds:
//! - the customer id is on the customer allow-list,
//! - the region id is on the region allow-list,
//! - the machine's bucket for this release falls under the percentage.
//!
//! The bucket is `fnv1a_32(machine_id ":" version) % 100`. Mixing the release
//! version into the hash gives every release an independent ordering of
//! machines, so the same hosts are not always first into a staged rollout.

use crate::config::RolloutRule;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Number of buckets a percentage is measured against.
pub const BUCKETS: u32 = 100;

/// Client identity as reported by request headers. Missing headers are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    pub customer: String,
    pub region: String,
    pub machine_id: String,
}

impl ClientIdentity {
    pub fn new(
        customer: impl Into<String>,
        region: impl Into<String>,
        machine_id: impl Into<String>,
    ) -> Self {
        Self {
            customer: customer.into(),
            region: region.into(),
            machine_id: machine_id.into(),
        }
    }
}

fn fnv1a_32(state: u32, bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(state, |hash, byte| (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME))
}

/// Deterministic 0..100 bucket of a machine for one release version.
pub fn bucket(machine_id: &str, version: &str) -> u32 {
    let hash = fnv1a_32(FNV_OFFSET_BASIS, machine_id.as_bytes());
    let hash = fnv1a_32(hash, b":");
    let hash = fnv1a_32(hash, version.as_bytes());
    hash % BUCKETS
}

/// Decide whether a client may receive the release with the given version.
///
/// `version` must be the release's version string as written in the config,
/// so buckets stay stable across restarts and server instances.
pub fn is_eligible(rule: Option<&RolloutRule>, identity: &ClientIdentity, version: &str) -> bool {
    let Some(rule) = rule else {
        return true;
    };

    if !identity.customer.is_empty() && rule.customers.contains(&identity.customer) {
        return true;
    }

    if !identity.region.is_empty() && rule.regions.contains(&identity.region) {
        return true;
    }

    match rule.percentage {
        Some(percentage) if percentage > 0 => bucket(&identity.machine_id, version) < percentage,
        _ => false,
    }
}
