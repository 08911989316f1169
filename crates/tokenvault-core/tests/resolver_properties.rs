//! Property-based tests for path resolution and TTL policy.

use std::time::Duration;

use proptest::prelude::*;
use tokenvault_core::{TokenConfig, path};

proptest! {
    #[test]
    fn resolution_is_deterministic_and_prefix_scoped(
        fingerprint in "[a-f0-9]{64}",
        key_path in "[a-zA-Z0-9_./-]{1,64}",
    ) {
        let key = path::secret_key(&fingerprint, &key_path).unwrap();
        prop_assert_eq!(&key, &path::secret_key(&fingerprint, &key_path).unwrap());
        prop_assert!(key.starts_with(&fingerprint), "revocation relies on the prefix");
        prop_assert_eq!(key, format!("{fingerprint}:secret:{key_path}"));
    }

    #[test]
    fn normalize_strips_at_most_one_separator(raw in "/{0,3}[a-z]{0,8}") {
        let normalized = path::normalize_key_path(&raw);
        prop_assert!(raw.len() - normalized.len() <= 1);
        prop_assert!(raw.ends_with(normalized));
    }

    #[test]
    fn granted_ttls_never_exceed_the_maximum(requested in proptest::option::of(0u64..10_000)) {
        let config = TokenConfig::default();
        if let Ok(granted) = config.grant(requested.map(Duration::from_secs)) {
            prop_assert!(granted > Duration::ZERO);
            prop_assert!(granted <= config.max_ttl);
        }
    }
}
