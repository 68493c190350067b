//! Property tests for host specifications.

use proptest::prelude::*;

use gitship::HostIdentity;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `user@host:port` parses back into its parts.
    #[test]
    fn property_full_spec_parses(
        user in "[a-z_][a-z0-9_-]{0,15}",
        host in "[a-z][a-z0-9.-]{0,30}",
        port in 1u16..,
    ) {
        let parsed = HostIdentity::parse(&format!("{user}@{host}:{port}"), "fallback", 22).unwrap();
        prop_assert_eq!(parsed.user(), user.as_str());
        prop_assert_eq!(parsed.host(), host.as_str());
        prop_assert_eq!(parsed.port(), port);
    }

    /// PROPERTY: parsing arbitrary input never panics.
    #[test]
    fn property_parse_never_panics(input in "(?s).{0,64}") {
        let _ = HostIdentity::parse(&input, "deploy", 22);
    }
}
