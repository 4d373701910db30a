// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod tests {
    use crate::config::{Config, DEFAULT_METRICS_BIND_ADDRESS};
    use clap::Parser;

    #[test]
    fn test_default_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.metrics_bind_address, DEFAULT_METRICS_BIND_ADDRESS);
        assert_eq!(config.requeue_ready_secs, 300);
        assert_eq!(config.requeue_not_ready_secs, 15);
        assert_eq!(config.error_requeue_secs, 30);
        assert_eq!(config.default_ttl, 60);
        assert_eq!(config.default_cname_ttl, 300);
        assert_eq!(config.default_weight, 120);
    }

    #[test]
    fn test_parse_overrides() {
        let parsed = Config::try_parse_from([
            "gatewaydns",
            "--default-weight",
            "200",
            "--default-geo",
            "IE",
            "--metrics-bind-address",
            "127.0.0.1:9090",
            "--requeue-ready-secs",
            "60",
        ])
        .unwrap();
        assert_eq!(parsed.default_weight, 200);
        assert_eq!(parsed.default_geo.as_deref(), Some("IE"));
        assert_eq!(parsed.metrics_bind_address, "127.0.0.1:9090");
        assert_eq!(parsed.requeue_ready_secs, 60);
    }

    #[test]
    fn test_rejects_non_numeric_weight() {
        assert!(Config::try_parse_from(["gatewaydns", "--default-weight", "heavy"]).is_err());
    }
}
