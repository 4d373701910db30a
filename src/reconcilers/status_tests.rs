// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status.rs`

#[cfg(test)]
mod tests {
    use crate::crd::{Condition, DNSPolicyStatus};
    use crate::reconcilers::dnspolicy::fixtures::policy;
    use crate::reconcilers::status::{
        conditions_equal, create_condition, find_condition, remove_condition,
        update_condition_in_memory, DNSPolicyStatusUpdater,
    };
    use crate::status_reasons::{
        CONDITION_TYPE_READY, REASON_GATEWAY_DNS_ENABLED, REASON_TARGET_NOT_FOUND, STATUS_FALSE,
        STATUS_TRUE,
    };

    #[test]
    fn test_create_condition_basic() {
        let condition = create_condition(
            CONDITION_TYPE_READY,
            STATUS_TRUE,
            REASON_GATEWAY_DNS_ENABLED,
            "ok",
            Some(3),
        );

        assert_eq!(condition.r#type, CONDITION_TYPE_READY);
        assert_eq!(condition.status, STATUS_TRUE);
        assert_eq!(condition.reason.as_deref(), Some(REASON_GATEWAY_DNS_ENABLED));
        assert_eq!(condition.observed_generation, Some(3));
        let timestamp = condition.last_transition_time.unwrap();
        assert!(timestamp.contains('T'));
    }

    #[test]
    fn test_update_condition_preserves_transition_time_when_status_unchanged() {
        let mut conditions = vec![Condition {
            last_transition_time: Some("2020-01-01T00:00:00+00:00".into()),
            ..create_condition("Ready", STATUS_FALSE, "A", "first", Some(1))
        }];

        let changed = update_condition_in_memory(
            &mut conditions,
            create_condition("Ready", STATUS_FALSE, "B", "second", Some(1)),
        );

        assert!(changed);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].reason.as_deref(), Some("B"));
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2020-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_update_condition_resets_transition_time_on_flip() {
        let mut conditions = vec![Condition {
            last_transition_time: Some("2020-01-01T00:00:00+00:00".into()),
            ..create_condition("Ready", STATUS_FALSE, "A", "m", Some(1))
        }];

        update_condition_in_memory(
            &mut conditions,
            create_condition("Ready", STATUS_TRUE, "A", "m", Some(1)),
        );

        assert_ne!(
            conditions[0].last_transition_time.as_deref(),
            Some("2020-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_update_condition_reports_no_change() {
        let mut conditions = vec![create_condition("Ready", STATUS_TRUE, "A", "m", Some(2))];
        let changed = update_condition_in_memory(
            &mut conditions,
            create_condition("Ready", STATUS_TRUE, "A", "m", Some(2)),
        );
        assert!(!changed);
    }

    #[test]
    fn test_observed_generation_counts_as_change() {
        let mut conditions = vec![create_condition("Ready", STATUS_TRUE, "A", "m", Some(2))];
        assert!(update_condition_in_memory(
            &mut conditions,
            create_condition("Ready", STATUS_TRUE, "A", "m", Some(3)),
        ));
    }

    #[test]
    fn test_find_and_remove_condition() {
        let mut conditions = vec![
            create_condition("Ready", STATUS_TRUE, "A", "m", None),
            create_condition("DNSPolicyAffected", STATUS_TRUE, "Accepted", "m", None),
        ];
        assert!(find_condition(&conditions, "DNSPolicyAffected").is_some());
        assert!(remove_condition(&mut conditions, "DNSPolicyAffected"));
        assert!(find_condition(&conditions, "DNSPolicyAffected").is_none());
        assert!(!remove_condition(&mut conditions, "DNSPolicyAffected"));
    }

    #[test]
    fn test_conditions_equal_ignores_timestamps_and_order() {
        let a = vec![
            create_condition("Ready", STATUS_TRUE, "A", "m", None),
            create_condition("Other", STATUS_FALSE, "B", "n", None),
        ];
        let mut b = vec![
            Condition {
                last_transition_time: Some("x".into()),
                ..a[1].clone()
            },
            a[0].clone(),
        ];
        assert!(conditions_equal(&a, &b));
        b[0].message = Some("changed".into());
        assert!(!conditions_equal(&a, &b));
    }

    #[test]
    fn test_updater_detects_new_status() {
        let mut p = policy("p", "ns", "gw");
        p.metadata.generation = Some(1);
        let mut updater = DNSPolicyStatusUpdater::new(&p);
        assert!(!updater.has_changes());

        updater.set_ready(false, REASON_TARGET_NOT_FOUND, "Gateway not found");
        assert!(updater.has_changes());
        assert_eq!(updater.conditions()[0].observed_generation, Some(1));
    }

    #[test]
    fn test_updater_is_quiet_when_converged() {
        let mut p = policy("p", "ns", "gw");
        p.metadata.generation = Some(4);
        p.status = Some(DNSPolicyStatus {
            conditions: vec![create_condition(
                CONDITION_TYPE_READY,
                STATUS_TRUE,
                REASON_GATEWAY_DNS_ENABLED,
                "DNS enabled for Gateway ns/gw",
                Some(4),
            )],
            observed_generation: Some(4),
        });

        let mut updater = DNSPolicyStatusUpdater::new(&p);
        updater.set_ready(true, REASON_GATEWAY_DNS_ENABLED, "DNS enabled for Gateway ns/gw");
        assert!(!updater.has_changes());
    }
}
