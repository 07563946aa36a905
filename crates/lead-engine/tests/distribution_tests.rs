//! Integration tests for the distribution engine.
//!
//! Every test runs against its own in-memory store, seeds operators,
//! sources and assignments through the same store operations the HTTP
//! layer uses, and drives distribution through the engine.

use anyhow::Result;
use lead_engine::prelude::*;

async fn create_test_engine() -> Result<DistributionEngine> {
    let database = Database::connect_in_memory().await?;
    Ok(DistributionEngine::new(DistributionConfig::default(), database))
}

#[tokio::test]
async fn test_resolve_lead_is_idempotent() {
    let engine = create_test_engine().await.expect("engine creation failed");

    let first = engine
        .resolve_lead("ext-42", Some("a@example.com"), Some("+100"))
        .await
        .expect("first resolve should succeed");
    let second = engine
        .resolve_lead("ext-42", Some("other@example.com"), None)
        .await
        .expect("second resolve should succeed");

    assert_eq!(first.id, second.id);
    // First write wins: the second event's email must not overwrite.
    assert_eq!(second.email, Some("a@example.com".to_string()));
    assert_eq!(second.phone, Some("+100".to_string()));
}

#[tokio::test]
async fn test_resolve_lead_rejects_empty_external_id() {
    let engine = create_test_engine().await.expect("engine creation failed");

    let result = engine.resolve_lead("", None, None).await;
    assert!(matches!(result, Err(DistributionError::InvalidInput(_))));
}

#[tokio::test]
async fn test_contact_routed_to_single_eligible_operator() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let operator = db.create_operator("alice", true, 5).await.expect("operator");
    let source = db.create_source("landing-page").await.expect("source");
    db.create_assignment(operator.id, source.id, 1).await.expect("assignment");

    let contact = engine
        .create_contact(NewContact {
            external_id: "lead-1".to_string(),
            source_id: source.id,
            message: Some("please call me".to_string()),
            email: Some("lead@example.com".to_string()),
            phone: None,
        })
        .await
        .expect("distribution should succeed");

    assert_eq!(contact.operator_id, Some(operator.id));
    assert_eq!(contact.source_id, source.id);
    assert_eq!(contact.status, "new");
    assert_eq!(contact.message, Some("please call me".to_string()));

    let operator = db
        .get_operator(operator.id)
        .await
        .expect("query failed")
        .expect("operator should exist");
    assert_eq!(operator.current_load, 1);
}

#[tokio::test]
async fn test_contact_unassigned_when_no_operators_qualify() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    // An operator exists but serves no source.
    let bystander = db.create_operator("bob", true, 5).await.expect("operator");
    let source = db.create_source("cold-calls").await.expect("source");

    let contact = engine
        .create_contact(NewContact {
            external_id: "lead-2".to_string(),
            source_id: source.id,
            message: None,
            email: None,
            phone: None,
        })
        .await
        .expect("distribution should succeed even with nobody eligible");

    assert_eq!(contact.operator_id, None);

    let bystander = db
        .get_operator(bystander.id)
        .await
        .expect("query failed")
        .expect("operator should exist");
    assert_eq!(bystander.current_load, 0, "nobody's load may change");
}

#[tokio::test]
async fn test_unknown_source_treated_as_no_candidates() {
    let engine = create_test_engine().await.expect("engine creation failed");

    let contact = engine
        .create_contact(NewContact {
            external_id: "lead-3".to_string(),
            source_id: 9_999,
            message: None,
            email: None,
            phone: None,
        })
        .await
        .expect("unknown source is not an error on the distribution path");

    assert_eq!(contact.operator_id, None);
}

#[tokio::test]
async fn test_operator_at_capacity_is_excluded() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let full = db.create_operator("full", true, 1).await.expect("operator");
    let open = db.create_operator("open", true, 10).await.expect("operator");

    // Fill `full` through a source only it serves.
    let filler = db.create_source("filler").await.expect("source");
    db.create_assignment(full.id, filler.id, 1).await.expect("assignment");
    let filled = engine
        .create_contact(NewContact {
            external_id: "lead-fill".to_string(),
            source_id: filler.id,
            message: None,
            email: None,
            phone: None,
        })
        .await
        .expect("filling contact should succeed");
    assert_eq!(filled.operator_id, Some(full.id));

    let full_now = db
        .get_operator(full.id)
        .await
        .expect("query failed")
        .expect("operator should exist");
    assert!(!full_now.has_capacity());

    // Both serve the shared source, but only `open` has capacity left.
    let shared = db.create_source("shared").await.expect("source");
    db.create_assignment(full.id, shared.id, 1).await.expect("assignment");
    db.create_assignment(open.id, shared.id, 1).await.expect("assignment");

    let eligible = engine.list_eligible(shared.id).await.expect("eligibility query");
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].operator_id, open.id);
}

#[tokio::test]
async fn test_inactive_operator_is_excluded() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let operator = db.create_operator("away", true, 5).await.expect("operator");
    let source = db.create_source("webinar").await.expect("source");
    db.create_assignment(operator.id, source.id, 1).await.expect("assignment");

    db.update_operator(operator.id, None, Some(false), None)
        .await
        .expect("deactivation should succeed");

    let eligible = engine.list_eligible(source.id).await.expect("eligibility query");
    assert!(eligible.is_empty());

    let contact = engine
        .create_contact(NewContact {
            external_id: "lead-4".to_string(),
            source_id: source.id,
            message: None,
            email: None,
            phone: None,
        })
        .await
        .expect("distribution should succeed");
    assert_eq!(contact.operator_id, None);
}

#[tokio::test]
async fn test_weight_zero_assignment_is_never_selected() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let muted = db.create_operator("muted", true, 100).await.expect("operator");
    let active = db.create_operator("active", true, 100).await.expect("operator");
    let source = db.create_source("ads").await.expect("source");
    db.create_assignment(muted.id, source.id, 0).await.expect("assignment");
    db.create_assignment(active.id, source.id, 5).await.expect("assignment");

    for i in 0..20 {
        let contact = engine
            .create_contact(NewContact {
                external_id: format!("lead-w0-{}", i),
                source_id: source.id,
                message: None,
                email: None,
                phone: None,
            })
            .await
            .expect("distribution should succeed");
        assert_eq!(contact.operator_id, Some(active.id));
    }

    let muted = db
        .get_operator(muted.id)
        .await
        .expect("query failed")
        .expect("operator should exist");
    assert_eq!(muted.current_load, 0);
}

#[tokio::test]
async fn test_capacity_exhaustion_leaves_later_contacts_unassigned() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let operator = db.create_operator("carol", true, 2).await.expect("operator");
    let source = db.create_source("newsletter").await.expect("source");
    db.create_assignment(operator.id, source.id, 3).await.expect("assignment");

    let mut assigned = 0;
    let mut unassigned = 0;
    for i in 0..3 {
        let contact = engine
            .create_contact(NewContact {
                external_id: format!("lead-cap-{}", i),
                source_id: source.id,
                message: None,
                email: None,
                phone: None,
            })
            .await
            .expect("distribution should succeed");
        match contact.operator_id {
            Some(_) => assigned += 1,
            None => unassigned += 1,
        }
    }

    assert_eq!(assigned, 2);
    assert_eq!(unassigned, 1);

    let operator = db
        .get_operator(operator.id)
        .await
        .expect("query failed")
        .expect("operator should exist");
    assert_eq!(operator.current_load, 2);
    assert_eq!(operator.current_load, operator.max_load);
}

#[tokio::test]
async fn test_last_slot_goes_to_exactly_one_concurrent_contact() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let operator = db.create_operator("dave", true, 1).await.expect("operator");
    let source = db.create_source("chat-widget").await.expect("source");
    db.create_assignment(operator.id, source.id, 1).await.expect("assignment");

    let left = engine.clone();
    let right = engine.clone();
    let source_id = source.id;

    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            left.create_contact(NewContact {
                external_id: "lead-race-a".to_string(),
                source_id,
                message: None,
                email: None,
                phone: None,
            })
            .await
        }),
        tokio::spawn(async move {
            right.create_contact(NewContact {
                external_id: "lead-race-b".to_string(),
                source_id,
                message: None,
                email: None,
                phone: None,
            })
            .await
        }),
    );

    let a = a.expect("task panicked").expect("distribution should succeed");
    let b = b.expect("task panicked").expect("distribution should succeed");

    let winners = [a.operator_id, b.operator_id]
        .iter()
        .filter(|op| op.is_some())
        .count();
    assert_eq!(winners, 1, "exactly one contact may win the last slot");

    let operator = db
        .get_operator(operator.id)
        .await
        .expect("query failed")
        .expect("operator should exist");
    assert_eq!(operator.current_load, 1, "load must not exceed max_load");
}

#[tokio::test]
async fn test_assignment_creation_validates_referents() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let source = db.create_source("valid").await.expect("source");
    let result = db.create_assignment(12_345, source.id, 1).await;
    assert!(matches!(result, Err(DistributionError::NotFound(_))));

    let operator = db.create_operator("erin", true, 5).await.expect("operator");
    let result = db.create_assignment(operator.id, 54_321, 1).await;
    assert!(matches!(result, Err(DistributionError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_source_name_is_a_conflict() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    db.create_source("unique-name").await.expect("first create should succeed");
    let result = db.create_source("unique-name").await;
    assert!(matches!(result, Err(DistributionError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_timestamps_are_persistence_time() {
    let engine = create_test_engine().await.expect("engine creation failed");

    let before = Utc::now() - chrono::Duration::seconds(1);
    let lead = engine
        .resolve_lead("ext-ts", None, None)
        .await
        .expect("resolve should succeed");
    let after = Utc::now() + chrono::Duration::seconds(1);

    assert!(
        lead.created_at >= before && lead.created_at <= after,
        "created_at {} outside [{}, {}]",
        lead.created_at,
        before,
        after
    );
}

#[tokio::test]
async fn test_stats_reflect_distribution_outcomes() {
    let engine = create_test_engine().await.expect("engine creation failed");
    let db = engine.database();

    let operator = db.create_operator("frank", true, 1).await.expect("operator");
    let source = db.create_source("stats-source").await.expect("source");
    db.create_assignment(operator.id, source.id, 1).await.expect("assignment");

    for i in 0..2 {
        engine
            .create_contact(NewContact {
                external_id: format!("lead-stats-{}", i),
                source_id: source.id,
                message: None,
                email: None,
                phone: None,
            })
            .await
            .expect("distribution should succeed");
    }

    let stats = engine.stats().await.expect("stats query");
    assert_eq!(stats.total_operators, 1);
    assert_eq!(stats.active_operators, 1);
    assert_eq!(stats.available_operators, 0, "the single slot is consumed");
    assert_eq!(stats.total_leads, 2);
    assert_eq!(stats.total_contacts, 2);
    assert_eq!(stats.assigned_contacts, 1);
    assert_eq!(stats.unassigned_contacts, 1);
}
