//! Integration tests for the form lifecycle
//!
//! Submission → tier actions → summaries, against a real SQLite file.

mod common;

use common::{register, setup, submit, ADMIN_TOKEN, HIGHER_TOKEN, SUPER_TOKEN};
use formgate_core::{AggregateState, Tier};
use formgate_persistence::FormRepo;
use formgate_workflow::{
    AccountService, FormService, NewSubmission, StageActionProcessor, SummaryScope,
    SummaryService, TierActionRequest, WorkflowError,
};

/// Test: register → submit → three approvals → approved
#[tokio::test]
async fn test_full_approval_flow() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000001").await;
    let form_id = submit(&ctx, owner, "recommendation_letter").await;
    let stage = StageActionProcessor::new(&ctx);

    let outcome = stage
        .act_with_token(
            Some(ADMIN_TOKEN),
            form_id,
            TierActionRequest::new("approve")
                .with_last_action("documents verified")
                .with_next_step("higher official review"),
        )
        .await
        .unwrap();
    assert_eq!(outcome.tier, Tier::Admin);
    assert_eq!(outcome.state, AggregateState::Pending);

    stage
        .act_with_token(Some(HIGHER_TOKEN), form_id, TierActionRequest::new("finalized"))
        .await
        .unwrap();
    let outcome = stage
        .act_with_token(Some(SUPER_TOKEN), form_id, TierActionRequest::new("Finalized"))
        .await
        .unwrap();

    assert_eq!(outcome.state, AggregateState::Approved);
    assert!(Tier::ALL.iter().all(|t| outcome.form.tier(*t).decided));
    assert_eq!(outcome.form.last_action_done.as_deref(), Some("documents verified"));
    assert_eq!(outcome.form.next_step.as_deref(), Some("higher official review"));
    assert_eq!(outcome.form.owner_phone, "9841000001");
}

/// Test: Admin cancels "incomplete", SuperOfficial approval reverses it
#[tokio::test]
async fn test_approval_clears_cancellation_from_other_tier() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000002").await;
    let form_id = submit(&ctx, owner, "birth").await;
    let stage = StageActionProcessor::new(&ctx);

    stage
        .apply_tier_action(form_id, Tier::HigherOfficial, TierActionRequest::new("approve"))
        .await
        .unwrap();
    stage
        .apply_tier_action(form_id, Tier::Admin, TierActionRequest::new("approve"))
        .await
        .unwrap();
    let cancelled = stage
        .apply_tier_action(
            form_id,
            Tier::SuperOfficial,
            TierActionRequest::new("cancel").with_reason("incomplete"),
        )
        .await
        .unwrap();
    assert_eq!(cancelled.state, AggregateState::Cancelled);
    assert_eq!(cancelled.form.cancellation.reason.as_deref(), Some("incomplete"));

    // Admin cancels too, then SuperOfficial approves: cancellation cleared, Admin still undecided
    stage
        .apply_tier_action(
            form_id,
            Tier::Admin,
            TierActionRequest::new("cancel").with_reason("incomplete"),
        )
        .await
        .unwrap();
    let outcome = stage
        .apply_tier_action(form_id, Tier::SuperOfficial, TierActionRequest::new("approve"))
        .await
        .unwrap();
    assert!(!outcome.form.cancellation.cancelled);
    assert_eq!(outcome.form.cancellation.reason, None);
    assert_eq!(outcome.state, AggregateState::Pending);

    let outcome = stage
        .apply_tier_action(form_id, Tier::Admin, TierActionRequest::new("approve"))
        .await
        .unwrap();
    assert_eq!(outcome.state, AggregateState::Approved);
}

/// Test: approve then cancel by the same tier resets its decided flag
#[tokio::test]
async fn test_cancel_after_approve_same_tier() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000003").await;
    let form_id = submit(&ctx, owner, "birth").await;
    let stage = StageActionProcessor::new(&ctx);

    let approved = stage
        .apply_tier_action(form_id, Tier::Admin, TierActionRequest::new("approve"))
        .await
        .unwrap();
    let first_at = approved.form.admin.decided_at.unwrap();
    assert!(approved.form.admin.decided);

    let cancelled = stage
        .apply_tier_action(
            form_id,
            Tier::Admin,
            TierActionRequest::new("cancel").with_reason("duplicate"),
        )
        .await
        .unwrap();

    assert!(!cancelled.form.admin.decided);
    assert!(cancelled.form.admin.decided_at.unwrap() >= first_at);
    assert!(cancelled.form.cancellation.cancelled);
    assert_eq!(cancelled.form.cancellation.reason.as_deref(), Some("duplicate"));
    assert_eq!(cancelled.state, AggregateState::Cancelled);

    // Other tiers were never touched
    assert!(cancelled.form.higher_official.decided_at.is_none());
    assert!(cancelled.form.super_official.decided_at.is_none());
}

#[tokio::test]
async fn test_cancel_without_reason_uses_tier_default() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000004").await;
    let form_id = submit(&ctx, owner, "birth").await;

    let outcome = StageActionProcessor::new(&ctx)
        .apply_tier_action(form_id, Tier::HigherOfficial, TierActionRequest::new("cancelled"))
        .await
        .unwrap();
    assert_eq!(
        outcome.form.cancellation.reason.as_deref(),
        Some("Cancelled by higher official")
    );
}

#[tokio::test]
async fn test_cancel_reason_is_stored_as_given() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000014").await;
    let form_id = submit(&ctx, owner, "birth").await;

    StageActionProcessor::new(&ctx)
        .apply_tier_action(
            form_id,
            Tier::Admin,
            TierActionRequest::new("cancel").with_reason("  duplicate "),
        )
        .await
        .unwrap();

    let view = FormService::new(&ctx).get(form_id).await.unwrap();
    assert_eq!(view.cancellation.reason.as_deref(), Some("  duplicate "));
}

#[tokio::test]
async fn test_submit_for_unknown_owner_creates_nothing() {
    let (_dir, ctx) = setup().await;
    let err = FormService::new(&ctx)
        .submit(404, NewSubmission::new(Some("birth".to_string()), common::payload()))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(FormRepo::count(ctx.pool()).await.unwrap(), 0);

    let err = FormService::new(&ctx)
        .submit_by_phone("0000000000", NewSubmission::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_action_on_missing_form_is_not_found() {
    let (_dir, ctx) = setup().await;
    let err = StageActionProcessor::new(&ctx)
        .apply_tier_action(12345, Tier::Admin, TierActionRequest::new("approve"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invalid_decision_mutates_nothing() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000005").await;
    let form_id = submit(&ctx, owner, "birth").await;
    let before = FormService::new(&ctx).get(form_id).await.unwrap();

    let stage = StageActionProcessor::new(&ctx);
    let err = stage
        .apply_tier_action(
            form_id,
            Tier::Admin,
            TierActionRequest::new("escalate").with_last_action("should not be written"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidAction(_)));

    let err = stage
        .apply_tier_action(form_id, Tier::Admin, TierActionRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidAction(_)));

    let after = FormService::new(&ctx).get(form_id).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_bad_token_is_unauthorized_and_mutates_nothing() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000006").await;
    let form_id = submit(&ctx, owner, "birth").await;
    let before = FormService::new(&ctx).get(form_id).await.unwrap();
    let stage = StageActionProcessor::new(&ctx);

    for token in [None, Some(""), Some("guess")] {
        let err = stage
            .act_with_token(token, form_id, TierActionRequest::new("approve"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    // Unauthorized wins over a missing form: the gate runs first
    let err = stage
        .act_with_token(Some("guess"), 999, TierActionRequest::new("approve"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    assert_eq!(FormService::new(&ctx).get(form_id).await.unwrap(), before);
}

#[tokio::test]
async fn test_list_by_owner_keeps_creation_order() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000007").await;
    let other = register(&ctx, "9841000008").await;

    let first = submit(&ctx, owner, "birth").await;
    let _foreign = submit(&ctx, other, "birth").await;
    let second = submit(&ctx, owner, "birth").await;
    let third = submit(&ctx, owner, "land").await;

    let stage = StageActionProcessor::new(&ctx);
    for form_id in [third, first, first, second] {
        stage
            .apply_tier_action(form_id, Tier::SuperOfficial, TierActionRequest::new("approve"))
            .await
            .unwrap();
    }

    let forms = FormService::new(&ctx).list_by_owner(owner).await.unwrap();
    let ids: Vec<_> = forms.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![first, second, third]);

    // Resubmitting the same category made separate records
    assert_eq!(forms.iter().filter(|f| f.form_type.as_deref() == Some("birth")).count(), 2);

    let err = FormService::new(&ctx).list_by_owner(999).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_payload_returned_verbatim() {
    let (_dir, ctx) = setup().await;
    let owner = register(&ctx, "9841000009").await;
    let form_id = submit(&ctx, owner, "birth").await;

    let view = FormService::new(&ctx).get(form_id).await.unwrap();
    assert_eq!(view.form_data, common::payload());
    let keys: Vec<_> = view.form_data.keys().cloned().collect();
    assert_eq!(keys, vec!["applicant", "ward", "documents", "urgent"]);
}

#[tokio::test]
async fn test_summaries_by_scope() {
    let (_dir, ctx) = setup().await;
    let alice = register(&ctx, "9841000010").await;
    let bob = register(&ctx, "9841000011").await;

    let approved = submit(&ctx, alice, "birth").await;
    let cancelled = submit(&ctx, alice, "land").await;
    let _pending = submit(&ctx, alice, "tax").await;
    let _bob_pending = submit(&ctx, bob, "birth").await;

    let stage = StageActionProcessor::new(&ctx);
    for tier in Tier::ALL {
        stage
            .apply_tier_action(approved, tier, TierActionRequest::new("approve"))
            .await
            .unwrap();
    }
    // Cancelled even though all tiers had approved first
    for tier in Tier::ALL {
        stage
            .apply_tier_action(cancelled, tier, TierActionRequest::new("approve"))
            .await
            .unwrap();
    }
    stage
        .apply_tier_action(cancelled, Tier::Admin, TierActionRequest::new("cancel"))
        .await
        .unwrap();

    let summaries = SummaryService::new(&ctx);

    let all = summaries.all().await.unwrap();
    assert_eq!(all.counts.pending, 2);
    assert_eq!(all.counts.approved, 1);
    assert_eq!(all.counts.cancelled, 1);
    assert_eq!(all.forms.len(), 4);

    let alice_summary = summaries.summarize(SummaryScope::Owner(alice)).await.unwrap();
    assert_eq!(alice_summary.counts.total(), 3);
    assert_eq!(alice_summary.counts.pending, 1);

    let by_phone = summaries
        .summarize(SummaryScope::OwnerPhone("9841000011".to_string()))
        .await
        .unwrap();
    assert_eq!(by_phone.forms.len(), 1);
    assert_eq!(by_phone.forms[0].owner_name, "Hari Bahadur");

    let err = summaries
        .summarize(SummaryScope::OwnerPhone("nobody".to_string()))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    let err = summaries.summarize(SummaryScope::Owner(999)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_dashboard_requires_tier_token() {
    let (_dir, ctx) = setup().await;
    let summaries = SummaryService::new(&ctx);

    assert!(summaries.dashboard(Some(HIGHER_TOKEN)).await.is_ok());
    assert!(summaries.dashboard(None).await.unwrap_err().is_unauthorized());
    assert!(summaries.dashboard(Some("x")).await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn test_register_and_login() {
    let (_dir, ctx) = setup().await;
    let accounts = AccountService::new(&ctx);

    let account = accounts.register("Gita", "9841000012", "s3cret").await.unwrap();
    assert_eq!(accounts.login("9841000012", "s3cret").await.unwrap(), account);
    assert_eq!(accounts.find_by_phone("9841000012").await.unwrap().id, account.id);
    assert_eq!(accounts.get(account.id).await.unwrap(), account);
    assert!(accounts.get(account.id + 100).await.unwrap_err().is_not_found());

    let err = accounts.register("Gita again", "9841000012", "x").await.unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadyRegistered(_)));

    assert!(accounts.login("9841000012", "wrong").await.unwrap_err().is_unauthorized());
    assert!(accounts.login("0000", "s3cret").await.unwrap_err().is_unauthorized());

    let err = accounts.register("", "9841000013", "x").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
}
