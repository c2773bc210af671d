mod fixtures;

use std::sync::Arc;

use fixtures::*;
use revoluzion::host::VerifiedProof;
use revoluzion::workflows::{
    PetitionError, PreconditionError, SupportOutcome, SupportPetitionWorkflow, SupportStatus,
    VerificationError,
};

fn workflow(
    registry: &Arc<FakeRegistry>,
    verifier: &Arc<FakeVerifier>,
    host: &Arc<FakeHost>,
) -> SupportPetitionWorkflow {
    SupportPetitionWorkflow::new(
        registry.clone(),
        verifier.clone(),
        host.clone(),
        settings(),
    )
}

#[tokio::test]
async fn test_support_sends_proof_and_refreshes_petition() {
    let registry = Arc::new(FakeRegistry::new().with_petitions(5, &[]));
    let verifier = Arc::new(FakeVerifier::succeeding());
    let host = Arc::new(FakeHost::succeeding("0xtx-support"));
    let workflow = workflow(&registry, &verifier, &host);
    host.watch_flag(workflow.in_flight_flag());

    let target = petition(5, 15);
    let outcome = workflow.support(Some(&target), Some(wallet())).await.unwrap();

    assert_eq!(
        outcome,
        SupportOutcome::Supported {
            transaction_id: "0xtx-support".to_string()
        }
    );
    assert_eq!(host.flag_during_send(), vec![true]);
    assert!(!workflow.is_supporting());

    let state = workflow.state();
    assert_eq!(state.status, SupportStatus::Success);
    assert_eq!(state.transaction_id.as_deref(), Some("0xtx-support"));
    assert_eq!(*registry.forgotten.lock().unwrap(), vec![5]);

    let requests = verifier.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].action, "support-action");
    assert_eq!(requests[0].signal, wallet().to_string());

    let sent = host.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].permit2.is_empty());
    let call = &sent[0].transaction[0];
    assert_eq!(call.address, fixtures::registry());
    assert_eq!(call.function_name, "supportPetition");
    assert_eq!(call.args[0], "5");
    assert_eq!(call.args[1], "10");
    assert_eq!(call.args[2], "11");
    assert_eq!(call.args[3][0], "100");
    assert_eq!(call.args[3][7], "107");
}

#[tokio::test]
async fn test_failed_send_clears_flag_and_keeps_payload() {
    let registry = Arc::new(FakeRegistry::new());
    let verifier = Arc::new(FakeVerifier::succeeding());
    let host = Arc::new(FakeHost::failing("user_rejected"));
    let workflow = workflow(&registry, &verifier, &host);
    host.watch_flag(workflow.in_flight_flag());

    let err = workflow
        .support(Some(&petition(2, 0)), Some(wallet()))
        .await
        .unwrap_err();

    assert!(matches!(err, PetitionError::Submission(ref e) if e.code == "user_rejected"));
    assert_eq!(host.flag_during_send(), vec![true]);
    assert!(!workflow.is_supporting());

    let state = workflow.state();
    assert_eq!(state.status, SupportStatus::Error);
    let message = state.message.unwrap();
    assert!(message.contains("user_rejected"), "{message}");
    assert!(registry.forgotten.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_host_clears_flag() {
    let registry = Arc::new(FakeRegistry::new());
    let verifier = Arc::new(FakeVerifier::succeeding());
    let host = Arc::new(FakeHost::unreachable());
    let workflow = workflow(&registry, &verifier, &host);

    let err = workflow
        .support(Some(&petition(2, 0)), Some(wallet()))
        .await
        .unwrap_err();

    assert!(matches!(err, PetitionError::Unexpected(_)));
    assert!(!workflow.is_supporting());
    assert_eq!(workflow.state().status, SupportStatus::Error);
}

#[tokio::test]
async fn test_verification_error_is_shown_without_sending() {
    let registry = Arc::new(FakeRegistry::new());
    let verifier = Arc::new(FakeVerifier::rejecting("max_verifications_reached"));
    let host = Arc::new(FakeHost::succeeding("0xtx"));
    let workflow = workflow(&registry, &verifier, &host);

    let err = workflow
        .support(Some(&petition(4, 0)), Some(wallet()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PetitionError::Verification(VerificationError::Rejected { .. })
    ));
    assert!(host.sent().is_empty());

    let state = workflow.state();
    assert_eq!(state.status, SupportStatus::Error);
    assert!(state.message.unwrap().contains("max_verifications_reached"));
    assert!(!workflow.is_supporting());
}

#[tokio::test]
async fn test_malformed_proof_is_verification_error() {
    let registry = Arc::new(FakeRegistry::new());
    let proof = VerifiedProof {
        proof: "0x1234".to_string(),
        ..valid_proof()
    };
    let verifier = Arc::new(FakeVerifier::with_proof(proof));
    let host = Arc::new(FakeHost::succeeding("0xtx"));
    let workflow = workflow(&registry, &verifier, &host);

    let err = workflow
        .support(Some(&petition(4, 0)), Some(wallet()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PetitionError::Verification(VerificationError::MalformedProof(_))
    ));
    assert!(host.sent().is_empty());
    assert_eq!(workflow.state().status, SupportStatus::Error);
}

#[tokio::test]
async fn test_nothing_loaded_is_skipped() {
    let registry = Arc::new(FakeRegistry::new());
    let verifier = Arc::new(FakeVerifier::succeeding());
    let host = Arc::new(FakeHost::succeeding("0xtx"));
    let workflow = workflow(&registry, &verifier, &host);

    let outcome = workflow.support(None, Some(wallet())).await.unwrap();

    assert_eq!(outcome, SupportOutcome::Skipped);
    assert!(verifier.requests().is_empty());
    assert_eq!(workflow.state().status, SupportStatus::Idle);
}

#[tokio::test]
async fn test_missing_wallet_is_precondition_error() {
    let registry = Arc::new(FakeRegistry::new());
    let verifier = Arc::new(FakeVerifier::succeeding());
    let host = Arc::new(FakeHost::succeeding("0xtx"));
    let workflow = workflow(&registry, &verifier, &host);

    let err = workflow
        .support(Some(&petition(1, 0)), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PetitionError::Precondition(PreconditionError::WalletMissing)
    ));
    assert!(verifier.requests().is_empty());
    assert!(!workflow.is_supporting());
}

#[tokio::test]
async fn test_second_support_while_first_in_flight_is_skipped() {
    let registry = Arc::new(FakeRegistry::new().with_petitions(5, &[]));
    let verifier = Arc::new(FakeVerifier::succeeding());
    let host = Arc::new(FakeHost::succeeding("0xtx-first").gated());
    let workflow = Arc::new(workflow(&registry, &verifier, &host));

    let first = tokio::spawn({
        let workflow = workflow.clone();
        async move {
            let target = petition(5, 0);
            workflow.support(Some(&target), Some(wallet())).await
        }
    });

    host.wait_until_sending().await;
    assert!(workflow.is_supporting());

    let second = workflow
        .support(Some(&petition(5, 0)), Some(wallet()))
        .await
        .unwrap();
    assert_eq!(second, SupportOutcome::Skipped);
    assert_eq!(verifier.requests().len(), 1);
    assert_eq!(host.sent().len(), 1);

    host.release();
    let outcome = first.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        SupportOutcome::Supported {
            transaction_id: "0xtx-first".to_string()
        }
    );
    assert!(!workflow.is_supporting());
}
