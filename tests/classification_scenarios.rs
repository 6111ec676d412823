use mail_threat_engine::{AnalyzeRequest, ClassificationLabel, Settings, ThreatClassifier};
use std::sync::Arc;
use std::thread;

fn classifier() -> ThreatClassifier {
    ThreatClassifier::new(Settings::default()).unwrap()
}

fn bank_phishing() -> AnalyzeRequest {
    AnalyzeRequest::new(
        "Urgent: Verify your account immediately",
        "Your account will be suspended. Click here to restore access.",
    )
    .with_urls(["https://account-verify.xyz/login"])
    .with_headers(
        Some("support@bank-secure.com"),
        Some("help@random-domain.net"),
    )
}

#[test]
fn test_bank_phishing_is_flagged() {
    let result = classifier().classify(&bank_phishing());

    assert_eq!(result.label, ClassificationLabel::Phishing);
    assert!(result.confidence >= 0.5);
    assert!((result.score - result.confidence * 15.0).abs() < 0.02);
    assert!(result.reasons.len() <= 5);
    assert!(result
        .reasons
        .iter()
        .any(|r| r.starts_with("Urgency language detected")));
    assert!(result
        .reasons
        .iter()
        .any(|r| r.contains("From/Reply-To domain mismatch")));
    assert_eq!(result.model_version, "1.1.0-heuristic");
}

#[test]
fn test_vague_subject_alone_stays_legit() {
    let result = classifier().classify(&AnalyzeRequest::new("Your document", ""));

    assert_eq!(result.label, ClassificationLabel::Legit);
    assert_eq!(result.confidence, 0.85);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.reasons, vec!["No suspicious patterns detected"]);
}

#[test]
fn test_empty_message_is_fully_confident_legit() {
    let result = classifier().classify(&AnalyzeRequest::new("", ""));

    assert_eq!(result.label, ClassificationLabel::Legit);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.reasons, vec!["No suspicious patterns detected"]);
}

#[test]
fn test_medium_phishing_score_is_fraud() {
    let request = AnalyzeRequest::new("Action required", "Please click here to continue.");
    let result = classifier().classify(&request);

    assert_eq!(result.label, ClassificationLabel::Fraud);
    assert_eq!(result.confidence, 0.4);
    assert_eq!(result.score, 4.8);
    assert_eq!(
        result.reasons,
        vec![
            "Urgency language detected (1 patterns)",
            "Suspicious phrases detected (1 patterns)",
            "Spam phrases detected (1 patterns)",
        ]
    );
}

#[test]
fn test_signals_summing_to_phishing_threshold_are_phishing() {
    let request = AnalyzeRequest::new("Urgent", "").with_headers(Some("info@xkq.com"), None);
    let classifier = classifier();

    let aggregate = classifier.aggregate(&request);
    assert_eq!(aggregate.phishing_score, 0.5);
    assert_eq!(
        aggregate.reasons,
        vec![
            "Urgency language detected (1 patterns)",
            "Single-word alarm subject line",
            "Sender domain base is unusually short: xkq",
        ]
    );

    let result = classifier.classify(&request);
    assert_eq!(result.label, ClassificationLabel::Phishing);
    assert_eq!(result.confidence, 0.5);
    assert_eq!(result.score, 7.5);
}

#[test]
fn test_bulk_promotion_is_spam() {
    let request = AnalyzeRequest::new(
        "Limited time offer",
        "Buy now and act now! Click below to unsubscribe.",
    );
    let result = classifier().classify(&request);

    assert_eq!(result.label, ClassificationLabel::Spam);
    assert_eq!(result.confidence, 0.5);
    assert_eq!(result.score, 4.0);
    assert!(result
        .reasons
        .iter()
        .any(|r| r == "Spam phrases detected (4 patterns)"));
}

#[test]
fn test_pdf_with_links_contributes_but_alone_is_legit() {
    let classifier = classifier();
    let request = AnalyzeRequest::new("Quarterly report", "See the report.")
        .with_pdf_text("report")
        .with_urls(["https://example.com/report"]);

    let aggregate = classifier.aggregate(&request);
    assert!((aggregate.phishing_score - 0.2).abs() < 1e-9);
    assert_eq!(aggregate.reasons, vec!["PDF contains external URLs"]);

    let result = classifier.classify(&request);
    assert_eq!(result.label, ClassificationLabel::Legit);
    assert_eq!(result.confidence, 0.8);

    let without_urls = AnalyzeRequest::new("Quarterly report", "See the report.")
        .with_pdf_text("report");
    assert_eq!(classifier.aggregate(&without_urls).phishing_score, 0.0);
}

#[test]
fn test_malformed_urls_are_skipped() {
    let classifier = classifier();
    let clean = AnalyzeRequest::new("Lunch", "See you at noon.");
    let with_bad_urls = clean.clone().with_urls(["not a url", "http://", ""]);

    let baseline = classifier.aggregate(&clean);
    let aggregate = classifier.aggregate(&with_bad_urls);
    assert_eq!(aggregate.phishing_score, baseline.phishing_score);
    assert_eq!(aggregate.reasons, baseline.reasons);
    assert_eq!(
        classifier.classify(&with_bad_urls).label,
        ClassificationLabel::Legit
    );
}

#[test]
fn test_scores_stay_in_bounds_when_everything_fires() {
    let request = AnalyzeRequest::new(
        "URGENT final warning",
        "Urgent! Act immediately: your account will be suspended. Verify your account, \
         confirm your identity within 24 hours. Click here to update your payment. \
         Unusual activity detected. Confirm your password. You have won! Lottery winner! \
         Congratulations, buy now, act now, limited time, free gift, unsubscribe. \
         Your paypal and amazon and microsoft accounts. Receita Federal: regularize urgente.",
    )
    .with_urls([
        "http://192.168.10.4/login/verify",
        "http://secure-account.tk/%41%42%43%44%45",
        "http://qz7x1kvb9pw3mfj.top/signin",
    ])
    .with_pdf_text("pay now")
    .with_headers(Some("alert12345@mail.promo.xyz"), Some("other@elsewhere.net"));

    let classifier = classifier();
    let aggregate = classifier.aggregate(&request);
    assert!((0.0..=1.0).contains(&aggregate.phishing_score));
    assert!((0.0..=1.0).contains(&aggregate.spam_score));
    assert_eq!(aggregate.phishing_score, 1.0);

    let result = classifier.classify(&request);
    assert_eq!(result.label, ClassificationLabel::Phishing);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.score, 15.0);
    assert_eq!(result.reasons.len(), 5);
}

#[test]
fn test_classification_is_deterministic() {
    let classifier = classifier();
    let request = bank_phishing();

    let first = classifier.classify(&request);
    let second = classifier.classify(&request);
    assert_eq!(first.label, second.label);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.score, second.score);
    assert_eq!(first.reasons, second.reasons);
}

#[test]
fn test_concurrent_classification_shares_one_engine() {
    let classifier = Arc::new(classifier());
    let expected = classifier.classify(&bank_phishing());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || {
                if i % 2 == 0 {
                    classifier.classify(&bank_phishing())
                } else {
                    classifier.classify(&AnalyzeRequest::new("", ""))
                }
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(result.label, expected.label);
            assert_eq!(result.reasons, expected.reasons);
        } else {
            assert_eq!(result.label, ClassificationLabel::Legit);
        }
    }
}

#[test]
fn test_shared_instance_classifies_from_many_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                ThreatClassifier::shared()
                    .classify(&AnalyzeRequest::new("Your document", ""))
                    .label
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), ClassificationLabel::Legit);
    }
}

#[test]
fn test_json_request_round_trip_through_engine() {
    let json = r#"{
        "subject": "Urgent: Verify your account immediately",
        "body": "Your account will be suspended. Click here to restore access.",
        "urls": ["https://account-verify.xyz/login"],
        "headers": {"from": "support@bank-secure.com", "reply_to": "help@random-domain.net"}
    }"#;
    let request = AnalyzeRequest::from_json(json).unwrap();
    assert_eq!(request, bank_phishing());

    let value = serde_json::to_value(classifier().classify(&request)).unwrap();
    assert_eq!(value["label"], "phishing");
    assert!(value["reasons"].as_array().unwrap().len() <= 5);
}
