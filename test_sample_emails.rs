#![allow(clippy::uninlined_format_args)]

use mail_threat_engine::{AnalyzeRequest, ThreatClassifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Classifying sample emails...");
    let classifier = ThreatClassifier::shared();

    let samples = vec![
        (
            "Bank credential phishing",
            AnalyzeRequest::new(
                "Urgent: Verify your account immediately",
                "Your account will be suspended. Click here to restore access.",
            )
            .with_urls(["https://account-verify.xyz/login"])
            .with_headers(
                Some("support@bank-secure.com"),
                Some("help@random-domain.net"),
            ),
        ),
        (
            "Receita Federal impersonation (pt-BR)",
            AnalyzeRequest::new(
                "Seu CPF foi bloqueado",
                "A Receita Federal identificou pendências. Regularize urgente em até 24 horas ou seu CPF será cancelado.",
            )
            .with_urls(["http://receita-regulariza.top/cpf"])
            .with_headers(Some("atendimento@receita-online.top"), None),
        ),
        (
            "Bulk promotion",
            AnalyzeRequest::new(
                "Limited time offer just for you",
                "Buy now and get 80% off! Act now, this exclusive deal expires tonight. Click below to unsubscribe.",
            )
            .with_headers(Some("deals@newsletter-blast.click"), None),
        ),
        (
            "Invoice with PDF link",
            AnalyzeRequest::new("Your document", "Please review the attached invoice.")
                .with_pdf_text("Invoice 1042. Pay online at the link below.")
                .with_urls(["https://billing.example.com/pay/1042"]),
        ),
        (
            "Ordinary team mail",
            AnalyzeRequest::new(
                "Team lunch on Friday",
                "Hi all, we're meeting at noon in the usual place. See you there!",
            )
            .with_headers(Some("alice@company.com"), Some("alice@company.com")),
        ),
    ];

    for (name, request) in &samples {
        let result = classifier.classify(request);
        println!();
        println!("📧 {}", name);
        println!("   Subject: {}", request.subject);
        println!(
            "   Result: {} (confidence: {:.3}, score: {:.2})",
            result.label, result.confidence, result.score
        );
        for reason in &result.reasons {
            println!("     - {}", reason);
        }
    }

    println!();
    println!("Model version: {}", classifier.model_version());
    Ok(())
}
