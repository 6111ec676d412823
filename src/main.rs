use clap::{Arg, Command};
use log::LevelFilter;
use mail_threat_engine::config::{env_override, toml_config};
use mail_threat_engine::error::{RequestError, RequestResult};
use mail_threat_engine::{AnalyzeRequest, FeedbackRequest, Settings, ThreatClassifier};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// Batch lines classified concurrently before their results are written.
const BATCH_CHUNK_SIZE: usize = 64;

#[tokio::main]
async fn main() {
    let matches = Command::new("mail-threat-engine")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic email threat classifier (legit, spam, phishing, fraud)")
        .long_about("Mail Threat Engine - explainable scoring of inbound mail content:\n\
                    • Urgency, brand and government impersonation language\n\
                    • Sender identity and From/Reply-To alignment checks\n\
                    • Structural URL analysis with entropy heuristics\n\
                    • Label-weighted score for downstream mail filters")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/mail-threat-engine.toml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and detector tables")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("request")
                .long("request")
                .value_name("FILE")
                .help("Classify one JSON request ('-' reads stdin)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .value_name("FILE")
                .help("Classify JSON-lines requests concurrently, one result per line")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("feedback")
                .long("feedback")
                .value_name("FILE")
                .help("Validate and record a classification feedback record")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("health")
                .long("health")
                .help("Print engine health as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-detectors")
                .long("list-detectors")
                .help("List detectors in evaluation order")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with per-detector evidence")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        match toml_config::write_default_config(generate_path) {
            Ok(()) => println!("Default configuration written to: {generate_path}"),
            Err(e) => {
                eprintln!("Error generating configuration: {e:#}");
                process::exit(1);
            }
        }
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/mail-threat-engine.toml");

    // Parse before the logger exists so the configured level can apply.
    let loaded = if Path::new(config_path).exists() {
        Some(toml_config::load_config(config_path))
    } else {
        None
    };

    if matches.get_flag("test-config") {
        test_config(config_path, loaded);
        return;
    }

    let settings = resolve_settings(
        loaded.as_ref().and_then(|result| result.as_ref().ok()),
        env_override,
    );

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        settings
            .logging
            .level
            .parse::<LevelFilter>()
            .unwrap_or(LevelFilter::Info)
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    match &loaded {
        Some(Ok(_)) => log::info!("Loaded configuration from: {}", config_path),
        Some(Err(e)) => log::warn!("Failed to load config ({:#}), using defaults", e),
        None => log::warn!("Config file not found: {}, using defaults", config_path),
    }

    let classifier = match ThreatClassifier::new(settings) {
        Ok(classifier) => Arc::new(classifier),
        Err(e) => {
            eprintln!("Error building classifier: {e:#}");
            process::exit(1);
        }
    };
    log::info!(
        "Starting {} v{} (model {})",
        classifier.settings().app_name,
        classifier.settings().app_version,
        classifier.model_version()
    );

    if matches.get_flag("health") {
        print_json(&classifier.health());
        return;
    }

    if matches.get_flag("list-detectors") {
        println!("Detectors (evaluation order)");
        println!("═══════════════════════════════════════");
        for (i, name) in classifier.detector_names().iter().enumerate() {
            println!("  {:>2}. {}", i + 1, name);
        }
        return;
    }

    if let Some(path) = matches.get_one::<String>("feedback") {
        if let Err(e) = record_feedback(path) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        return;
    }

    if let Some(path) = matches.get_one::<String>("request") {
        match read_input(path).and_then(|json| AnalyzeRequest::from_json(&json)) {
            Ok(request) => print_json(&classifier.classify(&request)),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(2);
            }
        }
        return;
    }

    if let Some(path) = matches.get_one::<String>("batch") {
        if let Err(e) = run_batch(classifier, path).await {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        return;
    }

    eprintln!("Nothing to do: pass --request, --batch, --feedback, --health or --list-detectors");
    process::exit(2);
}

fn test_config(config_path: &str, loaded: Option<anyhow::Result<Settings>>) {
    println!("🔍 Testing configuration...");
    let file_settings = match loaded {
        Some(Ok(settings)) => {
            println!("Configuration file: {config_path}");
            Some(settings)
        }
        Some(Err(e)) => {
            println!("❌ Configuration validation failed:");
            println!("Error: {e:#}");
            process::exit(1);
        }
        None => {
            println!("Configuration file not found: {config_path} (defaults apply)");
            None
        }
    };

    match ThreatClassifier::new(resolve_settings(file_settings.as_ref(), env_override)) {
        Ok(classifier) => {
            println!(
                "All {} detectors built and patterns compiled successfully.",
                classifier.detector_names().len()
            );
            println!("✅ Configuration valid (model {})", classifier.model_version());
        }
        Err(e) => {
            println!("❌ Configuration validation failed:");
            println!("Error: {e:#}");
            process::exit(1);
        }
    }
}

/// File settings (or defaults) with `AI_ENGINE_*` overrides applied, as
/// both startup and `--test-config` see them.
fn resolve_settings<F>(file_settings: Option<&Settings>, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    file_settings
        .cloned()
        .unwrap_or_default()
        .with_overrides(lookup)
}

fn read_input(path: &str) -> RequestResult<String> {
    let mut content = String::new();
    let result = if path == "-" {
        std::io::stdin().read_to_string(&mut content).map(|_| ())
    } else {
        std::fs::read_to_string(path).map(|c| content = c)
    };
    result.map_err(|source| RequestError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(content)
}

fn record_feedback(path: &str) -> RequestResult<()> {
    let feedback = read_input(path).and_then(|json| FeedbackRequest::from_json(&json))?;
    log::info!(
        "Feedback received: email={}, original={}, correct={}",
        feedback.email_id,
        feedback.original_label,
        feedback.correct_label
    );
    print_json(&serde_json::json!({
        "status": "received",
        "message": "Feedback recorded",
    }));
    Ok(())
}

/// Classifies the file's lines on the blocking pool, at most
/// `BATCH_CHUNK_SIZE` at a time, printing results in input order.
async fn run_batch(classifier: Arc<ThreatClassifier>, path: &str) -> RequestResult<()> {
    let content = read_input(path)?;
    let stdout = std::io::stdout();
    let (total, failed) = classify_lines(classifier, &content, &mut stdout.lock()).await;
    log::info!("Batch complete: {} requests, {} failed", total, failed);
    Ok(())
}

/// Writes one JSON value per non-empty line: the result, or an error object
/// naming the line. Returns the number of requests and of failures.
async fn classify_lines<W: Write>(
    classifier: Arc<ThreatClassifier>,
    content: &str,
    out: &mut W,
) -> (usize, usize) {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line))
        .collect();

    let mut failed = 0;
    for chunk in lines.chunks(BATCH_CHUNK_SIZE) {
        let handles: Vec<_> = chunk
            .iter()
            .map(|(line_number, line)| {
                let classifier = Arc::clone(&classifier);
                let line = line.to_string();
                let handle = tokio::task::spawn_blocking(move || {
                    AnalyzeRequest::from_json(&line).map(|request| classifier.classify(&request))
                });
                (*line_number, handle)
            })
            .collect();

        for (line_number, handle) in handles {
            let value = match handle.await {
                Ok(Ok(result)) => serde_json::to_value(&result)
                    .unwrap_or_else(|e| serde_json::json!({ "line": line_number, "error": e.to_string() })),
                Ok(Err(e)) => {
                    failed += 1;
                    log::warn!("Line {}: {}", line_number, e);
                    serde_json::json!({ "line": line_number, "error": e.to_string() })
                }
                Err(e) => {
                    failed += 1;
                    log::error!("Line {}: classification task failed: {}", line_number, e);
                    serde_json::json!({ "line": line_number, "error": "internal error" })
                }
            };
            if let Err(e) = writeln!(out, "{value}") {
                log::error!("Failed to write batch output: {}", e);
            }
        }
    }

    (lines.len(), failed)
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize output: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_file_settings_and_defaults() {
        let mut file = Settings::default();
        file.scoring.spam_score_weight = 5.5;
        let lookup = |key: &str| (key == "FRAUD_SCORE_WEIGHT").then(|| "-1".to_string());

        let settings = resolve_settings(Some(&file), lookup);
        assert_eq!(settings.scoring.spam_score_weight, 5.5);
        assert_eq!(settings.scoring.fraud_score_weight, -1.0);
        assert!(ThreatClassifier::new(settings).is_err());

        let defaults = resolve_settings(None, lookup);
        assert!(ThreatClassifier::new(defaults).is_err());

        let untouched = resolve_settings(Some(&file), |_: &str| None);
        assert!(ThreatClassifier::new(untouched).is_ok());
    }

    #[tokio::test]
    async fn test_batch_keeps_order_across_chunks() {
        let classifier = Arc::new(ThreatClassifier::new(Settings::default()).unwrap());
        let mut content = String::new();
        for i in 0..(BATCH_CHUNK_SIZE * 2 + 3) {
            if i == BATCH_CHUNK_SIZE {
                content.push_str("{not json\n\n");
            } else {
                content.push_str(&format!("{{\"subject\":\"note {i}\",\"body\":\"\"}}\n"));
            }
        }

        let mut out = Vec::new();
        let (total, failed) = classify_lines(classifier, &content, &mut out).await;
        assert_eq!(total, BATCH_CHUNK_SIZE * 2 + 3);
        assert_eq!(failed, 1);

        let values: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(values.len(), total);
        assert_eq!(values[0]["label"], "legit");
        assert_eq!(values[BATCH_CHUNK_SIZE]["line"], BATCH_CHUNK_SIZE + 1);
        assert!(values[BATCH_CHUNK_SIZE]["error"]
            .as_str()
            .unwrap()
            .starts_with("malformed request"));
        assert_eq!(values[total - 1]["label"], "legit");
    }
}
