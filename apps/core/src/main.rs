// Maternal Risk CLI host
// Reads an assessment request as JSON and prints the scored result.

use anyhow::{bail, Context};
use maternal_risk_core::config::AppConfig;
use maternal_risk_core::scoring::build_scorer;
use maternal_risk_core::store::InMemoryAssessmentStore;
use maternal_risk_core::telemetry::init_tracing;
use maternal_risk_core::AssessmentService;
use std::io::Read;
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "usage: maternal-risk assess [FILE]   score a JSON request (stdin if FILE is omitted)\n       maternal-risk symptoms [CATEGORY]   list the symptom catalog\n       maternal-risk symptom ID   show one catalog entry";

fn read_request(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path)),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("reading request from stdin")?;
            Ok(body)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.log_format)?;

    let scorer = build_scorer(&config)?;
    let service = AssessmentService::new(scorer, Arc::new(InMemoryAssessmentStore::new()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("assess") => {
            let body = read_request(args.get(1).map(String::as_str))?;
            let response = service.submit_json(&body).await?;
            info!(session = %response.session_id, "assessment written to stdout");
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some("symptoms") => {
            let symptoms = match args.get(1) {
                Some(category) => service.symptoms_by_category(category),
                None => service.symptoms().iter().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&symptoms)?);
        }
        Some("symptom") => {
            let id: u32 = match args.get(1).map(|raw| raw.parse()) {
                Some(Ok(id)) => id,
                _ => bail!(USAGE),
            };
            println!("{}", serde_json::to_string_pretty(service.symptom(id)?)?);
        }
        _ => bail!(USAGE),
    }

    Ok(())
}
