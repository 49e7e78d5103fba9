//! Offline scoring of a saved answer sheet, optionally submitted.

use clap::Args;
use riskwizard_core::{
    Catalog, Config, HttpSink, Respondent, SubmissionOutcome, SubmissionPayload, WizardEngine,
    WizardPosition, WizardSession,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct ScoreArgs {
    /// JSON file mapping question id to score (0-3)
    #[arg(long)]
    answers: PathBuf,
    /// Respondent email
    #[arg(long, default_value = "")]
    email: String,
    /// Opaque client identifier
    #[arg(long, default_value = "")]
    client_id: String,
    /// Submit the payload to the configured webhook
    #[arg(long)]
    submit: bool,
    /// Webhook URL (overrides config)
    #[arg(long, requires = "submit")]
    webhook: Option<String>,
}

pub fn run(args: ScoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.answers)?;
    let respondent = Respondent::new(args.email, args.client_id);
    let mut engine = WizardEngine::from_sheet_json(Catalog::builtin(), respondent, &raw)?;

    let unanswered = engine.answers().len() - engine.answers().answered_count();
    if unanswered > 0 {
        tracing::warn!(unanswered, "answer sheet is incomplete; unanswered questions score 0");
    }

    if !args.submit {
        let payload: SubmissionPayload = engine.build_payload();
        println!("{}", payload.to_json_pretty()?);
        return Ok(());
    }

    if engine.jump_to(WizardPosition::Review).is_none() {
        return Err(format!("cannot submit: {unanswered} questions unanswered").into());
    }
    let webhook = match args.webhook {
        Some(url) => url,
        None => Config::load_or_default().with_env_overrides().webhook.url,
    };
    let mut session = WizardSession::new(engine, HttpSink::new_or_default(&webhook)?);
    let runtime = tokio::runtime::Runtime::new()?;
    let events = runtime.block_on(session.advance());
    println!("{}", serde_json::to_string_pretty(&events)?);

    if let Some(riskwizard_core::Event::SubmissionFinished {
        outcome: SubmissionOutcome::Failed { reason },
        ..
    }) = events.last()
    {
        eprintln!("warning: submission failed: {reason}");
    }
    Ok(())
}
