//! Terminal renderer: draws the wizard on stdout and relays typed commands.

use clap::Args;
use riskwizard_core::{
    fetch_webhook_url, Catalog, Config, HttpSink, Respondent, StdoutSink, StepStatus, SubmissionSink,
    WizardEngine, WizardPosition, WizardSession, WizardView, SCORE_OPTIONS,
};
use std::io::{self, BufRead, Write};
use url::Url;

#[derive(Args)]
pub struct RunArgs {
    /// Respondent email
    #[arg(long)]
    email: Option<String>,
    /// Opaque client identifier
    #[arg(long)]
    client_id: Option<String>,
    /// Invitation link carrying `email` and `ClientID` query parameters
    #[arg(long, conflicts_with_all = ["email", "client_id"])]
    link: Option<String>,
    /// Base URL of a running server to fetch the webhook URL from
    #[arg(long)]
    server: Option<String>,
    /// Webhook URL (overrides --server and the config file)
    #[arg(long)]
    webhook: Option<String>,
    /// Print the payload instead of submitting it
    #[arg(long)]
    dry_run: bool,
}

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Next,
    Prev,
    /// Progress-strip step: 0 = Welcome, 1..=N = categories, N+1 = Review.
    Goto(usize),
    /// 1-based question number on the current category, and its score.
    Answer(usize, u8),
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let number = |s: &str| s.parse::<usize>().map_err(|_| format!("not a number: {s}"));
    let score = |s: &str| s.parse::<u8>().map_err(|_| format!("not a score: {s}"));
    match parts.as_slice() {
        ["n" | "next"] | [] => Ok(Command::Next),
        ["p" | "prev" | "back"] => Ok(Command::Prev),
        ["g" | "go", step] => Ok(Command::Goto(number(*step)?)),
        ["a" | "answer", q, s] | [q, s] => Ok(Command::Answer(number(*q)?, score(*s)?)),
        ["s" | "status"] => Ok(Command::Status),
        ["h" | "help" | "?"] => Ok(Command::Help),
        ["q" | "quit" | "exit"] => Ok(Command::Quit),
        _ => Err(format!("unrecognized command: {line}")),
    }
}

const HELP: &str = "\
commands:
  n | next              continue (submits from the review page)
  p | prev              go back one step
  g <step>              jump to a step shown in the progress strip
  <q> <score>           answer question <q> on this page with 0-3
  s | status            print the current state as JSON
  q | quit              leave without submitting";

/// Drive `session` from `input` until the assessment completes or the user
/// quits. Returns the final position.
pub async fn drive<S, R, W>(
    session: &mut WizardSession<S>,
    input: R,
    out: &mut W,
) -> io::Result<WizardPosition>
where
    S: SubmissionSink,
    R: BufRead,
    W: Write,
{
    render(session.engine(), out)?;
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let command = match parse_command(line.trim()) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message} (h for help)")?;
                continue;
            }
        };

        let moved = match command {
            Command::Next => {
                let before = session.engine().position();
                if before == WizardPosition::Review {
                    writeln!(out, "Submitting your assessment...")?;
                }
                let events = session.advance().await;
                if events.is_empty() {
                    writeln!(out, "Answer every question on this page to continue.")?;
                }
                !events.is_empty()
            }
            Command::Prev => session.engine_mut().retreat().is_some(),
            Command::Goto(step) => {
                let n = session.engine().category_count();
                let target = WizardPosition::from_step_index(step, n);
                match target.and_then(|t| session.engine_mut().jump_to(t)) {
                    Some(_) => true,
                    None => {
                        writeln!(out, "Step {step} is not available yet.")?;
                        false
                    }
                }
            }
            Command::Answer(number, score) => match session.engine().position() {
                WizardPosition::Category { index } => {
                    match session.engine_mut().set_answer_at(index, number, score) {
                        Ok(_) => true,
                        Err(err) => {
                            writeln!(out, "{err}")?;
                            false
                        }
                    }
                }
                _ => {
                    writeln!(out, "There are no questions on this page.")?;
                    false
                }
            },
            Command::Status => {
                let json = serde_json::to_string_pretty(&session.engine().snapshot())
                    .map_err(io::Error::other)?;
                writeln!(out, "{json}")?;
                false
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                false
            }
            Command::Quit => break,
        };

        if moved {
            render(session.engine(), out)?;
        }
        if session.engine().position() == WizardPosition::Complete {
            break;
        }
    }
    Ok(session.engine().position())
}

fn render<W: Write>(engine: &WizardEngine, out: &mut W) -> io::Result<()> {
    let view = engine.snapshot();
    writeln!(out)?;
    render_progress(&view, out)?;
    match view.position {
        WizardPosition::Welcome => render_welcome(&view, out)?,
        WizardPosition::Category { index } => render_category(engine, index, out)?,
        WizardPosition::Review => render_review(engine, &view, out)?,
        WizardPosition::Submitting => writeln!(out, "Submitting your assessment...")?,
        WizardPosition::Complete => render_complete(&view, out)?,
    }
    if view.controls.visible {
        let prev = if view.controls.prev_enabled { "[p] Previous  " } else { "" };
        let next = if view.controls.next_enabled {
            format!("[n] {}", view.controls.next_label)
        } else {
            format!("({} locked)", view.controls.next_label)
        };
        writeln!(out, "{prev}{next}")?;
    }
    Ok(())
}

fn render_progress<W: Write>(view: &WizardView, out: &mut W) -> io::Result<()> {
    let strip: Vec<String> = view
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let marker = match step.status {
                StepStatus::Completed => "x",
                StepStatus::Active => ">",
                StepStatus::Available => " ",
                StepStatus::Locked => "-",
            };
            format!("[{marker}{i}]")
        })
        .collect();
    writeln!(out, "{}  {:.0}%", strip.join(" "), view.progress_pct)
}

fn render_welcome<W: Write>(view: &WizardView, out: &mut W) -> io::Result<()> {
    writeln!(out, "Fulfillment Risk Assessment")?;
    writeln!(out, "Respondent: {}", view.email)?;
    writeln!(
        out,
        "{} sections, each question scored 0 (not an issue) to 3 (severe).",
        view.categories.len()
    )
}

fn render_category<W: Write>(engine: &WizardEngine, index: usize, out: &mut W) -> io::Result<()> {
    let Some(category) = engine.catalog().category(index) else {
        return Ok(());
    };
    let answered = category
        .questions
        .iter()
        .filter(|q| matches!(engine.answer(&q.id), Some(Some(_))))
        .count();
    writeln!(out, "This section measures {}", category.title)?;
    writeln!(out, "{}", category.description)?;
    writeln!(
        out,
        "{answered} of {} questions answered",
        category.questions.len()
    )?;
    for (i, question) in category.questions.iter().enumerate() {
        let current = match engine.answer(&question.id).flatten() {
            Some(score) => format!("[{score}] {}", score.label()),
            None => "[ ]".to_string(),
        };
        writeln!(out, "  {}. {} {current}", i + 1, question.text)?;
    }
    let scale: Vec<String> = SCORE_OPTIONS
        .iter()
        .map(|o| format!("{}={}", o.value, o.label))
        .collect();
    writeln!(out, "Scale: {}", scale.join(", "))?;
    writeln!(out, "{}", category.footer_note)
}

fn render_review<W: Write>(engine: &WizardEngine, view: &WizardView, out: &mut W) -> io::Result<()> {
    writeln!(out, "Review your answers (g <step> to edit a section)")?;
    for (index, summary) in view.categories.iter().enumerate() {
        writeln!(
            out,
            "{}. {}  {} / {} ({})",
            index + 1,
            summary.title,
            summary.score,
            summary.max_score,
            summary.risk
        )?;
        if let Some(category) = engine.catalog().category(index) {
            for question in &category.questions {
                let score = engine
                    .answer(&question.id)
                    .flatten()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".into());
                writeln!(out, "     {score}  {}", question.text)?;
            }
        }
    }
    Ok(())
}

fn render_complete<W: Write>(view: &WizardView, out: &mut W) -> io::Result<()> {
    writeln!(out, "Thank you! Your assessment has been submitted.")?;
    for summary in &view.categories {
        writeln!(
            out,
            "  {:<45} {:>2} / {} ({})",
            summary.title, summary.score, summary.max_score, summary.risk
        )?;
    }
    writeln!(
        out,
        "  {:<45} {:>2} / {}",
        "Total Risk Score", view.total_score, view.max_score
    )
}

/// `--webhook`, then the server's `/api/config`, then the config file.
async fn resolve_webhook(args: &RunArgs, config: &Config) -> String {
    if let Some(url) = &args.webhook {
        return url.clone();
    }
    if let Some(server) = &args.server {
        return fetch_webhook_url(server).await;
    }
    config.webhook.url.clone()
}

fn respondent(args: &RunArgs) -> Result<Respondent, Box<dyn std::error::Error>> {
    if let Some(link) = &args.link {
        return Ok(Respondent::from_url(&Url::parse(link)?));
    }
    Ok(Respondent::new(
        args.email.clone().unwrap_or_default(),
        args.client_id.clone().unwrap_or_default(),
    ))
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default().with_env_overrides();
    let respondent = respondent(&args)?;
    let engine = WizardEngine::new(Catalog::builtin(), respondent);
    let runtime = tokio::runtime::Runtime::new()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let position = if args.dry_run {
        let mut session = WizardSession::new(engine, StdoutSink);
        runtime.block_on(drive(&mut session, stdin.lock(), &mut stdout))?
    } else {
        let webhook = runtime.block_on(resolve_webhook(&args, &config));
        tracing::info!(%webhook, "submissions will be sent here");
        let mut session = WizardSession::new(engine, HttpSink::new_or_default(&webhook)?);
        runtime.block_on(drive(&mut session, stdin.lock(), &mut stdout))?
    };

    if position != WizardPosition::Complete {
        tracing::info!(%position, "left the assessment before submitting");
    }
    Ok(())
}
