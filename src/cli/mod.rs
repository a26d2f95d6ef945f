mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tracing::{error, info};

use crate::{
    config::AppConfig,
    core::{PipelineRunner, SessionState, ASSISTANT_ROLE},
    error::Result,
    runtime::{travel_agents, OpenAiRuntime},
    types::{Budget, Interest, TravelPreferences},
};

/// CLI entry point for the travel-crew tool
pub async fn run() -> anyhow::Result<()> {
    let matches = Command::new("travel-crew")
        .version("0.1.0")
        .about("Plans a trip with a travel planner and a local expert, streaming their progress")
        .arg(
            Arg::new("destination")
                .help("Where the trip goes")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("days")
                .value_name("DAYS")
                .help("Trip length in days (1-30)")
                .default_value("3"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("TIER")
                .help("Spending tier: budget, moderate or luxury")
                .default_value("moderate"),
        )
        .arg(
            Arg::new("interests")
                .short('i')
                .long("interests")
                .value_name("LIST")
                .help("Comma-separated interests: culture, nature, food, adventure")
                .default_value("culture"),
        )
        .arg(
            Arg::new("background")
                .long("background")
                .action(ArgAction::SetTrue)
                .help("Run the pipeline on a worker and stream progress while it runs"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Model name override (or set MODEL_NAME)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("OpenAI API key (or set OPENAI_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("API base URL override (or set OPENAI_API_BASE)"),
        )
        .arg(
            Arg::new("poll-interval")
                .long("poll-interval")
                .value_name("MS")
                .help("Polling interval for background updates, in milliseconds")
                .default_value("100"),
        )
        .get_matches();

    let mut config = AppConfig::load_with(matches.get_one::<String>("api-key").cloned())?;
    if let Some(model) = matches.get_one::<String>("model") {
        config.model_name = model.clone();
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.api_base = Some(base_url.clone());
    }

    if config.debug_mode {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let destination = matches.get_one::<String>("destination").unwrap();
    let duration: u32 = matches
        .get_one::<String>("duration")
        .unwrap()
        .parse()
        .context("--days must be a number")?;
    let budget: Budget = matches.get_one::<String>("budget").unwrap().parse()?;
    let interests = parse_interests(matches.get_one::<String>("interests").unwrap())?;
    let preferences = TravelPreferences::new(destination, duration, budget, interests)?;

    let poll_interval = Duration::from_millis(
        matches
            .get_one::<String>("poll-interval")
            .unwrap()
            .parse()
            .context("--poll-interval must be a number")?,
    );

    let mut session = SessionState::new();
    session.initialize();
    session.set_async_mode(matches.get_flag("background"));

    let runtime = OpenAiRuntime::new(&config).with_agents(travel_agents());
    let runner = PipelineRunner::new(Arc::new(runtime), session.activity_queue());

    info!("Planning a trip to {}", preferences.destination());
    info!("Using model: {}", config.model_name);

    session.clear_activities();

    if session.async_mode() {
        let handle = runner.spawn_background(preferences, &session)?;
        let rendered = stream_background(&mut session, poll_interval).await;
        // Surface a worker panic instead of silently showing no plan.
        if let Err(err) = handle.await {
            error!("background worker terminated abnormally: {err}");
        }
        // The worker may have pushed records between the last poll and
        // clearing the processing flag.
        session.sync_activities();
        render::render_activity_thread(session.activities(), rendered);
        session.process_pending_messages();
    } else {
        println!("Creating your travel plan...");
        match runner.run(&preferences).await {
            Ok(plan) => session.add_message(ASSISTANT_ROLE, plan),
            Err(err) => error!("Failed to process travel plan: {err}"),
        }
        session.sync_activities();
        render::render_thread_header();
        render::render_activity_thread(session.activities(), 0);
    }

    render::render_final_plan(session.messages());
    render::prompt_feedback(&mut session);

    Ok(())
}

/// Stream new activity records to the console while the worker runs.
/// Returns how many records were rendered.
async fn stream_background(session: &mut SessionState, poll_interval: Duration) -> usize {
    render::render_thread_header();
    let mut rendered = 0;
    loop {
        session.sync_activities();
        rendered = render::render_activity_thread(session.activities(), rendered);
        if !session.is_processing() {
            return rendered;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

fn parse_interests(raw: &str) -> Result<Vec<Interest>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse())
        .collect()
}
