//! Drover CLI binary entry point.

use std::sync::Arc;

use drover::agent::{AgentManager, AgentOptions};
use drover::cli::Cli;
use drover::config::DroverConfig;
use drover::error::DroverError;
use drover::runner::Runner;
use drover::trace::{NoopTraceSink, ProcessorTraceSink, TraceRecord, TraceSink};
use drover::transport::openai::OpenAiTransport;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(Cli::parse_args()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), DroverError> {
    let config = DroverConfig::from_env();

    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| DroverError::Configuration("OPENAI_API_KEY is not set".into()))?;
    let transport = Arc::new(OpenAiTransport::new(api_key, config.base_url.clone()));

    let tracing_wanted = cli.trace || config.tracing_enabled;
    let manager = AgentManager::new(config, transport);

    let mut overrides = AgentOptions::default();
    overrides.system_prompt = cli.system.clone();
    if let Some(ref model) = cli.model {
        overrides.model = Some(model.clone());
    }
    let agent = manager.agent(overrides);

    let sink: Arc<dyn TraceSink> = if tracing_wanted {
        Arc::new(ProcessorTraceSink::default().with_processor(print_record))
    } else {
        Arc::new(NoopTraceSink)
    };

    let mut runner = Runner::new(agent)
        .with_max_turns(cli.max_turns)
        .with_trace_sink(sink);

    let output = runner.run(cli.message).await?;

    match output.structured {
        Some(value) => println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or(output.text)
        ),
        None => println!("{}", output.text),
    }

    Ok(())
}

fn print_record(record: &TraceRecord) {
    if let TraceRecord::Event { attributes, .. } = record {
        if let Some(turn) = attributes.get("turn") {
            eprintln!("Turn {turn}");
        }
        if let Some(input) = attributes.get("input").and_then(|v| v.as_str()) {
            eprintln!("> {input}");
        }
        if let Some(output) = attributes.get("output").and_then(|v| v.as_str()) {
            eprintln!("< {output}");
        }
        if let Some(error) = attributes.get("error").and_then(|v| v.as_str()) {
            eprintln!("! {error}");
        }
    }
}
