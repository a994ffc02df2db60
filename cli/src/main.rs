//! CLI entrypoint for argos
//!
//! Wires the layers together for local inspection of schemas and model
//! output: validate tool-call arguments, extract or repair JSON, and run
//! the guided-decoding schema transformer.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use argos_application::{ReviewToolCallUseCase, ToolCallDecision, ToolRegistryPort};
use argos_domain::ToolDefinition;
use argos_infrastructure::{
    extract_json, ConfigLoader, ErrorFormatter, FallbackHandler, JsonRepairer, JsonSchemaCompiler,
    RetryTracker, SchemaTransformer, ToolSchemaRegistry,
};

#[derive(Parser)]
#[command(
    name = "argos",
    version,
    about = "Structured output validation and recovery for local coding agents"
)]
struct Cli {
    /// Path to a config file (merged over discovered configs)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate tool-call arguments against a parameter schema
    Validate {
        /// Path to the JSON Schema file
        #[arg(long)]
        schema: PathBuf,
        /// Argument JSON text, or '-' to read stdin
        #[arg(long)]
        args: String,
        /// Tool name used in feedback messages
        #[arg(long, default_value = "tool")]
        tool: String,
        /// Tool-call id used for retry tracking
        #[arg(long, default_value = "cli-call")]
        call_id: String,
    },
    /// Extract the first complete JSON value from noisy text
    Extract {
        /// Input text, or '-' to read stdin
        text: String,
    },
    /// Repair malformed JSON and report the applied fixes
    Repair {
        /// Input text, or '-' to read stdin
        text: String,
    },
    /// Inline $refs and enforce guided-decoding limits on a schema
    Transform {
        /// Path to the JSON Schema file
        #[arg(long)]
        schema: PathBuf,
    },
    /// Preflight-check a schema without transforming it
    Inspect {
        /// Path to the JSON Schema file
        #[arg(long)]
        schema: PathBuf,
    },
    /// Run the fallback decision for an invalid generation
    Recover {
        /// Path to the JSON Schema file
        #[arg(long)]
        schema: PathBuf,
        /// The invalid model output, or '-' to read stdin
        #[arg(long)]
        output: String,
        /// Model id recorded in the fallback context
        #[arg(long, default_value = "local-model")]
        model: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let file_config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    let (retry_config, transform_limits) = file_config.into_configs()?;

    match cli.command {
        Command::Validate {
            schema,
            args,
            tool,
            call_id,
        } => {
            let schema_value = read_schema(&schema)?;
            let arguments = read_input(&args)?;

            // === Dependency Injection ===
            let compiler = Arc::new(JsonSchemaCompiler::new());
            let registry = Arc::new(ToolSchemaRegistry::new(compiler));
            registry.register_tool(ToolDefinition::new(&tool, "", schema_value))?;

            let tracker = Arc::new(RetryTracker::new(&retry_config));
            let formatter = Arc::new(ErrorFormatter::new(retry_config.clone()));
            let use_case = ReviewToolCallUseCase::new(registry, tracker, formatter, &retry_config);

            info!(tool = %tool, "Validating tool-call arguments");
            match use_case.execute(&tool, &call_id, &arguments)? {
                ToolCallDecision::Accepted(payload) => {
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                ToolCallDecision::Retry { feedback, .. } => {
                    println!("{}", feedback);
                    std::process::exit(1);
                }
                ToolCallDecision::Escalate { report } => {
                    println!("{}", report);
                    std::process::exit(1);
                }
            }
        }
        Command::Extract { text } => {
            let input = read_input(&text)?;
            match extract_json(&input) {
                Some(extracted) => println!("{}", extracted),
                None => bail!("No complete JSON value found in the input"),
            }
        }
        Command::Repair { text } => {
            let input = read_input(&text)?;
            let result = JsonRepairer::new().try_repair(&input);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
        Command::Transform { schema } => {
            let schema_value = read_schema(&schema)?;
            let transformer = SchemaTransformer::new(transform_limits);
            match transformer.transform(&schema_value) {
                Ok(resolved) => println!("{}", serde_json::to_string_pretty(&resolved)?),
                Err(fault) => bail!("Schema rejected: {}", fault),
            }
        }
        Command::Inspect { schema } => {
            let schema_value = read_schema(&schema)?;
            let transformer = SchemaTransformer::new(transform_limits);
            let report = transformer.validate(&schema_value);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_valid {
                std::process::exit(1);
            }
        }
        Command::Recover {
            schema,
            output,
            model,
        } => {
            let schema_value = read_schema(&schema)?;
            let invalid_output = read_input(&output)?;

            let handler = FallbackHandler::new(Arc::new(JsonSchemaCompiler::new()));
            let mut context = argos_domain::FallbackContext::new(
                model,
                argos_domain::FallbackMode::Managed,
            )
            .with_invalid_output(invalid_output);

            let result = handler.handle(&mut context, &schema_value);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn read_schema(path: &PathBuf) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read schema {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse schema {}", path.display()))
}

/// Read an argument value, treating '-' as stdin.
fn read_input(value: &str) -> Result<String> {
    if value == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("read stdin")?;
        Ok(buffer)
    } else {
        Ok(value.to_string())
    }
}
