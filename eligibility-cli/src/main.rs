use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use eligibility_core::eligibility::manager::failure_message;
use eligibility_core::{
    Eligibility, EligibilityConfig, EvaluationRequest, RuleDraft, RulesApi, RulesHttpClient,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eligibility", about = "Manage eligibility rules and run eligibility checks")]
struct Cli {
    /// Configuration file (defaults to ./eligibility.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rules service base URL, overrides configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rule catalogue operations
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Evaluate the selected rules against field values
    Evaluate {
        /// Rule id to include, repeatable
        #[arg(long = "rule")]
        rules: Vec<String>,

        /// Field value as KEY=VALUE, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

#[derive(Debug, Subcommand)]
enum RulesCommand {
    /// List all rules
    List {
        /// Print the rules as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a rule
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        expression: String,
    },
    /// Delete a rule by id
    Delete { id: String },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config =
        EligibilityConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let client = RulesHttpClient::from_config(&config.api)
        .context("Failed to create rules service client")?;
    tracing::debug!(base_url = client.base_url(), "rules service client ready");

    run(cli.command, &client).await
}

async fn run<A: RulesApi>(command: Command, api: &A) -> anyhow::Result<()> {
    match command {
        Command::Rules {
            command: RulesCommand::List { json },
        } => {
            let rules = match api.list_rules().await {
                Ok(rules) => rules,
                Err(e) => bail!(failure_message(&e, "Failed to fetch rules.", false)),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&rules)?);
            } else if rules.is_empty() {
                println!("No rules.");
            } else {
                for rule in &rules {
                    println!("{}\t{}", rule.id, rule.display_line());
                }
            }
        }
        Command::Rules {
            command: RulesCommand::Add { name, expression },
        } => {
            let request = RuleDraft::new(name, expression).validate()?;
            let rule = match api.create_rule(&request).await {
                Ok(rule) => rule,
                Err(e) => bail!(failure_message(&e, "Failed to add rule.", true)),
            };
            tracing::info!(id = %rule.id, "rule created");
            println!("Rule added successfully.");
            println!("{}\t{}", rule.id, rule.display_line());
        }
        Command::Rules {
            command: RulesCommand::Delete { id },
        } => {
            if let Err(e) = api.delete_rule(&id).await {
                bail!(failure_message(&e, "Failed to delete rule.", true));
            }
            println!("Rule deleted successfully.");
        }
        Command::Evaluate { rules, fields } => {
            let request = EvaluationRequest {
                data: fields.into_iter().collect::<BTreeMap<_, _>>(),
                rule_ids: rules,
            };
            let eligible = match api.evaluate(&request).await {
                Ok(eligible) => eligible,
                Err(e) => bail!(failure_message(&e, "Failed to check eligibility.", false)),
            };
            println!("{}", Eligibility::from_flag(eligible));
        }
    }

    Ok(())
}
