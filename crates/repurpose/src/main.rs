//! Repurpose CLI binary.
//!
//! This binary provides command-line access to the durable stores:
//! - Preview how prompts resolve for a set of platforms
//! - Save or clear a user's prompts
//! - Inspect jobs, their results and the content history

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, Context, jobs, prompts};

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    repurpose::init_logging(cli.verbose, cli.json_logs);

    let context = Context::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Prompts {
            targets,
            user,
            custom,
            format,
        } => {
            prompts::show_prompts(&context, &targets, user.as_deref(), custom, format).await?;
        }

        Commands::SavePrompt {
            user,
            platform,
            prompt,
        } => {
            prompts::save_prompt(&context, &user, platform.as_deref(), prompt).await?;
        }

        Commands::Status { job_id, format } => {
            jobs::show_status(&context, &job_id, format).await?;
        }

        Commands::Results { job_id, format } => {
            jobs::show_results(&context, &job_id, format).await?;
        }

        Commands::History {
            user,
            limit,
            format,
        } => {
            jobs::show_history(&context, user.as_deref(), limit, format).await?;
        }
    }

    Ok(())
}
