//! Job and history command handlers.

use super::{Context, OutputFormat, print_json};
use repurpose::{ContentMetadata, Job, JobError, JobErrorKind, RepurposeResult};

async fn require_job(context: &Context, job_id: &str) -> RepurposeResult<Job> {
    context
        .manager
        .get_job(job_id)
        .await?
        .ok_or_else(|| JobError::new(JobErrorKind::NotFound(job_id.to_string())).into())
}

/// Print a job's status.
pub async fn show_status(
    context: &Context,
    job_id: &str,
    format: OutputFormat,
) -> RepurposeResult<()> {
    let job = require_job(context, job_id).await?;

    match format {
        OutputFormat::Json => print_json(&job)?,
        OutputFormat::Human => {
            println!("Job {}", job.id);
            println!("  Status:  {}", job.status);
            println!("  Source:  {}", job.source_type);
            println!("  Targets: {}", job.targets.join(", "));
            if let Some(user) = &job.user_id {
                println!("  User:    {}", user);
            }
            println!("  Created: {}", job.created_at);
            println!("  Updated: {}", job.updated_at);
            if let Some(path) = &job.stored_file_ref {
                println!("  File:    {}", path);
            }
            if let Some(error) = &job.error {
                println!("  Error:   {}", error);
            }
        }
    }

    Ok(())
}

/// Print the per-platform results of a completed job.
pub async fn show_results(
    context: &Context,
    job_id: &str,
    format: OutputFormat,
) -> RepurposeResult<()> {
    let job = require_job(context, job_id).await?;

    let Some(results) = context.manager.get_job_results(job_id).await? else {
        println!("Job {} is {}; no results available", job.id, job.status);
        return Ok(());
    };

    match format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Human => {
            println!(
                "Results for job {} ({} of {} succeeded):",
                results.job_id,
                results.success_count(),
                results.platform_results.len()
            );
            println!("{:-<80}", "");
            for result in &results.platform_results {
                match (&result.content, &result.error) {
                    (Some(content), _) => {
                        println!("{} [ok]", result.platform);
                        if let Some(title) = &content.title {
                            println!("  {}", title);
                        }
                        println!("{}", content.body);
                        if !content.hashtags.is_empty() {
                            println!("  {}", content.hashtags.join(" "));
                        }
                    }
                    (None, error) => {
                        println!(
                            "{} [failed] {}",
                            result.platform,
                            error.as_deref().unwrap_or("unknown error")
                        );
                    }
                }
                println!("{:-<80}", "");
            }
        }
    }

    Ok(())
}

/// Print content history, most recent first.
pub async fn show_history(
    context: &Context,
    user: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> RepurposeResult<()> {
    let records = context.manager.get_content_history(user, limit).await?;

    match format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Human => {
            for record in &records {
                print_record(record);
            }
            println!("Total: {} records", records.len());
        }
    }

    Ok(())
}

fn print_record(record: &ContentMetadata) {
    let platforms: Vec<&str> = record
        .generated_content
        .iter()
        .map(|c| c.platform.as_str())
        .collect();

    println!("{}  {}  job {}", record.created_at, record.source_type, record.job_id);
    if let Some(user) = &record.user_id {
        println!("  User:      {}", user);
    }
    if let Some(file) = &record.file_info {
        println!("  File:      {} ({} bytes)", file.name, file.size);
    }
    if platforms.is_empty() {
        println!("  Generated: nothing");
    } else {
        println!("  Generated: {}", platforms.join(", "));
    }
}
