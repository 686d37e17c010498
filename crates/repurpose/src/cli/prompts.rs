//! Prompt command handlers.

use super::{Context, OutputFormat, print_json};
use repurpose::{
    Platform, PromptDetail, PromptError, PromptResolver, PromptSource, RepurposeResult,
    unique_targets,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolve and print the prompts each target would be generated with.
pub async fn show_prompts(
    context: &Context,
    targets: &[String],
    user: Option<&str>,
    custom: Vec<(String, String)>,
    format: OutputFormat,
) -> RepurposeResult<()> {
    let resolver = PromptResolver::new(Arc::new(context.config.prompts.clone()))
        .with_store(Arc::new(context.stores.prompt_store()));
    let custom: HashMap<String, String> = custom.into_iter().collect();

    let resolved = resolver.resolve(targets, user, &custom).await;

    match format {
        OutputFormat::Json => print_json(&resolved)?,
        OutputFormat::Human => {
            for target in unique_targets(targets) {
                match resolved.get(&target) {
                    Some(detail) => print_detail(&target, detail),
                    None => println!("{}: unrecognized platform, generated without a prompt", target),
                }
                println!("{:-<80}", "");
            }
            if resolved.degraded_targets().next().is_some() {
                println!("Saved prompts were unavailable; defaults were used where marked.");
            }
        }
    }

    Ok(())
}

fn print_detail(target: &str, detail: &PromptDetail) {
    println!("{}", heading(target, detail));
    println!("  Global:   {}", source_label(&detail.global_source));
    println!("  Platform: {}", source_label(&detail.platform_source));
    println!("  Prompt:");
    for line in detail.final_prompt.lines() {
        println!("    {}", line);
    }
}

/// The target, followed by its canonical platform when it was an alias.
fn heading(target: &str, detail: &PromptDetail) -> String {
    if target == detail.normalized_platform.as_str() {
        target.to_string()
    } else {
        format!("{} ({})", target, detail.normalized_platform)
    }
}

fn source_label(source: &PromptSource) -> String {
    match source {
        PromptSource::Custom => "custom".to_string(),
        PromptSource::Saved => "saved".to_string(),
        PromptSource::Default => "default".to_string(),
        PromptSource::Fallback(reason) => format!("default (fallback: {})", reason),
    }
}

/// Save or clear one of a user's prompts.
pub async fn save_prompt(
    context: &Context,
    user: &str,
    platform: Option<&str>,
    prompt: Option<String>,
) -> RepurposeResult<()> {
    let store = context.stores.prompt_store();
    let cleared = prompt.is_none();

    let scope = match platform {
        None => {
            store.save_global_prompt(user, prompt).await?;
            "global".to_string()
        }
        Some(name) => {
            let platform = Platform::normalize(name)
                .ok_or_else(|| PromptError::new(format!("Unknown platform '{}'", name)))?;
            store.save_platform_prompt(user, platform, prompt).await?;
            platform.to_string()
        }
    };

    if cleared {
        println!("Cleared {} prompt for user '{}'", scope, user);
    } else {
        println!("Saved {} prompt for user '{}'", scope, user);
    }
    Ok(())
}
