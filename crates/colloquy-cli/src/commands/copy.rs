//! One-shot marketing copy generation.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use colloquy_application::CopyUseCase;
use colloquy_application::transcript::render_copy_draft;
use colloquy_interaction::ChatBackend;

pub async fn run(
    backend: Arc<dyn ChatBackend>,
    prompt: &str,
    output: Option<&Path>,
) -> Result<()> {
    let usecase = CopyUseCase::new(backend);
    let draft = usecase.generate(prompt).await?;

    match output {
        Some(path) => {
            std::fs::write(path, render_copy_draft(&draft))?;
            println!("copy draft written to {}", path.display());
        }
        None => {
            println!("{}", "--- generated copy ---".bold());
            println!("{}", draft.content);
            if let Some(total) = draft.usage.as_ref().and_then(|u| u.total_tokens) {
                println!("{}", format!("({total} tokens)").dimmed());
            }
        }
    }

    Ok(())
}
