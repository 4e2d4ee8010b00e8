//! Interactive review loop: the user side and the supervisor side of the
//! conversation share one terminal.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use colloquy_application::ChatUseCase;
use colloquy_application::transcript::{render_transcript, transcript_file_name};
use colloquy_core::config::ChatConfig;
use colloquy_core::{ConversationPhase, ReviewCandidate};
use colloquy_interaction::ChatBackend;

pub async fn run(backend: Arc<dyn ChatBackend>, config: ChatConfig) -> Result<()> {
    let mut usecase = ChatUseCase::new(backend, config);

    let connected = usecase.refresh_connection().await;
    if connected {
        println!("{}", "backend connection OK".green());
    } else {
        println!(
            "{}",
            "backend unreachable - submissions will fail until it recovers".yellow()
        );
    }
    println!("Type a message to ask the assistant, or /help for commands.\n");

    let mut editor = DefaultEditor::new()?;

    loop {
        let prompt = match usecase.phase() {
            ConversationPhase::AwaitingReview => "review> ",
            _ => "you> ",
        };

        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&line);

        if let Some(command) = line.strip_prefix('/') {
            if !handle_command(&mut usecase, command) {
                break;
            }
            continue;
        }

        if usecase.phase() == ConversationPhase::AwaitingReview {
            println!(
                "{}",
                "a candidate is awaiting review - /approve, /edit <text>, or /reject first".yellow()
            );
            continue;
        }

        match usecase.submit(&line).await {
            Ok(candidate) => print_candidate(&candidate),
            Err(err) => println!("{}", err.to_string().red()),
        }
    }

    println!("bye");
    Ok(())
}

/// Handles a slash command; returns false when the loop should exit.
fn handle_command(usecase: &mut ChatUseCase, command: &str) -> bool {
    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "approve" => {
            let content = (!rest.is_empty()).then(|| rest.to_string());
            match usecase.approve(content) {
                Ok(message) => {
                    println!(
                        "{} {}",
                        "assistant:".green().bold(),
                        message.content.green()
                    );
                }
                Err(err) => println!("{}", err.to_string().red()),
            }
        }
        "original" => {
            let original = usecase
                .pending_review()
                .map(|c| c.original_content.clone());
            match original {
                Some(content) => match usecase.approve(Some(content)) {
                    Ok(message) => {
                        println!(
                            "{} {}",
                            "assistant:".green().bold(),
                            message.content.green()
                        );
                    }
                    Err(err) => println!("{}", err.to_string().red()),
                },
                None => println!("{}", "no candidate to approve".red()),
            }
        }
        "edit" => {
            if rest.is_empty() {
                println!("{}", "usage: /edit <replacement text>".yellow());
            } else {
                match usecase.edit_candidate(rest) {
                    Ok(()) => {
                        if let Some(candidate) = usecase.pending_review() {
                            print_candidate(candidate);
                        }
                    }
                    Err(err) => println!("{}", err.to_string().red()),
                }
            }
        }
        "reject" => {
            usecase.reject();
            println!("candidate rejected - the question stays in the history");
        }
        "clear" => {
            usecase.clear();
            println!("conversation cleared");
        }
        "export" => {
            let path = if rest.is_empty() {
                transcript_file_name(usecase.conversation_id())
            } else {
                rest.to_string()
            };
            match export_transcript(usecase, Path::new(&path)) {
                Ok(()) => println!("transcript written to {path}"),
                Err(err) => println!("{}", err.to_string().red()),
            }
        }
        "status" => print_status(usecase),
        "history" => print_history(usecase),
        "help" => print_help(),
        "quit" | "exit" => return false,
        other => println!("unknown command: /{other} (try /help)"),
    }
    true
}

fn export_transcript(usecase: &ChatUseCase, path: &Path) -> Result<()> {
    let doc = render_transcript(&usecase.messages(), Utc::now());
    std::fs::write(path, doc)?;
    Ok(())
}

fn print_candidate(candidate: &ReviewCandidate) {
    println!("{}", "--- candidate awaiting review ---".bold());
    println!("{} {}", "original:".dimmed(), candidate.original_content);
    if candidate.is_edited() {
        println!("{}   {}", "edited:".dimmed(), candidate.edited_content);
    }
    println!("/approve [text] | /original | /edit <text> | /reject");
}

fn print_status(usecase: &ChatUseCase) {
    println!("phase:        {:?}", usecase.phase());
    println!("messages:     {}", usecase.message_count());
    println!("pending:      {}", usecase.pending_count());
    println!(
        "conversation: {}",
        usecase.conversation_id().unwrap_or("(none)")
    );
    println!(
        "backend:      {}",
        if usecase.is_api_connected() {
            "connected"
        } else {
            "unreachable"
        }
    );
}

fn print_history(usecase: &ChatUseCase) {
    for message in usecase.messages() {
        let label = match message.role {
            colloquy_core::MessageRole::User => "user:".cyan().bold(),
            colloquy_core::MessageRole::Assistant => "assistant:".green().bold(),
            colloquy_core::MessageRole::System => "system:".yellow().bold(),
        };
        println!("{label} {}", message.content);
    }
    if usecase.message_count() == 0 {
        println!("(no messages yet)");
    }
}

fn print_help() {
    println!("plain text        submit a question to the assistant");
    println!("/approve [text]   release the candidate (optionally with final text)");
    println!("/original         release the backend's unedited draft");
    println!("/edit <text>      rewrite the candidate's working copy");
    println!("/reject           discard the candidate");
    println!("/history          show the finalized conversation");
    println!("/status           show session state");
    println!("/export [path]    write a Markdown transcript");
    println!("/clear            reset the conversation");
    println!("/quit             leave");
}
