//! Interactive consultation session against the remote service.
//!
//! Maintains the persisted conversation store across runs: the snapshot is
//! loaded before the session and written back when it ends.

use std::io::Write;

use kokoro_conversation::{ConversationStore, TurnError, TurnManager};
use kokoro_core::{Message, Role, TurnRequest, UploadedFile};
use kokoro_providers::GptAiClient;

use super::{CommandStrategy, init_common_components};

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
}

/// Strategy for executing the Chat command.
///
/// - Requires a stored sign-in (see the login command)
/// - Resumes the persisted active conversation, creating one when none
///   exists
/// - Streams the assistant reply to the terminal as fragments arrive
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;

        let auth = common.storage.load_auth()?;
        if !auth.is_authenticated {
            anyhow::bail!("Not signed in. Please run 'kokoro login' first.");
        }

        let store = common.storage.load_store()?;
        let uploader = common.client.clone();
        let mut manager = TurnManager::new(common.client, store, common.locale);
        manager.ensure_active_conversation();

        if let Some(message) = input.message {
            send_turn(&mut manager, TurnRequest::new(message)).await;
        } else {
            run_interactive(&mut manager, &uploader).await?;
        }

        common.storage.save_store(manager.store())?;
        Ok(())
    }
}

/// Process one turn, rendering the reply incrementally.
///
/// Guard violations are a user-visible notice, not an error; transport
/// failures already landed in the conversation as the localized notice.
async fn send_turn(manager: &mut TurnManager<GptAiClient>, request: TurnRequest) {
    let locale = manager.locale();

    let mut printed = String::new();
    let result = manager
        .process_turn_with(request, |text| {
            // Accumulated text normally grows by suffix; the finalize pass
            // may rewrite it, in which case reprint on a fresh line.
            if let Some(delta) = text.strip_prefix(printed.as_str()) {
                print!("{delta}");
            } else {
                print!("\n{text}");
            }
            let _ = std::io::stdout().flush();
            printed = text.to_string();
        })
        .await;

    match result {
        Ok(outcome) => {
            println!();
            if outcome.show_specialists {
                println!("\n=== {} ===", locale.specialists_title());
            }
        }
        Err(e @ (TurnError::StreamInProgress | TurnError::UploadInProgress)) => {
            eprintln!("{e}");
        }
    }
}

async fn run_interactive(
    manager: &mut TurnManager<GptAiClient>,
    uploader: &GptAiClient,
) -> anyhow::Result<()> {
    if let Some(conversation) = manager.store().active_conversation() {
        println!("=== {} ===", conversation.title);
        for message in &conversation.messages {
            print_message(message);
        }
    }
    println!("\nType 'exit' to quit, '/help' for session commands.\n");

    let mut pending_files: Vec<UploadedFile> = Vec::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "exit" | "quit" | "q" => break,
            "/help" => {
                print_help();
                continue;
            }
            "/new" => {
                manager.new_conversation();
                println!("Started a new consultation.");
                continue;
            }
            "/list" => {
                list_conversations(manager.store());
                continue;
            }
            _ => {}
        }

        if let Some(index) = line.strip_prefix("/switch ") {
            switch_conversation(manager.store_mut(), index.trim());
            continue;
        }
        if let Some(index) = line.strip_prefix("/delete ") {
            delete_conversation(manager.store_mut(), index.trim());
            continue;
        }
        if let Some(path) = line.strip_prefix("/upload ") {
            upload_file(manager, uploader, path.trim(), &mut pending_files).await;
            continue;
        }

        let request =
            TurnRequest::new(line).with_attachments(std::mem::take(&mut pending_files));
        send_turn(manager, request).await;
    }

    Ok(())
}

fn print_help() {
    println!("Session commands:");
    println!("  /new            start a new consultation");
    println!("  /list           list consultations");
    println!("  /switch <n>     make consultation n active");
    println!("  /delete <n>     delete consultation n");
    println!("  /upload <path>  attach a file to the next message");
    println!("  exit            end the session");
}

fn print_message(message: &Message) {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    if message.attachments.is_empty() {
        println!("[{speaker}] {}", message.content);
    } else {
        println!(
            "[{speaker}] {} ({} attachment(s))",
            message.content,
            message.attachments.len()
        );
    }
}

fn list_conversations(store: &ConversationStore) {
    for (index, conversation) in store.conversations().iter().enumerate() {
        let marker = if store.active_id() == Some(conversation.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {}: {} ({} messages)",
            index + 1,
            conversation.title,
            conversation.message_count()
        );
    }
}

fn switch_conversation(store: &mut ConversationStore, index: &str) {
    match resolve_index(store, index) {
        Some(id) => {
            store.set_active_conversation(&id);
            println!("Switched.");
        }
        None => eprintln!("No such consultation: {index}"),
    }
}

fn delete_conversation(store: &mut ConversationStore, index: &str) {
    match resolve_index(store, index) {
        Some(id) => {
            store.delete_conversation(&id);
            println!("Deleted.");
        }
        None => eprintln!("No such consultation: {index}"),
    }
}

/// Map a 1-based list index to a conversation id.
fn resolve_index(store: &ConversationStore, index: &str) -> Option<String> {
    let position: usize = index.parse().ok()?;
    store
        .conversations()
        .get(position.checked_sub(1)?)
        .map(|c| c.id.clone())
}

async fn upload_file(
    manager: &mut TurnManager<GptAiClient>,
    uploader: &GptAiClient,
    path: &str,
    pending: &mut Vec<UploadedFile>,
) {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Cannot read {path}: {e}");
            return;
        }
    };
    let name = std::path::Path::new(path)
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());

    match manager.upload_attachments(uploader, vec![(name, bytes)]).await {
        Ok(files) if files.is_empty() => {
            eprintln!("Upload failed; continuing without the file.");
        }
        Ok(mut files) => {
            println!("Uploaded {} file(s).", files.len());
            pending.append(&mut files);
        }
        Err(e) => eprintln!("{e}"),
    }
}
