use kokoro_config::Config;
use kokoro_conversation::LocalStorage;

/// Strategy for displaying configuration and storage information.
///
/// This strategy outputs:
/// - Service endpoint and token (masked)
/// - Chat defaults (locale)
/// - Local storage location, conversation counts, sign-in state
///
/// # Design
/// - Zero-allocation: No heap allocation beyond what business logic requires
/// - Static dispatch: All method calls are monomorphized
/// - Stateless: No internal state
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== kokoro Configuration ===\n");

        println!("Endpoint:");
        println!("  Base URL: {}", config.endpoint.base_url);
        println!("  Token: {}", mask_token(&config.endpoint.token));
        println!();

        println!("Chat Defaults:");
        println!("  Locale: {}", config.chat.locale);
        println!();

        let storage = LocalStorage::open_default()?;
        let store = storage.load_store()?;
        let auth = storage.load_auth()?;

        println!("Local Storage:");
        println!("  Directory: {}", storage.dir().display());
        println!("  Conversations: {}", store.conversations().len());
        let messages: usize = store
            .conversations()
            .iter()
            .map(kokoro_conversation::Conversation::message_count)
            .sum();
        println!("  Messages: {messages}");
        println!(
            "  Active: {}",
            store
                .active_conversation()
                .map_or("(none)", |c| c.title.as_str())
        );
        println!();

        println!("Account:");
        if auth.is_authenticated {
            println!(
                "  Signed in as: {}",
                auth.username.as_deref().unwrap_or("(unknown)")
            );
        } else {
            println!("  Not signed in");
        }

        Ok(())
    }
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}
