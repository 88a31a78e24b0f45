//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own type and input,
//! dispatched statically from `main`.

use kokoro_config::Config;
use kokoro_conversation::{LocalStorage, Locale};
use kokoro_providers::GptAiClient;

mod chat;
mod info;
mod init;
mod login;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use login::{LoginInput, LoginStrategy, LogoutStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via an associated type, so
/// parameters pass type-safely without boxing or runtime casting.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Components shared by the commands that talk to the service.
pub struct CommonComponents {
    pub config: Config,
    pub storage: LocalStorage,
    pub locale: Locale,
    pub client: GptAiClient,
}

/// Load config and open local storage and the remote client.
pub fn init_common_components() -> anyhow::Result<CommonComponents> {
    let config = Config::load()?;
    let storage = LocalStorage::open_default()?;
    let locale = Locale::from_tag(&config.chat.locale);
    let client = GptAiClient::new(
        config.endpoint.base_url.clone(),
        config.endpoint.token.clone(),
    );

    Ok(CommonComponents {
        config,
        storage,
        locale,
        client,
    })
}
