use kokoro_conversation::LocalStorage;

use super::CommandStrategy;

/// Input parameters for the Login command strategy.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Strategy for signing in.
///
/// Authentication is a local mock: the credentials are checked against
/// the built-in account and only a flag is persisted. No network call.
#[derive(Debug, Clone, Copy)]
pub struct LoginStrategy;

impl CommandStrategy for LoginStrategy {
    type Input = LoginInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let storage = LocalStorage::open_default()?;
        let mut auth = storage.load_auth()?;

        if !auth.login(&input.username, &input.password) {
            anyhow::bail!("Invalid username or password.");
        }

        storage.save_auth(&auth)?;
        println!("Signed in as {}.", input.username);
        Ok(())
    }
}

/// Strategy for signing out. Clears the persisted auth flag.
#[derive(Debug, Clone, Copy)]
pub struct LogoutStrategy;

impl CommandStrategy for LogoutStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let storage = LocalStorage::open_default()?;
        let mut auth = storage.load_auth()?;
        auth.logout();
        storage.save_auth(&auth)?;
        println!("Signed out.");
        Ok(())
    }
}
