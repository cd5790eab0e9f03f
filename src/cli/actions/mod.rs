pub mod seed;
pub mod server;

// The match over `Action` lives in run.rs.
mod run;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    Seed(seed::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
