use anyhow::Result;
use photarium::cli::{
    actions::{Action, server},
    start, telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start()?;

    match action {
        Action::Server(args) => server::execute(args).await?,
    }

    telemetry::shutdown_tracer();

    Ok(())
}
