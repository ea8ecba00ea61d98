mod cli;
mod infra;
mod routes;
mod server;

use rielz::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
