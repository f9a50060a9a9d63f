mod cli;
mod infra;
mod routes;
mod server;
mod validate;

use donations::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
