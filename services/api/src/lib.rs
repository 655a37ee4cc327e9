mod cli;
mod demo;
mod infra;
mod render;
mod routes;
mod server;

use pwd_reports::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
