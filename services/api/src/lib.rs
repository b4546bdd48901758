mod cli;
mod infra;
mod pages;
mod routes;
mod server;

use mlj_recruit::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
