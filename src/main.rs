//! Runs the todo service.
//!
//! Configure with `TODO_*` environment variables (or a `.env` file) and set
//! `RUST_LOG` for log verbosity:
//!
//!   RUST_LOG=info TODO_URL=http://localhost:8080/todos cargo run
//!
//! Try:
//!   curl -X POST http://localhost:8080/todos -d '{"title":"buy milk"}'
//!   curl -X PATCH http://localhost:8080/todos/1 -d '{"completed":true}'
//!   curl http://localhost:8080/todos

use todo_backend::service::TodoService;
use todo_backend::store::PgStore;
use todo_backend::{Config, Error, Server, middleware, transport};
use tracing::error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        error!("exit: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    let store = PgStore::connect(&config).await?;

    let svc = TodoService::new(store, &config.url).shared();
    let svc = middleware::logging()(svc);

    Server::bind(config.listen_addr()?)
        .await?
        .serve(transport::make_router(svc))
        .await
}
