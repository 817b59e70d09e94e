use clap::Parser;

use lia_tasks_lib::{run, ServerArgs};

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();
    if let Err(e) = run(args).await {
        let _ = rolling_logger::error(&format!("server stopped: {}", e));
        eprintln!("lia-tasks-server: {}", e);
        std::process::exit(1);
    }
}
