// Volunteer CLI Entry Point

use volunteer_cli::{output, router::CommandRouter};

#[tokio::main]
async fn main() {
    if let Err(e) = CommandRouter::route().await {
        tracing::debug!(details = %e.technical_details(), "Command failed");
        output::print_error(&e.user_message());
        std::process::exit(1);
    }
}
