// ~/glasspane/glasspane-addon/src/main.rs

use glasspane::{cli::run_cli, error, info};

fn main() {
    match run_cli() {
        Ok(()) => info!("CLI exited normally"),
        Err(e) => {
            error!("CLI error: {e}");
            std::process::exit(1);
        }
    }
}
