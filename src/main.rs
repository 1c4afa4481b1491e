//! Binary entrypoint that launches the conversation API server.

use std::process::ExitCode;

use parley_agent::start_parley_agent;

fn main() -> ExitCode {
    start_parley_agent::run()
}
