//! Line-delimited JSON bridge: one request per stdin line, one reply per stdout line.
use std::io::{self, BufRead, Write};

use tracker_engine::{handle_json, SyncService};
use tracker_logging::tracker_info;

pub fn serve_stdio(service: &SyncService) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    tracker_info!("Serving requests on stdio");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = runtime.block_on(handle_json(service, &line));
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }

    tracker_info!("stdin closed; stopping");
    Ok(())
}
