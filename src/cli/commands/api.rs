use crate::api::Service;
use crate::cli::commands::{build_outbox, close_outbox, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use chrono::Utc;
use std::io::{self, Read};

/// Handle one JSON request. Only the response JSON goes to stdout;
/// diagnostics go to stderr.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Api { request } = cmd {
        let raw = match request {
            Some(r) => r.clone(),
            None => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let clock = cfg.clock()?;
        let calendar = cfg.calendar()?;
        let mut pool = open_pool(cfg)?;
        let outbox = build_outbox(cfg);

        let response = {
            let mut service = Service::new(&mut pool, clock, &calendar, &outbox);
            service.handle_json(&raw, Utc::now())
        };

        println!("{}", serde_json::to_string(&response)?);

        close_outbox(outbox);
    }

    Ok(())
}
