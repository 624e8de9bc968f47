use crate::cli::commands::{build_outbox, close_outbox, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::business_day::parse_dmy;
use crate::core::checkin::CheckInLogic;
use crate::errors::AppResult;
use crate::notify::CheckInNotice;
use crate::ui::messages::success;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { token, date } = cmd {
        let clock = cfg.clock()?;
        let explicit = date.as_deref().map(parse_dmy).transpose()?;

        let mut pool = open_pool(cfg)?;
        let outcome = CheckInLogic::apply(&mut pool, &clock, token, explicit, Utc::now())?;

        let verb = if outcome.updated { "updated" } else { "recorded" };
        success(format!(
            "Check-in {verb} for '{}' on {} at {}",
            outcome.member.full_name,
            clock.format_date(outcome.recorded_at),
            clock.format_time(outcome.recorded_at)
        ));

        let outbox = build_outbox(cfg);
        outbox.publish(CheckInNotice::from_outcome(&outcome, &clock));
        close_outbox(outbox);
    }

    Ok(())
}
