use crate::cli::commands::{ask_confirmation, open_pool};
use crate::cli::parser::{AttendanceAction, Commands};
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::core::business_day::{format_dmy, parse_dmy};
use crate::core::member::MemberLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Attendance { action } = cmd else {
        return Ok(());
    };

    match action {
        AttendanceAction::Del {
            member_id,
            date,
            yes,
        } => {
            let clock = cfg.clock()?;
            let day = parse_dmy(date)?;
            let mut pool = open_pool(cfg)?;

            let member = MemberLogic::get(&mut pool, *member_id)?;
            let existing = AttendanceLogic::for_day(&mut pool, &clock, member.id, day)?;

            if existing.is_empty() {
                info(format!(
                    "No attendance for '{}' on {}.",
                    member.full_name,
                    format_dmy(day)
                ));
                return Ok(());
            }

            let prompt = format!(
                "Delete attendance of '{}' on {}? This action is irreversible.",
                member.full_name,
                format_dmy(day)
            );
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }

            let count = AttendanceLogic::delete_for_day(&mut pool, &clock, member.id, day)?;
            success(format!(
                "Deleted {count} attendance event(s) of '{}' on {}.",
                member.full_name,
                format_dmy(day)
            ));
        }
    }

    Ok(())
}
