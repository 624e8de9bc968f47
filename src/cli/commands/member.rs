use crate::cli::commands::{ask_confirmation, open_pool};
use crate::cli::parser::{Commands, MemberAction};
use crate::config::Config;
use crate::core::member::MemberLogic;
use crate::db::queries::count_member_events;
use crate::errors::AppResult;
use crate::models::member::{MemberFilter, MemberInput};
use crate::ui::messages::{info, success};
use crate::utils::formatting::{community_or, pad_member_id};
use crate::utils::table::Table;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Member { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;

    match action {
        MemberAction::Add { name, community } => {
            let input = MemberInput::new(name.clone(), community.clone());
            let member = MemberLogic::add(&mut pool, &input, Utc::now())?;
            success(format!(
                "Member {} '{}' registered.",
                pad_member_id(member.id),
                member.full_name
            ));
            println!("🔑 QR code: {}", member.qr_code);
        }

        MemberAction::List {
            community,
            search,
            json,
        } => {
            let filter = MemberFilter {
                community: community.clone(),
                search: search.clone(),
            };
            let members = MemberLogic::list(&mut pool, &filter)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&members)?);
                return Ok(());
            }

            if members.is_empty() {
                info("No members found.");
                return Ok(());
            }

            let mut table = Table::new(&["ID", "Name", "Community", "QR code"]);
            for m in &members {
                table.add_row(vec![
                    pad_member_id(m.id),
                    m.full_name.clone(),
                    community_or(m.community_number.as_deref(), "-"),
                    m.qr_code.clone(),
                ]);
            }
            print!("{}", table.render());
            println!("\n{} member(s)", members.len());
        }

        MemberAction::Edit {
            id,
            name,
            community,
        } => {
            let current = MemberLogic::get(&mut pool, *id)?;
            let input = MemberInput::new(
                name.clone().unwrap_or(current.full_name),
                community.clone().or(current.community_number),
            );
            let member = MemberLogic::update(&mut pool, *id, &input)?;
            success(format!(
                "Member {} updated: '{}' ({})",
                pad_member_id(member.id),
                member.full_name,
                community_or(member.community_number.as_deref(), "no community")
            ));
        }

        MemberAction::Del { id, yes } => {
            let member = MemberLogic::get(&mut pool, *id)?;
            let events = count_member_events(&pool.conn, member.id)?;

            let prompt = format!(
                "Delete member '{}' and {} attendance event(s)? This action is irreversible.",
                member.full_name, events
            );
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }

            MemberLogic::delete(&mut pool, *id)?;
            success(format!("Member '{}' has been deleted.", member.full_name));
        }
    }

    Ok(())
}
