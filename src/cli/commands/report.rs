use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, ReportKind};
use crate::config::Config;
use crate::core::business_day::{format_dmy, parse_dmy};
use crate::core::report::{AttendanceMatrix, Cell, ReportLogic};
use crate::errors::AppResult;
use crate::export::{ExportFormat, ExportLogic};
use crate::ui::messages::{header, info};
use crate::utils::date::month_name;
use crate::utils::formatting::{community_or, pad_member_id};
use crate::utils::table::Table;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Report { kind } = cmd else {
        return Ok(());
    };

    match kind {
        ReportKind::Matrix {
            year,
            month,
            today,
            format,
            file,
            force,
        } => {
            let clock = cfg.clock()?;
            let calendar = cfg.calendar()?;
            let today = match today {
                Some(s) => parse_dmy(s)?,
                None => clock.today(Utc::now()),
            };

            let mut pool = open_pool(cfg)?;
            // the command line takes 1-12, the projector 0-11
            let matrix =
                ReportLogic::matrix(&mut pool, &clock, &calendar, *year, month - 1, today)?;

            match file {
                Some(path) => ExportLogic::export_matrix(
                    &matrix,
                    &cfg.report,
                    format.unwrap_or(ExportFormat::Pdf),
                    path,
                    *force,
                )?,
                None => print_matrix(&matrix),
            }
        }
    }

    Ok(())
}

fn print_matrix(matrix: &AttendanceMatrix) {
    header(format!(
        "ASISTENCIA DE {} {}",
        month_name(matrix.month),
        matrix.year
    ));

    if matrix.dates.is_empty() {
        info("No meeting days in this month.");
        return;
    }

    let mut headers = vec!["ID".to_string(), "Name".to_string(), "Com".to_string()];
    headers.extend(matrix.dates.iter().map(|d| d.format("%d/%m").to_string()));
    headers.push("A".to_string());
    headers.push("F".to_string());

    let mut table = Table::new(&headers);
    for row in &matrix.rows {
        let mut cells = vec![
            pad_member_id(row.member.id),
            row.member.full_name.clone(),
            community_or(row.member.community_number.as_deref(), "-"),
        ];
        cells.extend(row.cells.iter().map(|c| c.symbol().to_string()));
        cells.push(row.count(Cell::Present).to_string());
        cells.push(row.count(Cell::Absent).to_string());
        table.add_row(cells);
    }

    print!("{}", table.render());
    println!("\nReference day: {}", format_dmy(matrix.today));
}
