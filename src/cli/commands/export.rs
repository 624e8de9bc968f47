use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let clock = cfg.clock()?;
        let mut pool = open_pool(cfg)?;
        let rows = ReportLogic::rows(&mut pool, &clock)?;
        ExportLogic::export_rows(&rows, *format, file, *force)?;
    }
    Ok(())
}
