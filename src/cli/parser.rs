use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for qrattend
/// QR attendance for a small community: members, scans and monthly reports
#[derive(Parser)]
#[command(
    name = "qrattend",
    version = env!("CARGO_PKG_VERSION"),
    about = "QR-code attendance tracking with SQLite: check-ins, member directory and monthly reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the member directory
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Record a check-in for a scanned QR token
    Checkin {
        /// QR token printed on the member card
        token: String,

        /// Record the check-in on a past day instead of now (DD/MM/YYYY)
        #[arg(long = "date", help = "Retroactive check-in day (DD/MM/YYYY)")]
        date: Option<String>,
    },

    /// Manage recorded attendance
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },

    /// Attendance reports
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// Export every attendance event as a flat report
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,

        /// Absolute output path
        #[arg(long)]
        file: String,

        #[arg(long, help = "Overwrite the output file without asking")]
        force: bool,
    },

    /// Handle one JSON request (from --request or stdin) and print the JSON response
    Api {
        #[arg(long = "request", help = "Request body; read from stdin when omitted")]
        request: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MemberAction {
    /// Register a member and print the generated QR token
    Add {
        /// Full name
        name: String,

        #[arg(long = "community", help = "Community number label")]
        community: Option<String>,
    },

    /// List members ordered by name
    List {
        #[arg(long = "community", help = "Only members of this community")]
        community: Option<String>,

        #[arg(long = "search", help = "Case-insensitive name search")]
        search: Option<String>,

        #[arg(long = "json", help = "Print the list as JSON")]
        json: bool,
    },

    /// Change a member's name or community
    Edit {
        id: i64,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "community", help = "New community label (empty string clears it)")]
        community: Option<String>,
    },

    /// Delete a member and all of their attendance
    Del {
        id: i64,

        #[arg(long = "yes", help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// Delete a member's attendance for one day
    Del {
        member_id: i64,

        /// Day to clear (DD/MM/YYYY)
        date: String,

        #[arg(long = "yes", help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportKind {
    /// Members × meeting days of one month
    Matrix {
        #[arg(long)]
        year: i32,

        /// Month 1-12
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        #[arg(long = "today", help = "Reference day for absences (DD/MM/YYYY)")]
        today: Option<String>,

        #[arg(long, value_enum, requires = "file")]
        format: Option<ExportFormat>,

        /// Absolute output path; prints a table when omitted
        #[arg(long)]
        file: Option<String>,

        #[arg(long)]
        force: bool,
    },
}
