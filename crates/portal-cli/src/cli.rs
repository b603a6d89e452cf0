//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use portal_domain::model::RequestStatus;
use portal_types::{NoticeCategory, OutputFormat};

#[derive(Parser)]
#[command(name = "safety-portal")]
#[command(version)]
#[command(about = "Safety management portal: notice boards, equipment inventory, team scorecards and safety assistant")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Data directory override
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST server
    Serve {
        /// Listen address, e.g. 127.0.0.1:5000
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set server listen address
        #[arg(long)]
        set_bind: Option<String>,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set AI model
        #[arg(long)]
        set_ai_model: Option<String>,

        /// Set OpenAI-compatible API root
        #[arg(long)]
        set_ai_base_url: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Notice boards
    #[command(subcommand)]
    Notices(NoticeCommand),

    /// Team safety scorecards
    #[command(subcommand)]
    Teams(TeamCommand),

    /// Equipment inventory
    #[command(subcommand)]
    Equipment(EquipmentCommand),

    /// Equipment requests
    #[command(subcommand)]
    Requests(RequestCommand),

    /// Digital board slides
    #[command(subcommand)]
    Board(BoardCommand),

    /// Show or change the portal lock
    Lock {
        /// Lock the portal
        #[arg(long, conflicts_with = "off")]
        on: bool,

        /// Unlock the portal
        #[arg(long)]
        off: bool,
    },

    /// Ask the safety FAQ
    Faq {
        /// Question; lists suggested questions when omitted
        question: Option<String>,
    },

    /// Ask the AI safety assistant
    Chat {
        /// Message to send
        message: String,

        /// Continue an existing conversation
        #[arg(long, short = 'c')]
        conversation: Option<i64>,

        /// Server URL (defaults to the configured bind address)
        #[arg(long)]
        server: Option<String>,

        /// Answer locally without a running server
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Subcommand)]
pub enum NoticeCommand {
    /// List notices, newest first
    List {
        /// Category (notice, rule, edu, equipment, equip_status, equip_request, digital_board)
        #[arg(long, short = 'c')]
        category: Option<NoticeCategory>,
    },

    /// Post a notice
    Add {
        #[arg(long, short = 'c')]
        category: NoticeCategory,

        #[arg(long, short = 't')]
        title: String,

        /// Body text or JSON document
        #[arg(long, default_value = "")]
        content: String,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Delete a notice
    Remove { id: i64 },
}

#[derive(Subcommand)]
pub enum TeamCommand {
    /// Ranked scoreboard
    Board {
        /// Year (default: current year)
        #[arg(long, short = 'y')]
        year: Option<i32>,

        /// Also write the scoreboard to an Excel file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Register roster teams missing from a year
    Seed {
        #[arg(long, short = 'y')]
        year: Option<i32>,
    },

    /// Update a team's counters; the score is recomputed unless --total is given
    Set {
        id: i64,

        #[arg(long)]
        vehicles: Option<u32>,

        #[arg(long)]
        work_accident: Option<u32>,

        #[arg(long)]
        fine_speed: Option<u32>,

        #[arg(long)]
        fine_signal: Option<u32>,

        #[arg(long)]
        fine_lane: Option<u32>,

        #[arg(long)]
        inspection_miss: Option<u32>,

        #[arg(long)]
        suggestion: Option<u32>,

        #[arg(long)]
        activity: Option<u32>,

        /// Vehicle accident as PLATE=COUNT (repeatable)
        #[arg(long = "vehicle-accident", value_name = "PLATE=COUNT")]
        vehicle_accidents: Vec<String>,

        /// Explicit total score
        #[arg(long)]
        total: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum EquipmentCommand {
    /// Aggregated inventory
    Summary {
        /// Only this team's items
        #[arg(long, short = 't')]
        team: Option<String>,
    },

    /// Import a CSV sheet (팀명,용품명,카테고리,수량,상태)
    Import { file: PathBuf },

    /// Export the inventory to Excel
    Export {
        #[arg(long, short = 'o', default_value = "equipment.xlsx")]
        output: PathBuf,
    },

    /// Add an item to every team that lacks it
    BulkAdd {
        name: String,

        #[arg(long, short = 'q', default_value = "0")]
        quantity: u32,

        #[arg(long, short = 'c', default_value = "")]
        category: String,

        /// 등록/양호/불량 or registered/good/bad
        #[arg(long, short = 's', default_value = "등록")]
        status: String,
    },
}

#[derive(Subcommand)]
pub enum RequestCommand {
    /// Set the review state of an equipment request
    SetStatus {
        id: i64,

        /// pending/approved/rejected (or 대기중/승인/반려)
        status: RequestStatus,
    },
}

#[derive(Subcommand)]
pub enum BoardCommand {
    /// List slides
    List,

    /// Show one slide, or play the deck
    Show {
        /// Slide index (0-based)
        #[arg(long, short = 'i', default_value = "0")]
        index: usize,

        /// Cycle through every slide at the autoplay interval
        #[arg(long)]
        play: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_commands() {
        let cli = Cli::parse_from(["safety-portal", "--format", "json", "notices", "list", "-c", "equip_status"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Notices(NoticeCommand::List {
                category: Some(NoticeCategory::EquipStatus)
            })
        ));

        let cli = Cli::parse_from(["safety-portal", "requests", "set-status", "7", "승인"]);
        assert!(matches!(
            cli.command,
            Commands::Requests(RequestCommand::SetStatus {
                id: 7,
                status: RequestStatus::Approved
            })
        ));
    }
}
