//! Clap derive structures for the `fieldops` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fieldops -- CLI for telecom network operations
#[derive(Debug, Parser)]
#[command(
    name = "fieldops",
    version,
    about = "Manage telecom sites, equipment, interventions, and alerts",
    long_about = "A CLI for telecom network operations teams.\n\n\
        Talks to a hosted Postgres backend over its REST interface and\n\
        can expose a small read/write HTTP surface via `fieldops serve`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "FIELDOPS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend project URL (overrides profile)
    #[arg(long, short = 'b', env = "FIELDOPS_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Project anon key (overrides profile)
    #[arg(long, env = "FIELDOPS_ANON_KEY", global = true, hide_env = true)]
    pub anon_key: Option<String>,

    /// Sign-in email (overrides profile; omit for an anonymous session)
    #[arg(long, env = "FIELDOPS_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FIELDOPS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FIELDOPS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "FIELDOPS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage network sites (base stations)
    Sites(SitesArgs),

    /// Manage equipment installed at sites
    #[command(alias = "eq")]
    Equipment(EquipmentArgs),

    /// Manage maintenance interventions
    #[command(alias = "maint")]
    Interventions(InterventionsArgs),

    /// Manage alerts
    Alerts(AlertsArgs),

    /// Aggregated reports and breakdowns
    Reports(ReportsArgs),

    /// Export data as CSV or a combined JSON report
    Export(ExportArgs),

    /// Run the HTTP resource server
    Serve(ServeArgs),

    /// Show the signed-in user's profile
    Whoami,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List sites
    #[command(alias = "ls")]
    List {
        /// Filter by status (active, inactive, maintenance, fault)
        #[arg(long)]
        status: Option<String>,
    },

    /// Get site details, including installed equipment
    Get {
        /// Site ID (UUID) or site code
        site: String,
    },

    /// Create a new site
    Create {
        /// Site name
        #[arg(long, required = true)]
        name: String,

        /// Short site code (e.g. "ALG-001")
        #[arg(long, required = true)]
        code: String,

        /// Radio generation: 2G, 3G, 4G, or 5G
        #[arg(long, default_value = "4G")]
        generation: String,

        /// Initial status
        #[arg(long, default_value = "active")]
        status: String,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// Region / wilaya
        #[arg(long)]
        region: Option<String>,
    },

    /// Update an existing site
    Update {
        /// Site ID (UUID) or site code
        site: String,

        /// Site name
        #[arg(long)]
        name: Option<String>,

        /// Short site code
        #[arg(long)]
        code: Option<String>,

        /// Radio generation: 2G, 3G, 4G, or 5G
        #[arg(long)]
        generation: Option<String>,

        /// Status
        #[arg(long)]
        status: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// Region / wilaya
        #[arg(long)]
        region: Option<String>,
    },

    /// Delete a site
    Delete {
        /// Site ID (UUID) or site code
        site: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EQUIPMENT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EquipmentArgs {
    #[command(subcommand)]
    pub command: EquipmentCommand,
}

#[derive(Debug, Subcommand)]
pub enum EquipmentCommand {
    /// List equipment units
    #[command(alias = "ls")]
    List {
        /// Filter by status (operational, faulty, maintenance, offline)
        #[arg(long)]
        status: Option<String>,

        /// Filter by site (UUID or site code)
        #[arg(long)]
        site: Option<String>,
    },

    /// Get equipment details
    Get {
        /// Equipment ID (UUID) or serial number
        unit: String,
    },

    /// Register a new equipment unit
    Create {
        /// Equipment name
        #[arg(long, required = true)]
        name: String,

        /// Serial number
        #[arg(long, required = true)]
        serial: String,

        /// Equipment type (antenna, transmitter, receiver, amplifier,
        /// power_supply, cooling, other)
        #[arg(long, default_value = "antenna")]
        kind: String,

        /// Initial status
        #[arg(long, default_value = "operational")]
        status: String,

        /// Host site (UUID or site code)
        #[arg(long, required = true)]
        site: String,

        /// Manufacturer brand
        #[arg(long)]
        brand: Option<String>,

        /// Model designation
        #[arg(long)]
        model: Option<String>,

        /// Installation date (YYYY-MM-DD)
        #[arg(long)]
        installed: Option<String>,
    },

    /// Update an equipment unit
    Update {
        /// Equipment ID (UUID) or serial number
        unit: String,

        /// Equipment name
        #[arg(long)]
        name: Option<String>,

        /// Serial number
        #[arg(long)]
        serial: Option<String>,

        /// Equipment type
        #[arg(long)]
        kind: Option<String>,

        /// Status
        #[arg(long)]
        status: Option<String>,

        /// Host site (UUID or site code)
        #[arg(long)]
        site: Option<String>,

        /// Manufacturer brand
        #[arg(long)]
        brand: Option<String>,

        /// Model designation
        #[arg(long)]
        model: Option<String>,

        /// Installation date (YYYY-MM-DD)
        #[arg(long)]
        installed: Option<String>,
    },

    /// Delete an equipment unit
    Delete {
        /// Equipment ID (UUID) or serial number
        unit: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INTERVENTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InterventionsArgs {
    #[command(subcommand)]
    pub command: InterventionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum InterventionsCommand {
    /// List interventions
    #[command(alias = "ls")]
    List {
        /// Filter by status (scheduled, in_progress, completed, cancelled)
        #[arg(long)]
        status: Option<String>,
    },

    /// Get intervention details
    Get {
        /// Intervention ID (UUID)
        id: String,
    },

    /// Schedule a new intervention
    Create {
        /// Intervention title
        #[arg(long, required = true)]
        title: String,

        /// Type (preventive, corrective, installation, replacement)
        #[arg(long, default_value = "preventive")]
        kind: String,

        /// Priority (low, medium, high, critical)
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Initial status
        #[arg(long, default_value = "scheduled")]
        status: String,

        /// Target site (UUID or site code)
        #[arg(long, required = true)]
        site: String,

        /// Target equipment (UUID or serial number)
        #[arg(long)]
        equipment: Option<String>,

        /// Assigned technician's profile ID (UUID)
        #[arg(long)]
        assign: Option<String>,

        /// Scheduled date (RFC 3339, e.g. 2025-07-01T09:00:00Z)
        #[arg(long)]
        scheduled: Option<String>,

        /// Estimated duration in whole hours
        #[arg(long)]
        hours: Option<u32>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// Update an intervention
    Update {
        /// Intervention ID (UUID)
        id: String,

        /// Title
        #[arg(long)]
        title: Option<String>,

        /// Type
        #[arg(long)]
        kind: Option<String>,

        /// Priority
        #[arg(long)]
        priority: Option<String>,

        /// Status
        #[arg(long)]
        status: Option<String>,

        /// Target site (UUID or site code)
        #[arg(long)]
        site: Option<String>,

        /// Target equipment (UUID or serial number)
        #[arg(long)]
        equipment: Option<String>,

        /// Assigned technician's profile ID (UUID)
        #[arg(long)]
        assign: Option<String>,

        /// Scheduled date (RFC 3339)
        #[arg(long)]
        scheduled: Option<String>,

        /// Completion date (RFC 3339)
        #[arg(long)]
        completed: Option<String>,

        /// Estimated duration in whole hours
        #[arg(long)]
        hours: Option<u32>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an intervention
    Delete {
        /// Intervention ID (UUID)
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALERTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts
    #[command(alias = "ls")]
    List {
        /// Filter by status (active, acknowledged, resolved)
        #[arg(long)]
        status: Option<String>,

        /// Filter by severity (info, warning, critical)
        #[arg(long)]
        severity: Option<String>,
    },

    /// Get alert details
    Get {
        /// Alert ID (UUID)
        id: String,
    },

    /// Raise a new alert
    Create {
        /// Alert title
        #[arg(long, required = true)]
        title: String,

        /// Alert message body
        #[arg(long, required = true)]
        message: String,

        /// Type (equipment_fault, maintenance_due, security_breach,
        /// power_failure, network_issue)
        #[arg(long, required = true)]
        kind: String,

        /// Severity
        #[arg(long, default_value = "warning")]
        severity: String,

        /// Related site (UUID or site code)
        #[arg(long)]
        site: Option<String>,

        /// Related equipment (UUID or serial number)
        #[arg(long)]
        equipment: Option<String>,
    },

    /// Acknowledge an active alert (requires a signed-in user)
    Ack {
        /// Alert ID (UUID)
        id: String,
    },

    /// Resolve an alert (requires a signed-in user)
    Resolve {
        /// Alert ID (UUID)
        id: String,
    },

    /// Delete an alert
    Delete {
        /// Alert ID (UUID)
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// Headline counters across all entities
    Summary,

    /// Site counts by status
    SiteStatus,

    /// Equipment counts by status
    EquipmentStatus,

    /// Alert counts by severity
    AlertSeverity,

    /// Six-month maintenance trend
    Maintenance,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(subcommand)]
    pub command: ExportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Export one table as CSV
    Csv {
        /// Table to export
        table: ExportTable,

        /// Write to a file instead of stdout
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Export the combined JSON report (summary + all tables)
    Report {
        /// Write to a file instead of stdout
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportTable {
    Sites,
    Equipment,
    Interventions,
    Alerts,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8787")]
    pub bind: String,

    /// Snapshot refresh interval in seconds (0 disables)
    #[arg(long, default_value = "30")]
    pub refresh: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display the current configuration (passwords masked)
    Show,

    /// Set one field on a profile
    Set {
        /// Field to set (backend, anon-key, anon-key-env, email, ca-cert, insecure, timeout)
        key: String,
        /// New value
        value: String,
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
