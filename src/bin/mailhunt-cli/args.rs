use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "mailhunt-cli", version, about = "Find and verify e-mail addresses")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// output format
    #[arg(long, value_enum, default_value_t = Format::Human, global = true)]
    pub format: Format,

    /// write the report to this file instead of stdout (json/csv)
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// TOML file with an `[smtp]` section
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// name announced in HELO
    #[arg(long, global = true)]
    pub helo: Option<String>,

    /// envelope sender for MAIL FROM
    #[arg(long = "from", global = true)]
    pub mail_from: Option<String>,

    /// per-stage SMTP timeout (ms)
    #[arg(long = "timeout", global = true)]
    pub timeout_ms: Option<u64>,

    /// more logging on stderr (-v info, -vv debug); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// synthesise candidate addresses and probe them
    Generate {
        #[arg(long, default_value = "")]
        first: String,
        #[arg(long, default_value = "")]
        last: String,
        #[arg(long)]
        domain: String,
        #[arg(long)]
        company: Option<String>,
    },
    /// score a single address
    Verify {
        email: String,
        /// probe the mailbox over SMTP (and check for catch-all)
        #[arg(long)]
        deep: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
    Csv,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Filter directive chosen by `-v`, if any.
    pub fn log_directive(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            _ => Some("debug"),
        }
    }
}
