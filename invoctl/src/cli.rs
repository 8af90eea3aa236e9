use std::path::PathBuf;

use invo::entry::Condition;
use invo::{CategoryKind, Decimal, FinancialKind, Slug};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Invo control
#[derive(Clone, Debug, Parser)]
#[command(version, infer_subcommands = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Sets a custom config directory
    ///
    /// The default value is $INVO_CONFIG if it is set, or
    /// $XDG_CONFIG_HOME/invo otherwise
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub config: Option<PathBuf>,

    /// Sets a custom data directory
    ///
    /// The default value is $INVO_DATA if it is set, or
    /// $XDG_DATA_HOME/invo otherwise
    #[arg(
        short = 'D',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub data: Option<PathBuf>,

    /// Sets the profile to consider for the following command
    ///
    /// A default value can be configured
    #[arg(
        short = 'P',
        long,
        value_name = "NAME",
        global = true,
        help_heading = "Global options"
    )]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Profile related commands
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Ledger entry related commands
    Entry {
        #[command(subcommand)]
        command: EntryCommands,
    },
    /// Category related commands
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Subcategory related commands
    Subcategory {
        #[command(subcommand)]
        command: SubcategoryCommands,
    },
    /// Beneficiary related commands
    Beneficiary {
        #[command(subcommand)]
        command: BeneficiaryCommands,
    },
    /// Client related commands
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Cost center and bank account related commands
    Financial {
        #[command(subcommand)]
        command: FinancialCommands,
    },
    /// Show the balance report of a cycle
    Report(ReportArgs),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommands {
    /// List registered profiles
    List {},
    /// Create a new profile
    Create {
        /// Name of the new profile
        name: String,
    },
    /// Check or set the default profile
    Default {
        /// Make this profile the default one
        name: Option<String>,
        /// Reset the default profile
        #[arg(short, long, conflicts_with = "name")]
        reset: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum EntryCommands {
    /// Post a new entry to the ledger
    Add {
        /// Amount of the entry
        ///
        /// A positive magnitude, the subcategory's kind carries the sign
        amount: Decimal,

        /// Date of the entry
        #[arg(long, value_name = "DATE")]
        date: NaiveDate,

        /// Subcategory the entry posts against
        #[arg(long, value_name = "SLUG")]
        subcategory: Slug,

        /// Beneficiary of the entry
        #[arg(long, value_name = "SLUG")]
        beneficiary: Option<Slug>,

        /// Client the entry relates to
        #[arg(long, value_name = "SLUG")]
        client: Option<Slug>,

        /// Cost center the entry posts against
        #[arg(long, value_name = "SLUG")]
        cost_center: Option<Slug>,

        /// Bank account the entry posts against
        #[arg(long, value_name = "SLUG")]
        account: Option<Slug>,

        /// Describe the entry
        #[arg(short, long, default_value = "")]
        description: String,

        /// Mark the entry as not settled yet
        #[arg(long)]
        pending: bool,
    },
    /// Amend an entry
    Change {
        /// Id of the entry
        id: i64,

        /// New date
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        /// New amount
        #[arg(long)]
        amount: Option<Decimal>,

        /// New subcategory
        #[arg(long, value_name = "SLUG")]
        subcategory: Option<Slug>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New settlement condition
        #[arg(long)]
        condition: Option<Condition>,

        /// New beneficiary
        #[arg(long, value_name = "SLUG")]
        beneficiary: Option<Slug>,

        /// Remove the beneficiary
        #[arg(long, conflicts_with = "beneficiary")]
        no_beneficiary: bool,

        /// New client
        #[arg(long, value_name = "SLUG")]
        client: Option<Slug>,

        /// Remove the client
        #[arg(long, conflicts_with = "client")]
        no_client: bool,

        /// New cost center
        #[arg(long, value_name = "SLUG")]
        cost_center: Option<Slug>,

        /// Remove the cost center
        #[arg(long, conflicts_with = "cost_center")]
        no_cost_center: bool,

        /// New bank account
        #[arg(long, value_name = "SLUG")]
        account: Option<Slug>,

        /// Remove the bank account
        #[arg(long, conflicts_with = "account")]
        no_account: bool,
    },
    /// Soft-delete an entry
    Remove {
        /// Id of the entry
        id: i64,

        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
    /// List the entries of a month
    List {
        /// Month to display, defaults to the current one
        #[arg(short, long)]
        month: Option<u32>,

        /// Year to display, defaults to the current one
        #[arg(short, long)]
        year: Option<i32>,

        /// Page to display
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CategoryCommands {
    /// List active categories
    List {},
    /// Create a new category
    Create {
        /// Name of the new category
        name: String,

        /// Whether entries of this category are income or expenses
        #[arg(long)]
        kind: CategoryKind,
    },
    /// Delete a category
    Delete {
        /// Slug of the category
        slug: Slug,

        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SubcategoryCommands {
    /// List active subcategories
    List {
        /// Only the subcategories of this category
        #[arg(long, value_name = "SLUG")]
        category: Option<Slug>,
    },
    /// Create a new subcategory
    Create {
        /// Category the subcategory belongs to
        category: Slug,

        /// Name of the new subcategory
        name: String,
    },
    /// Delete a subcategory
    Delete {
        /// Slug of the subcategory
        slug: Slug,

        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum BeneficiaryCommands {
    /// List active beneficiaries
    List {},
    /// List beneficiary groups
    Groups {},
    /// Create a new beneficiary group
    AddGroup {
        /// Description of the new group
        description: String,
    },
    /// Create a new beneficiary
    Create {
        /// Name of the new beneficiary
        name: String,

        /// Group the beneficiary belongs to
        #[arg(long, value_name = "SLUG")]
        group: Slug,
    },
    /// Delete a beneficiary
    Delete {
        /// Slug of the beneficiary
        slug: Slug,

        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClientCommands {
    /// List active clients
    List {},
    /// Create a new client
    Create {
        /// Name of the new client
        name: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Person responsible on the client side
        #[arg(long)]
        contact: Option<String>,
    },
    /// Delete a client
    Delete {
        /// Slug of the client
        slug: Slug,

        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum FinancialCommands {
    /// List active cost centers and bank accounts
    List {
        /// Only financials of this kind
        #[arg(long)]
        kind: Option<FinancialKind>,
    },
    /// Create a new cost center or bank account
    Create {
        /// Cost center name or bank name
        label: String,

        #[arg(long)]
        kind: FinancialKind,

        /// Bank branch, for bank accounts
        #[arg(long)]
        branch: Option<String>,

        /// Account number, for bank accounts
        #[arg(long)]
        number: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a cost center or bank account
    Delete {
        /// Slug of the financial
        slug: Slug,

        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Month of the cycle, defaults to the current one
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Year of the cycle, defaults to the current one
    #[arg(short, long)]
    pub year: Option<i32>,
}
