use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use payshare::aggregate::{aggregate, breakdown, ProfitShares};
use payshare::config::{
    config_dir, data_dir, load_config, resolve_output_dir, Config, PeriodStore, TomlPeriodStore,
    CONFIG_TEMPLATE, EMPTY_DATA,
};
use payshare::error::{LedgerError, Result, ValidationError};
use payshare::import::{import_expenses, import_income, EXPENSE_TEMPLATE, INCOME_TEMPLATE};
use payshare::models::{month_name, parse_date, Member, PeriodSelection, ReportPeriod, Role};
use payshare::report::{
    format_currency, format_percentage, generate_csv, generate_report, Artifact, ReportFormat,
};
use payshare::source::{load_inputs, EntrySource, HttpSource, JsonDirSource, ReportInputs};

#[derive(Parser)]
#[command(name = "payshare")]
#[command(
    version,
    about = "Freelancer income and expense reports with profit sharing",
    long_about = None
)]
struct Cli {
    /// Path to config directory (default: ~/.payshare or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Print diagnostic details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// Month to report on (YYYY-MM)
    #[arg(long, conflicts_with_all = ["quarter", "year", "from", "to"])]
    month: Option<String>,

    /// Quarter to report on (YYYY-Qn)
    #[arg(long, conflicts_with_all = ["year", "from", "to"])]
    quarter: Option<String>,

    /// Calendar year to report on
    #[arg(long, conflicts_with_all = ["from", "to"])]
    year: Option<i32>,

    /// Start of a custom range (YYYY-MM-DD, inclusive)
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// End of a custom range (YYYY-MM-DD, inclusive)
    #[arg(long, requires = "from")]
    to: Option<String>,
}

impl PeriodArgs {
    fn selection(&self) -> Result<Option<PeriodSelection>> {
        if let Some(month) = &self.month {
            return Ok(Some(PeriodSelection::parse_month(month)?));
        }
        if let Some(quarter) = &self.quarter {
            return Ok(Some(PeriodSelection::parse_quarter(quarter)?));
        }
        if let Some(year) = self.year {
            let selection = PeriodSelection::Yearly { year };
            selection.period()?;
            return Ok(Some(selection));
        }
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            return Ok(Some(PeriodSelection::custom(
                parse_date(from)?,
                parse_date(to)?,
            )?));
        }
        Ok(None)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EntryKind {
    Income,
    Expense,
}

#[derive(Subcommand)]
enum PeriodAction {
    /// Show the remembered report period
    Show,

    /// Remember a report period for later commands
    Set {
        #[command(flatten)]
        period: PeriodArgs,
    },
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show or change the remembered report period
    Period {
        #[command(subcommand)]
        action: PeriodAction,
    },

    /// Show totals, breakdowns and profit shares for a period
    Summary {
        #[command(flatten)]
        period: PeriodArgs,

        /// Fetch entries from the configured backend instead of the data directory
        #[arg(long)]
        remote: bool,
    },

    /// Generate the income and expense report document
    Report {
        #[command(flatten)]
        period: PeriodArgs,

        /// Write a plain-text report instead of the configured format
        #[arg(long)]
        text: bool,

        /// Custom output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated report with system default viewer
        #[arg(long)]
        open: bool,

        /// Fetch entries from the configured backend instead of the data directory
        #[arg(long)]
        remote: bool,
    },

    /// Export income and expense entries as CSV
    Csv {
        #[command(flatten)]
        period: PeriodArgs,

        /// Custom output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fetch entries from the configured backend instead of the data directory
        #[arg(long)]
        remote: bool,
    },

    /// Check a collaboration's share percentages, optionally adding a member
    Shares {
        /// Collaboration id or name
        collaboration: String,

        /// Member to add in format "user:percentage" (e.g., 'ana@example.com:25')
        #[arg(long, value_name = "USER:PCT")]
        add: Option<String>,

        /// Role for the added member
        #[arg(long, value_enum, default_value = "member")]
        role: RoleArg,
    },

    /// Import entries from a CSV file into the data directory
    Import {
        #[arg(value_enum)]
        kind: EntryKind,

        /// CSV file shaped like the output of 'payshare template'
        file: PathBuf,
    },

    /// Print the CSV import template
    Template {
        #[arg(value_enum)]
        kind: EntryKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Member,
    Viewer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Member => Role::Member,
            RoleArg::Viewer => Role::Viewer,
        }
    }
}

/// Shared by every command
struct Context {
    cfg_dir: PathBuf,
    verbose: bool,
}

impl Context {
    fn note(&self, message: impl AsRef<str>) {
        if self.verbose {
            eprintln!("[payshare] {}", message.as_ref());
        }
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.cfg_dir.exists() {
            return Err(LedgerError::ConfigNotFound(self.cfg_dir.clone()));
        }
        Ok(())
    }

    fn local_source(&self) -> JsonDirSource {
        JsonDirSource::new(data_dir(&self.cfg_dir))
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    let ctx = Context {
        cfg_dir,
        verbose: cli.verbose,
    };
    ctx.note(format!("config directory: {}", ctx.cfg_dir.display()));

    match cli.command {
        Commands::Init => cmd_init(&ctx),
        Commands::Period { action } => match action {
            PeriodAction::Show => cmd_period_show(&ctx),
            PeriodAction::Set { period } => cmd_period_set(&ctx, &period),
        },
        Commands::Summary { period, remote } => cmd_summary(&ctx, &period, remote),
        Commands::Report {
            period,
            text,
            output,
            open,
            remote,
        } => cmd_report(&ctx, &period, text, output, open, remote),
        Commands::Csv {
            period,
            output,
            remote,
        } => cmd_csv(&ctx, &period, output, remote),
        Commands::Shares {
            collaboration,
            add,
            role,
        } => cmd_shares(&ctx, &collaboration, add.as_deref(), role.into()),
        Commands::Import { kind, file } => cmd_import(&ctx, kind, &file),
        Commands::Template { kind } => {
            match kind {
                EntryKind::Income => print!("{INCOME_TEMPLATE}"),
                EntryKind::Expense => print!("{EXPENSE_TEMPLATE}"),
            }
            Ok(())
        }
    }
}

/// Initialize config directory with template files
fn cmd_init(ctx: &Context) -> Result<()> {
    use std::fs;

    let cfg_dir = &ctx.cfg_dir;
    if cfg_dir.exists() {
        return Err(LedgerError::AlreadyInitialized(cfg_dir.clone()));
    }

    // Create directories
    let data = data_dir(cfg_dir);
    fs::create_dir_all(&data)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    // Write template files
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    for name in ["income.json", "expenses.json", "collaborations.json"] {
        fs::write(data.join(name), EMPTY_DATA)?;
    }

    println!("Initialized payshare config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Review report settings:     $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Import your entries:        payshare import income <file.csv>"
    );
    println!(
        "  3. Describe collaborations in: {}/collaborations.json",
        data.display()
    );
    println!();
    println!("Then generate your first report:");
    println!("  payshare report --month <YYYY-MM>");

    Ok(())
}

/// Explicit flags win, then the remembered period, then the current month
fn resolve_period(ctx: &Context, args: &PeriodArgs) -> Result<ReportPeriod> {
    let selection = match args.selection()? {
        Some(selection) => selection,
        None => match TomlPeriodStore::new(&ctx.cfg_dir).load_period()? {
            Some(saved) => {
                ctx.note("using remembered period");
                saved
            }
            None => PeriodSelection::current_month(chrono::Local::now().date_naive()),
        },
    };
    Ok(selection.period()?)
}

fn cmd_period_show(ctx: &Context) -> Result<()> {
    ctx.ensure_initialized()?;

    match TomlPeriodStore::new(&ctx.cfg_dir).load_period()? {
        Some(selection) => {
            let period = selection.period()?;
            println!(
                "Report period: {} ({} to {})",
                period.label(),
                period.start(),
                period.last_day()
            );
        }
        None => println!("No report period set. Reports default to the current month."),
    }
    Ok(())
}

fn cmd_period_set(ctx: &Context, args: &PeriodArgs) -> Result<()> {
    ctx.ensure_initialized()?;

    let selection = args.selection()?.ok_or_else(|| {
        ValidationError::InvalidPeriod(
            "use one of --month, --quarter, --year or --from/--to".to_string(),
        )
    })?;
    let period = selection.period()?;
    TomlPeriodStore::new(&ctx.cfg_dir).save_period(selection)?;

    println!("Report period set to {}", period.label());
    Ok(())
}

fn open_source(ctx: &Context, config: &Config, remote: bool) -> Result<Box<dyn EntrySource>> {
    if remote {
        let source = HttpSource::from_settings(&config.backend)?;
        ctx.note("fetching entries from backend");
        Ok(Box::new(source))
    } else {
        let source = ctx.local_source();
        ctx.note(format!("reading entries from {}", source.dir().display()));
        Ok(Box::new(source))
    }
}

fn fetch(ctx: &Context, source: &dyn EntrySource, period: &ReportPeriod) -> Result<ReportInputs> {
    let inputs = load_inputs(source, period)?;
    ctx.note(format!(
        "{}: {} income, {} expense entries, {} collaborations",
        period.label(),
        inputs.income.len(),
        inputs.expenses.len(),
        inputs.collaborations.len()
    ));
    Ok(inputs)
}

// Table row structs for tabled
#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "TYPE")]
    kind: &'static str,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "COUNT")]
    count: usize,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "MONTH")]
    month: String,
    #[tabled(rename = "INCOME")]
    income: String,
    #[tabled(rename = "EXPENSES")]
    expenses: String,
    #[tabled(rename = "PROFIT")]
    profit: String,
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "MEMBER")]
    member: String,
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "SHARE")]
    share: String,
    #[tabled(rename = "PROFIT SHARE")]
    amount: String,
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "MEMBER")]
    member: String,
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "SHARE")]
    share: String,
}

fn format_grouped_int(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// On-screen money: thousands separators, two decimals. Exports never group.
fn format_screen_amount(value: f64, currency_symbol: &str) -> String {
    let plain = format_currency(value, "");
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, "00"));
    let grouped = format_grouped_int(whole);

    format!("{sign}{currency_symbol}{grouped}.{frac}")
}

fn cmd_summary(ctx: &Context, args: &PeriodArgs, remote: bool) -> Result<()> {
    ctx.ensure_initialized()?;

    let config = load_config(&ctx.cfg_dir)?;
    let symbol = config.report.currency_symbol.as_str();
    let period = resolve_period(ctx, args)?;
    let source = open_source(ctx, &config, remote)?;
    let inputs = fetch(ctx, source.as_ref(), &period)?;

    let result = aggregate(&inputs.income, &inputs.expenses, &inputs.collaborations);
    let totals = result.totals;

    println!("Summary for {}", period.label());
    println!("{}", "-".repeat(50));
    println!("Total income:    {}", format_screen_amount(totals.total_income, symbol));
    println!("Total expenses:  {}", format_screen_amount(totals.total_expenses, symbol));
    println!("Net profit:      {}", format_screen_amount(totals.net_profit, symbol));
    println!(
        "Profit margin:   {:.1}%",
        breakdown::profit_margin(&totals)
    );
    println!(
        "Entries:         {} income, {} expenses",
        inputs.income.len(),
        inputs.expenses.len()
    );

    match source.overview(&period)? {
        Some(server) if server.agrees_with(&totals) => println!("Server totals:   match"),
        Some(server) => println!(
            "Warning: server totals differ (income {}, expenses {}, net {})",
            format_screen_amount(server.total_income, symbol),
            format_screen_amount(server.total_expenses, symbol),
            format_screen_amount(server.net_profit, symbol)
        ),
        None => {}
    }

    println!();
    println!("Income by status:");
    for status in breakdown::income_by_status(&inputs.income) {
        println!(
            "  {:<8} {} ({})",
            status.status.to_string(),
            format_screen_amount(status.total, symbol),
            status.count
        );
    }

    let split = breakdown::tax_deductible_split(&inputs.expenses);
    println!(
        "Tax-deductible expenses: {} (non-deductible {})",
        format_screen_amount(split.deductible, symbol),
        format_screen_amount(split.non_deductible, symbol)
    );

    let categories: Vec<CategoryRow> = breakdown::income_by_category(&inputs.income)
        .into_iter()
        .map(|c| ("Income", c))
        .chain(
            breakdown::expenses_by_category(&inputs.expenses)
                .into_iter()
                .map(|c| ("Expense", c)),
        )
        .map(|(kind, c)| CategoryRow {
            kind,
            category: c.category,
            count: c.count,
            total: format_screen_amount(c.total, symbol),
        })
        .collect();

    if !categories.is_empty() {
        println!();
        println!("{}", Table::new(categories).with(Style::rounded()));
    }

    let months = breakdown::monthly_trend(&period, &inputs.income, &inputs.expenses);
    if months.len() > 1 {
        let rows: Vec<MonthRow> = months
            .into_iter()
            .map(|m| MonthRow {
                month: format!("{} {}", month_name(m.month), m.year),
                income: format_screen_amount(m.income, symbol),
                expenses: format_screen_amount(m.expenses, symbol),
                profit: format_screen_amount(m.profit, symbol),
            })
            .collect();
        println!();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    for (collaboration, computed) in inputs.collaborations.iter().zip(&result.collaborations) {
        println!();
        println!("Profit sharing: {}", collaboration.name);

        match &computed.shares {
            ProfitShares::NoProfit => {
                println!("  No net profit to distribute for this period.");
            }
            ProfitShares::Distributed(shares) => {
                let rows: Vec<ShareRow> = collaboration
                    .members
                    .iter()
                    .zip(shares)
                    .map(|(member, share)| ShareRow {
                        member: share.name.clone(),
                        role: member.role.to_string(),
                        share: format!("{}%", format_percentage(share.share_percentage)),
                        amount: format_screen_amount(share.amount, symbol),
                    })
                    .collect();
                if rows.is_empty() {
                    println!("  No members.");
                } else {
                    println!("{}", Table::new(rows).with(Style::rounded()));
                }
            }
        }
    }

    Ok(())
}

/// Write an artifact to `output` or into the configured output directory
fn save_artifact(
    ctx: &Context,
    config: &Config,
    artifact: &Artifact,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let path = match output {
        Some(path) => path,
        None => {
            let output_dir = resolve_output_dir(&config.export.output_dir, &ctx.cfg_dir);
            std::fs::create_dir_all(&output_dir)?;
            output_dir.join(&artifact.file_name)
        }
    };

    std::fs::write(&path, &artifact.bytes)?;
    ctx.note(format!("wrote {} bytes", artifact.bytes.len()));
    Ok(path)
}

fn cmd_report(
    ctx: &Context,
    args: &PeriodArgs,
    text: bool,
    output: Option<PathBuf>,
    open: bool,
    remote: bool,
) -> Result<()> {
    ctx.ensure_initialized()?;

    let config = load_config(&ctx.cfg_dir)?;
    let period = resolve_period(ctx, args)?;
    let source = open_source(ctx, &config, remote)?;
    let inputs = fetch(ctx, source.as_ref(), &period)?;

    let today = chrono::Local::now().date_naive();
    let mut options = config.report_options(today);
    if text {
        options.format = ReportFormat::Text;
    }

    let artifact = generate_report(
        &period,
        &inputs.income,
        &inputs.expenses,
        &inputs.collaborations,
        &options,
    )?;
    let path = save_artifact(ctx, &config, &artifact, output)?;

    let totals = payshare::compute_totals(&inputs.income, &inputs.expenses);

    // Print summary
    println!("Generated {}", artifact.file_name);
    println!("  Period:     {}", period.label());
    println!("  Income:     {} entries", inputs.income.len());
    println!("  Expenses:   {} entries", inputs.expenses.len());
    println!(
        "  Net profit: {}",
        format_screen_amount(totals.net_profit, &config.report.currency_symbol)
    );
    println!("  Saved:      {}", path.display());

    if open {
        open_path(&path)?;
    }

    Ok(())
}

fn cmd_csv(ctx: &Context, args: &PeriodArgs, output: Option<PathBuf>, remote: bool) -> Result<()> {
    ctx.ensure_initialized()?;

    let config = load_config(&ctx.cfg_dir)?;
    let period = resolve_period(ctx, args)?;
    let source = open_source(ctx, &config, remote)?;
    let inputs = fetch(ctx, source.as_ref(), &period)?;

    let today = chrono::Local::now().date_naive();
    let artifact = generate_csv(&inputs.income, &inputs.expenses, today)?;
    let path = save_artifact(ctx, &config, &artifact, output)?;

    println!(
        "Exported {} rows for {}",
        inputs.income.len() + inputs.expenses.len(),
        period.label()
    );
    println!("  Saved: {}", path.display());

    Ok(())
}

/// Parse "user:percentage". The user part may itself contain ':'.
fn parse_member_input(input: &str, role: Role) -> Result<Member> {
    let (user, share) = input
        .rsplit_once(':')
        .ok_or_else(|| ValidationError::InvalidMember(input.to_string()))?;

    let share: f64 = share
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| ValidationError::InvalidMember(input.to_string()))?;

    Ok(Member::new(user.trim(), role, share))
}

fn cmd_shares(ctx: &Context, reference: &str, add: Option<&str>, role: Role) -> Result<()> {
    ctx.ensure_initialized()?;

    let source = ctx.local_source();
    let mut collaborations = source.collaborations()?;
    let idx = collaborations
        .iter()
        .position(|c| c.matches(reference))
        .ok_or_else(|| LedgerError::CollaborationNotFound(reference.to_string()))?;

    if let Some(input) = add {
        let member = parse_member_input(input, role)?;
        let name = member.display_name();
        let share = member.share_percentage;

        // Rejected members are never written back
        let check = collaborations[idx].add_member(member)?;
        source.save_collaborations(&collaborations)?;

        println!("Added {} with {}% share", name, format_percentage(share));
        if let Some(warning) = check.warning() {
            println!("Warning: {warning}");
        }
    }

    let collaboration = &collaborations[idx];
    println!("Collaboration: {}", collaboration.name);

    if collaboration.members.is_empty() {
        println!("  No members.");
    } else {
        let rows: Vec<MemberRow> = collaboration
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| MemberRow {
                index: i + 1,
                member: m.display_name(),
                role: m.role.to_string(),
                share: format!("{}%", format_percentage(m.share_percentage)),
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    let total = collaboration.total_share();
    match payshare::validate_shares(&collaboration.members, None) {
        Ok(check) => match check.warning() {
            Some(warning) => println!("Warning: {warning}"),
            None => println!("Total share: {}%", format_percentage(total)),
        },
        Err(e) => println!("Warning: {e}"),
    }

    Ok(())
}

fn cmd_import(ctx: &Context, kind: EntryKind, file: &Path) -> Result<()> {
    ctx.ensure_initialized()?;

    let source = ctx.local_source();
    let reader = File::open(file)?;

    let (added, label) = match kind {
        EntryKind::Income => (source.append_income(import_income(reader)?)?, "income"),
        EntryKind::Expense => (source.append_expenses(import_expenses(reader)?)?, "expense"),
    };

    println!(
        "Imported {} {} entries into {}",
        added,
        label,
        source.dir().display()
    );
    Ok(())
}

fn open_path(path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()?;
    }
    Ok(())
}
