//! weekly-report - CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use weekly_report::config::{self, Config, HOME_ENV};
use weekly_report::git::{AuthorMode, Git2Source, collect_commits};
use weekly_report::period::{
    DateWindow, available_weeks, iso_year_week, offset_from_hours, semester_range, today_in,
    validate_custom_range, validate_week_range, week_range,
};
use weekly_report::report::{
    ReportOptions, generate_full_report, generate_summary, parse_with_locale,
};
use weekly_report::storage::ReportStore;

/// Generate weekly reports from git history.
#[derive(Parser, Debug)]
#[command(name = "weekly-report")]
#[command(about = "Generate weekly reports from git history")]
#[command(version)]
struct Cli {
    /// Report storage directory (default: ~/.weekly-reports)
    #[arg(long, global = true, env = HOME_ENV)]
    base_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a report and save it (merging into any existing report)
    Generate(GenerateArgs),

    /// Manage registered repositories
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },

    /// List stored reports
    List,

    /// Print a stored report
    Show(PeriodArgs),

    /// Delete a stored report
    Delete {
        #[command(flatten)]
        period: PeriodArgs,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show recent selectable weeks
    Weeks {
        /// Number of weeks to show
        #[arg(long, default_value_t = 5)]
        count: usize,
    },

    /// Rebuild index.md
    Index,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Week relative to the current one (0 = this week, -1 = last week)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    week_offset: i64,

    /// Start of a custom period (YYYY-MM-DD)
    #[arg(long, conflicts_with = "semester")]
    from: Option<NaiveDate>,

    /// End of a custom period (YYYY-MM-DD, defaults to today)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Report the last six months
    #[arg(long)]
    semester: bool,

    /// Extra bullet for the supplementary section (repeatable)
    #[arg(short, long = "supplement")]
    supplements: Vec<String>,

    /// Author filter: "auto", "all", or a name/email pattern
    #[arg(long)]
    author: Option<String>,

    /// Only include these registered repositories (repeatable)
    #[arg(long = "repo")]
    repos: Vec<String>,

    /// Print the report without saving
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// ISO year of a weekly report
    #[arg(long, requires = "week")]
    year: Option<i32>,

    /// ISO week of a weekly report
    #[arg(long, requires = "year")]
    week: Option<u32>,

    /// Start of a period report
    #[arg(long, requires = "to", conflicts_with = "year")]
    from: Option<NaiveDate>,

    /// End of a period report
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum RepoAction {
    /// Register a repository (re-adding a name updates its path)
    Add {
        /// Path to the git repository
        path: PathBuf,

        /// Name used as the report section (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Unregister a repository
    Remove { name: String },

    /// List registered repositories
    List,
}

/// What a report covers and where it is filed.
enum Target {
    Week {
        window: DateWindow,
        year: i32,
        week: u32,
    },
    Period(DateWindow),
}

impl Target {
    fn window(&self) -> DateWindow {
        match self {
            Self::Week { window, .. } => *window,
            Self::Period(window) => *window,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let base_dir = config::resolve_base_dir(cli.base_dir.as_deref())?;
    let config_path = config::config_path(&base_dir);
    let config = config::load_config(&config_path);
    let store = ReportStore::new(&base_dir, config.locale);

    match cli.command {
        Command::Generate(args) => generate(args, &config, &store).await,
        Command::Repo { action } => manage_repos(action, config, &config_path),
        Command::List => list_reports(&store),
        Command::Show(period) => show_report(&period, &config, &store),
        Command::Delete { period, yes } => delete_report(&period, yes, &config, &store),
        Command::Weeks { count } => {
            let today = today(&config)?;
            for choice in available_weeks(count, today) {
                println!("{:>3}  {}", choice.offset, choice.display());
            }
            Ok(())
        }
        Command::Index => {
            let path = store.update_index().context("Failed to update index")?;
            println!("✓ Index written to {}", path.display());
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "weekly_report=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn today(config: &Config) -> Result<NaiveDate> {
    let offset = offset_from_hours(config.timezone_offset_hours)?;
    Ok(today_in(offset))
}

async fn generate(args: GenerateArgs, config: &Config, store: &ReportStore) -> Result<()> {
    let offset = offset_from_hours(config.timezone_offset_hours)?;
    let today = today_in(offset);

    // Step 1: Resolve the period
    let target = if args.semester {
        Target::Period(semester_range(today))
    } else if let Some(from) = args.from {
        let to = args.to.unwrap_or(today);
        Target::Period(validate_custom_range(from, to, today).context("Invalid period")?)
    } else {
        let window = week_range(args.week_offset, today).context("Invalid week offset")?;
        let window = validate_week_range(window.start, window.end, today)
            .context("Invalid week offset")?;
        let (year, week) = iso_year_week(window.start);
        Target::Week { window, year, week }
    };
    let window = target.window();

    // Step 2: Pick repositories and author filter
    let repos = config
        .select_repos(&args.repos)
        .context("Failed to select repositories")?;
    if repos.is_empty() && args.supplements.is_empty() {
        bail!("No repositories registered. Add one with `weekly-report repo add <path>`.");
    }

    let author: AuthorMode = match args.author.as_deref() {
        Some(pattern) => pattern.parse().unwrap_or_default(),
        None => config.author_mode(),
    };

    println!(
        "Analyzing {} repositories for {}...",
        repos.len(),
        window.display()
    );

    // Step 3: Fetch commits
    let source = Git2Source::new(offset);
    let commits = collect_commits(&source, &repos, window, &author).await;
    println!("Found {} commits", commits.len());

    // Step 4: Render
    let options = ReportOptions {
        summary_max_len: config.summary_max_length,
        locale: config.locale,
    };
    let range = window.display();
    let content = generate_full_report(&commits, &args.supplements, Some(range.as_str()), &options);

    if content.is_empty() {
        println!("No changes found for {}. Nothing to save.", range);
        return Ok(());
    }

    // Step 5: Print or save
    if args.dry_run {
        println!("\n--- Dry Run Output ---\n");
        print!("{}", content);
        return Ok(());
    }

    let path = match target {
        Target::Week { year, week, .. } => store.save_week(&content, year, week),
        Target::Period(window) => store.save_period(&content, &window),
    }
    .context("Failed to save report")?;

    store.update_index().context("Failed to update index")?;

    let saved = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read back {}", path.display()))?;
    let summary = generate_summary(&parse_with_locale(&saved, config.locale));
    println!("✓ Saved {} ({})", path.display(), summary);

    Ok(())
}

fn manage_repos(action: RepoAction, mut config: Config, config_path: &Path) -> Result<()> {
    match action {
        RepoAction::Add { path, name } => {
            config::validate_repo(&path)?;
            let path = std::fs::canonicalize(&path).unwrap_or(path);
            let name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("Cannot derive a name from the path; pass --name")?,
            };
            config.add_repo(&name, &path);
            config::save_config(&config, config_path)?;
            println!("✓ Registered {} -> {}", name, path.display());
        }
        RepoAction::Remove { name } => {
            let removed = config.remove_repo(&name)?;
            config::save_config(&config, config_path)?;
            println!("✓ Removed {} ({})", removed.name, removed.path.display());
        }
        RepoAction::List => {
            if config.repos.is_empty() {
                println!("No repositories registered.");
            }
            for repo in &config.repos {
                let status = match config::validate_repo(&repo.path) {
                    Ok(()) => "ok".to_string(),
                    Err(e) => e.to_string(),
                };
                println!("{}\t{}\t{}", repo.name, repo.path.display(), status);
            }
        }
    }
    Ok(())
}

fn list_reports(store: &ReportStore) -> Result<()> {
    let weeks = store.list_weeks().context("Failed to list weekly reports")?;
    let periods = store.list_periods().context("Failed to list period reports")?;

    if weeks.is_empty() && periods.is_empty() {
        println!("No reports stored in {}", store.root().display());
        return Ok(());
    }

    for report in &weeks {
        println!("{}-W{:02}\t{}", report.year, report.week, report.path.display());
    }
    for report in &periods {
        println!("{}\t{}", report.window.display(), report.path.display());
    }
    Ok(())
}

/// A stored report picked by `--year/--week` or `--from/--to`.
enum Stored {
    Week { year: i32, week: u32 },
    Period(DateWindow),
}

impl Stored {
    /// Defaults to the current week.
    fn select(period: &PeriodArgs, config: &Config) -> Result<Self> {
        match (period.year, period.week, period.from, period.to) {
            (Some(year), Some(week), _, _) => Ok(Self::Week { year, week }),
            (_, _, Some(from), Some(to)) => {
                Ok(Self::Period(DateWindow::new(from, to).context("Invalid period")?))
            }
            _ => {
                let window = week_range(0, today(config)?).context("Invalid current week")?;
                let (year, week) = iso_year_week(window.start);
                Ok(Self::Week { year, week })
            }
        }
    }

    fn path(&self, store: &ReportStore) -> PathBuf {
        match self {
            Self::Week { year, week } => store.week_path(*year, *week),
            Self::Period(window) => store.period_path(window),
        }
    }
}

fn show_report(period: &PeriodArgs, config: &Config, store: &ReportStore) -> Result<()> {
    let selected = Stored::select(period, config)?;
    let content = match &selected {
        Stored::Week { year, week } => store.get_week(*year, *week),
        Stored::Period(window) => store.get_period(window),
    }
    .context("Failed to read report")?;

    match content {
        Some(content) => print!("{}", content),
        None => println!("No report found at {}", selected.path(store).display()),
    }
    Ok(())
}

fn delete_report(
    period: &PeriodArgs,
    yes: bool,
    config: &Config,
    store: &ReportStore,
) -> Result<()> {
    let selected = Stored::select(period, config)?;
    let path = selected.path(store);
    if !path.exists() {
        println!("No report found at {}", path.display());
        return Ok(());
    }

    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete {}?", path.display()))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let removed = match &selected {
        Stored::Week { year, week } => store.delete_week(*year, *week),
        Stored::Period(window) => store.delete_period(window),
    }
    .context("Failed to delete report")?;

    if removed {
        store.update_index().context("Failed to update index")?;
        println!("✓ Deleted {}", path.display());
    }
    Ok(())
}
