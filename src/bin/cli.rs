//! SchoolNet CLI
//!
//! Browse the Addis Ababa school directory from a terminal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use schoolnet::{
    directory::{DirectoryState, FavoritesLedger, SelectedSchool},
    error::{AppError, Result},
    models::{
        Config, RemoteAddressFilter, RemoteFilterCriteria, SchoolRecord, SortDirection, SortField,
    },
    services::{FallbackSource, HttpSchoolSource, SchoolSource, fallback},
    storage::{self, KeyValueStore, LocalStorage, MemoryStorage, keys},
    utils::{format_birr, report},
};

/// SchoolNet - Addis Ababa School Directory
#[derive(Parser, Debug)]
#[command(
    name = "schoolnet",
    version,
    about = "Browse, filter, and bookmark schools in Addis Ababa"
)]
struct Cli {
    /// Directory holding config.toml, favorites, and the auth token
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Skip the remote API and use the bundled dataset
    #[arg(long)]
    offline: bool,

    /// Keep favorites and tokens in memory for this run only
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List schools with search, filters, sorting, and paging
    List(ListArgs),

    /// Show a single school
    Show {
        /// School id
        id: String,
    },

    /// Ask the server to filter schools
    Filter(FilterArgs),

    /// Add or remove a school from favorites
    Favorite {
        /// School id
        id: String,
    },

    /// List favorite schools
    Favorites,

    /// Manage the stored auth token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Validate configuration and the bundled dataset
    Validate,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Text matched against name, description, and sub-city
    #[arg(long, default_value = "")]
    search: String,

    /// School type, or "all"
    #[arg(long = "type", default_value = "all")]
    school_type: String,

    /// Sub-city, or "all"
    #[arg(long, default_value = "all")]
    location: String,

    /// Lowest acceptable yearly fee (ETB)
    #[arg(long)]
    budget_min: Option<f64>,

    /// Highest acceptable yearly fee (ETB)
    #[arg(long)]
    budget_max: Option<f64>,

    /// Sort by: name, sub-city, tag, budget-min, budget-max
    #[arg(long)]
    sort: Option<SortField>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long, default_value = "Addis Ababa")]
    city: String,

    #[arg(long, default_value = "")]
    sub_city: String,

    #[arg(long, default_value_t = 0.0)]
    budget_min: f64,

    #[arg(long, default_value_t = 1_000_000.0)]
    budget_max: f64,

    /// School type (repeatable)
    #[arg(long = "type")]
    school_types: Vec<String>,

    /// Minimum Google rating
    #[arg(long, default_value_t = 0.0)]
    rating: f64,

    /// Gender admission mode (co-ed, boys, girls)
    #[arg(long, default_value = "")]
    gender: String,
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Store a bearer token sent with every API request
    Set { token: String },
    /// Remove the stored token
    Clear,
}

/// Initialize logging based on verbosity flag.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.storage_dir.join("config.toml");
    let loaded = Config::load(&config_path);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.logging.level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    init_logging(&level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            config_path.display(),
            e
        );
        Config::default()
    });

    let store: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(LocalStorage::new(&cli.storage_dir))
    };

    let source: Box<dyn SchoolSource> = if cli.offline {
        log::info!("Offline mode: using bundled dataset");
        Box::new(FallbackSource)
    } else {
        let token = storage::load_token(store.as_ref()).await?;
        Box::new(HttpSchoolSource::from_config(&config.api)?.with_token(token))
    };

    let favorites = FavoritesLedger::load(Arc::clone(&store)).await;
    let mut state = DirectoryState::new(config.directory.page_size, favorites);

    match cli.command {
        Command::List(args) => {
            state.load_all(source.as_ref()).await;

            state.set_search_query(args.search);
            state.set_selected_type(args.school_type.as_str());
            state.set_selected_location(args.location.as_str());
            if args.budget_min.is_some() || args.budget_max.is_some() {
                state.set_budget_range(
                    args.budget_min.unwrap_or(0.0),
                    args.budget_max.unwrap_or(f64::MAX),
                )?;
            }
            if let Some(field) = args.sort {
                let direction = if args.desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                state.set_sort_by(field, direction);
            }
            state.set_page(args.page);

            print_listing(&state);
        }

        Command::Show { id } => {
            state.load_by_id(source.as_ref(), &id).await;
            print_error(&state);
            match state.selected() {
                SelectedSchool::Loaded(school) => {
                    print_details(school, state.is_favorite(&school.id));
                }
                SelectedSchool::NotFound | SelectedSchool::Empty => {
                    report::line(&format!("School '{id}' was not found."));
                    return Err(AppError::not_found(format!("school {id}")));
                }
            }
        }

        Command::Filter(args) => {
            let criteria = RemoteFilterCriteria {
                address: RemoteAddressFilter {
                    city: args.city,
                    sub_city: args.sub_city,
                },
                budget_min: args.budget_min,
                budget_max: args.budget_max,
                school_type: args.school_types,
                google_ratings: args.rating,
                gender: args.gender,
            };
            log::debug!("Remote filter: {}", serde_json::to_string(&criteria)?);

            if state.remote_filter(source.as_ref(), &criteria).await {
                print_listing(&state);
            } else {
                print_error(&state);
            }
        }

        Command::Favorite { id } => {
            let is_favorite = state.toggle_favorite(&id).await;
            if let Some(error) = state.error() {
                return Err(AppError::storage(keys::FAVORITES, error));
            }
            if is_favorite {
                report::line(&format!("Added '{id}' to favorites"));
            } else {
                report::line(&format!("Removed '{id}' from favorites"));
            }
        }

        Command::Favorites => {
            state.load_all(source.as_ref()).await;
            print_error(&state);

            report::header(&format!("Favorites ({})", state.favorites().len()));
            let present = state.favorite_schools();
            for school in &present {
                report::line(&format_school_line(school, true));
            }
            let missing: Vec<&str> = state
                .favorites()
                .ids()
                .into_iter()
                .filter(|id| !present.iter().any(|s| s.id == *id))
                .collect();
            for id in missing {
                report::sub_item(&format!("{id} (not in the current listing)"));
            }
            if state.favorites().is_empty() {
                report::line("No favorites yet. Use `schoolnet favorite <id>`.");
            }
        }

        Command::Token { action } => match action {
            TokenAction::Set { token } => {
                storage::save_token(store.as_ref(), token.trim()).await?;
                report::line("Token saved.");
            }
            TokenAction::Clear => {
                storage::clear_token(store.as_ref()).await?;
                report::line("Token cleared.");
            }
        },

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            report::line("✓ Config OK");

            let schools = fallback::schools();
            for school in &schools {
                school.validate()?;
            }
            report::line(&format!("✓ Bundled dataset OK ({} schools)", schools.len()));
        }
    }

    Ok(())
}

fn print_error(state: &DirectoryState) {
    if let Some(error) = state.error() {
        log::warn!("{}", error);
        report::line(&format!("! {error}"));
    }
}

fn print_listing(state: &DirectoryState) {
    print_error(state);
    report::header("Schools");

    let page = state.current_page();
    if page.is_empty() {
        report::line("No schools on this page. Try clearing filters or going back a page.");
    }
    for school in page {
        report::line(&format_school_line(school, state.is_favorite(&school.id)));
    }

    let sort = state
        .sort()
        .map(|s| format!("{} {:?}", s.field, s.direction))
        .unwrap_or_else(|| "none".to_string());
    report::summary(
        "Directory",
        &[
            ("Matches", state.filtered().len().to_string()),
            (
                "Page",
                format!("{}/{}", state.page(), state.total_pages().max(1)),
            ),
            ("Sort", sort),
            ("Types", state.facets().school_types.join(", ")),
            ("Sub-cities", state.facets().sub_cities.join(", ")),
        ],
    );
}

fn format_school_line(school: &SchoolRecord, favorite: bool) -> String {
    format!(
        "{} {:<32} [{}] {} | {}-{} ETB | id: {}",
        if favorite { "★" } else { " " },
        school.name,
        school.school_type,
        school.primary_sub_city(),
        format_birr(school.budget_min),
        format_birr(school.budget_max),
        school.id
    )
}

fn print_details(school: &SchoolRecord, favorite: bool) {
    let title = if favorite {
        format!("★ {}", school.name)
    } else {
        school.name.clone()
    };
    report::header(&title);

    let addresses: Vec<String> = school
        .addresses
        .iter()
        .map(|a| format!("{}, {}", a.sub_city, a.city))
        .collect();
    let facilities: Vec<&str> = school.facilities.iter().map(|f| f.name.as_str()).collect();

    report::sub_item(&format!("Type: {}", school.school_type));
    report::sub_item(&format!("Gender: {}", school.gender));
    report::sub_item(&format!("Divisions: {}", school.divisions.join(", ")));
    report::sub_item(&format!("Tags: {}", school.tags.join(", ")));
    report::sub_item(&format!("Address: {}", addresses.join("; ")));
    report::sub_item(&format!("Facilities: {}", facilities.join(", ")));
    report::sub_item(&format!("Students: {}", school.student_count));
    if school.year_established != 0 {
        report::sub_item(&format!("Established: {}", school.year_established));
    }
    report::sub_item(&format!(
        "Yearly fees: {}-{} ETB",
        format_birr(school.budget_min),
        format_birr(school.budget_max)
    ));
    report::separator();
    report::sub_item(&format!("Email: {}", school.email));
    report::sub_item(&format!("Phone: {}", school.phone));
    report::sub_item(&format!("Website: {}", school.website));
    if !school.description.is_empty() {
        report::separator();
        report::line(&school.description);
    }
}
