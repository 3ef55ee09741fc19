//! `vle` command-line front-end

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use vle_catalog::PathId;
use vle_client::HttpLearningApi;
use vle_core::{
    telemetry, CatalogPage, CatalogView, EnrollOutcome, LoadOutcome, Navigator, PageContext, Route,
    TracingSink, VleConfig, VleError,
};

/// Prints navigations instead of performing them
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate(&self, route: Route) {
        println!("-> {route}");
    }
}

fn cli() -> Command {
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output the view as JSON");
    let category = Arg::new("category")
        .long("category")
        .default_value("all")
        .help("Category to filter by");

    Command::new("vle")
        .version(vle_core::VERSION)
        .about("Browse and enroll in learning paths")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML config file"),
        )
        .subcommand(
            Command::new("paths")
                .about("List learning paths")
                .arg(category.clone())
                .arg(
                    Arg::new("search")
                        .long("search")
                        .default_value("")
                        .help("Case-insensitive text to match in name or description"),
                )
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("roadmaps")
                .about("List roadmaps")
                .arg(category)
                .arg(json),
        )
        .subcommand(
            Command::new("enroll")
                .about("Enroll in a learning path")
                .arg(
                    Arg::new("path-id")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .help("Identifier of the learning path"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Store an auth token")
                .arg(
                    Arg::new("token")
                        .long("token")
                        .required(true)
                        .help("Token issued by the sign-in page"),
                ),
        )
        .subcommand(Command::new("logout").about("Remove the stored auth token"))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let config = VleConfig::load(config_path.map(PathBuf::as_path))?;
    telemetry::init(&config.logging)?;

    match matches.subcommand() {
        Some(("paths", args)) => {
            let page = CatalogPage::explore(context(&config)?, config.notifications);
            page.set_search(arg(args, "search")?);
            list(&page, args).await
        }
        Some(("roadmaps", args)) => {
            let page = CatalogPage::roadmaps(context(&config)?, config.notifications);
            list(&page, args).await
        }
        Some(("enroll", args)) => {
            let path_id = PathId(
                *args
                    .get_one::<i64>("path-id")
                    .context("path id is required")?,
            );
            enroll(&config, path_id).await
        }
        Some(("login", args)) => Ok(login(&config, arg(args, "token")?)?),
        Some(("logout", _)) => Ok(logout(&config)?),
        Some((other, _)) => bail!("unknown command {other:?}"),
        None => bail!("no command given"),
    }
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn context(config: &VleConfig) -> Result<PageContext, VleError> {
    let auth = Arc::new(config.token_store());
    let api = HttpLearningApi::new(&config.api)?.with_auth(auth.clone());
    Ok(PageContext::new(
        Arc::new(api),
        auth,
        Arc::new(StdoutNavigator),
        Arc::new(TracingSink),
    ))
}

fn login(config: &VleConfig, token: &str) -> Result<ExitCode, VleError> {
    let store = config.token_store();
    store.set(token)?;
    println!("Signed in (token stored in {})", store.path().display());
    Ok(ExitCode::SUCCESS)
}

fn logout(config: &VleConfig) -> Result<ExitCode, VleError> {
    if config.token_store().remove()? {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(ExitCode::SUCCESS)
}

async fn list(page: &CatalogPage, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    page.set_category(arg(args, "category")?);
    let outcome = page.mount().await?;

    let view = page.view();
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }

    Ok(if outcome == LoadOutcome::Failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_view(view: &CatalogView) {
    let chips: Vec<&str> = view.categories.iter().map(|c| c.label.as_str()).collect();
    println!("Categories: {}", chips.join(" | "));
    println!();

    if view.is_empty {
        println!("No entries match the current filter.");
        return;
    }
    for entry in &view.entries {
        println!(
            "{:>4}  {} {}  [{}] {} · {}h",
            entry.id.get(),
            entry.display_icon(),
            entry.name,
            entry.category,
            entry.difficulty.as_str(),
            entry.estimated_hours,
        );
        println!("      {}", entry.description);
    }
}

async fn enroll(config: &VleConfig, path_id: PathId) -> anyhow::Result<ExitCode> {
    let page = CatalogPage::explore(context(config)?, config.notifications);
    if page.mount().await? == LoadOutcome::Failed {
        bail!("could not load learning paths");
    }
    if !page.store().contains(path_id) {
        bail!("learning path {path_id} is not listed");
    }

    let outcome = page.enroll(path_id).await;
    for notification in page.notifications().active() {
        eprintln!("[{:?}] {}", notification.kind, notification.message);
    }

    match outcome {
        EnrollOutcome::Failed { error, .. } => {
            let error = VleError::from(error);
            eprintln!("{error}");
            if error.is_retryable() {
                eprintln!("The service may be temporarily unavailable; try again shortly.");
            }
            Ok(ExitCode::FAILURE)
        }
        EnrollOutcome::Cancelled { .. } => Ok(ExitCode::FAILURE),
        EnrollOutcome::RedirectedToLogin | EnrollOutcome::Enrolled { .. } => Ok(ExitCode::SUCCESS),
    }
}
