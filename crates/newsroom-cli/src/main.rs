use anyhow::Context;
use clap::Parser;
use newsroom_api::{
    EntityKind, FetchOptions, FetchOutcome, HttpSession, LocaleLoader, NewsClient, NewsListClient,
    NewsObjectType, NewsQuery, TargetingClient,
};
use newsroom_core::extensions::news_registry_for_context;
use newsroom_core::{Config, ListQuery, ListViewParams, NewsListView, TemplateRegistry};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "newsroom")]
#[command(version, about = "Command-line client for the portal news module", long_about = None)]
struct Cli {
    /// Portal base URL (overrides the config file)
    #[arg(long, env = "NEWSROOM_BASE_URL", global = true)]
    base_url: Option<String>,

    #[arg(long, env = "NEWSROOM_USER", global = true)]
    user: Option<String>,

    #[arg(long, env = "NEWSROOM_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Raw session cookie, e.g. `JSESSIONID=...`
    #[arg(long, env = "NEWSROOM_COOKIE", global = true, hide_env_values = true)]
    cookie: Option<String>,

    /// Space the commands act in
    #[arg(long, global = true)]
    space: Option<String>,

    /// User language
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Fetch one article
    Get {
        id: String,
        #[arg(long)]
        edit_mode: bool,
        /// draft, article or latest_draft
        #[arg(long = "type")]
        object_type: Option<NewsObjectType>,
        /// Translation to fetch
        #[arg(long = "translation")]
        translation: Option<String>,
    },
    /// List articles
    List {
        #[arg(long, default_value = "all")]
        filter: String,
        /// Free text; a leading `#` searches a tag
        #[arg(long)]
        text: Option<String>,
        /// Comma separated space ids
        #[arg(long)]
        spaces: Option<String>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        return_size: bool,
    },
    /// List articles pushed to a target
    ByTarget {
        name: String,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = newsroom_core::list_view::DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Soft-delete an article
    Delete {
        id: String,
        #[arg(long = "type")]
        object_type: Option<NewsObjectType>,
        /// Seconds before the deletion becomes final
        #[arg(long, default_value_t = 0)]
        delay: u64,
    },
    /// Undo the last pending article deletion
    Undo,
    /// Portal languages, or the translations of one article
    Languages {
        article_id: Option<String>,
        #[arg(long)]
        with_drafts: bool,
    },
    /// Manage publication targets
    Targets {
        #[command(subcommand)]
        command: TargetCommands,
    },
    /// Mount a list view from widget preferences and load its first page
    View {
        /// Widget preference, repeatable
        #[arg(long = "param", value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },
    /// Print what the news module registers with the host
    Extensions,
}

#[derive(clap::Subcommand)]
enum TargetCommands {
    /// Every target
    List,
    /// Targets the current user may publish to
    Allowed,
    /// Soft-delete a target
    Delete {
        name: String,
        #[arg(long, default_value_t = 0)]
        delay: u64,
    },
    /// Undo the last pending target deletion
    Undo,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// File config with command-line overrides applied
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load().context("Failed to load config")?;

    if let Some(ref url) = cli.base_url {
        config.portal.base_url = url.clone();
    }
    if cli.user.is_some() {
        config.auth.username = cli.user.clone();
    }
    if cli.password.is_some() {
        config.auth.password = cli.password.clone();
    }
    if cli.cookie.is_some() {
        config.auth.session_cookie = cli.cookie.clone();
    }
    if cli.space.is_some() {
        config.portal.space_id = cli.space.clone();
    }
    if cli.lang.is_some() {
        config.portal.language = cli.lang.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsroom=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(ref command) = cli.command else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    let config = load_config(&cli)?;
    let context = config.portal_context();
    let session = HttpSession::new(config.credentials())?;
    let store = config.open_undo_store()?;
    let pending_news = store.pending(EntityKind::News).map(|p| p.id.clone());
    let pending_target = store.pending(EntityKind::Target).map(|p| p.id.clone());
    let undo = store.shared();

    let news = NewsClient::new(context.clone(), session.clone(), undo.clone())
        .with_api_version(config.portal.api_version);

    match command {
        Commands::Get {
            id,
            edit_mode,
            object_type,
            translation,
        } => {
            let options = FetchOptions {
                edit_mode: edit_mode.then_some(true),
                object_type: *object_type,
                lang: translation.clone(),
            };
            match news.fetch(id, &options).await {
                FetchOutcome::Found(article) => print_json(&article)?,
                FetchOutcome::Unauthorized(status) => {
                    anyhow::bail!("Not authorized ({}), check credentials", status)
                }
                FetchOutcome::Failed(e) => return Err(e).context("Failed to fetch article"),
                FetchOutcome::Empty => println!("No article {}", id),
            }
        }
        Commands::List {
            filter,
            text,
            spaces,
            offset,
            limit,
            return_size,
        } => {
            let mut query = NewsQuery::new(filter.clone());
            if let Some(text) = text {
                query = query.search_text(text.clone());
            }
            if let Some(spaces) = spaces {
                query = query.spaces(spaces.clone());
            }
            if let Some(offset) = offset {
                query = query.offset(*offset);
            }
            if let Some(limit) = limit {
                query = query.limit(*limit);
            }
            if *return_size {
                query = query.return_size();
            }
            print_json(&news.list(&query).await?)?;
        }
        Commands::ByTarget { name, offset, limit } => {
            let client = NewsListClient::new(context.clone(), session.clone());
            let page = client.list_by_target(name, *offset, *limit, true).await?;
            print_json(&page)?;
        }
        Commands::Delete {
            id,
            object_type,
            delay,
        } => {
            news.delete_soft(id, *object_type, *delay).await?;
            if *delay > 0 {
                println!("Deleted {}, `newsroom undo` within {}s to restore it", id, delay);
            } else {
                println!("Deleted {}", id);
            }
        }
        Commands::Undo => {
            let Some(id) = pending_news else {
                println!("Nothing to undo");
                return Ok(());
            };
            news.delete_undo(&id).await?;
            println!("Restored {}", id);
        }
        Commands::Languages {
            article_id,
            with_drafts,
        } => match article_id {
            Some(id) => print_json(&news.list_article_languages(id, *with_drafts).await?)?,
            None => print_json(&news.list_available_languages().await?)?,
        },
        Commands::Targets { command } => {
            let targeting = TargetingClient::new(context.clone(), session.clone(), undo.clone());
            match command {
                TargetCommands::List => print_json(&targeting.list_all().await?)?,
                TargetCommands::Allowed => print_json(&targeting.list_allowed().await?)?,
                TargetCommands::Delete { name, delay } => {
                    targeting.delete_soft(name, *delay).await?;
                    println!("Deleted target {}", name);
                }
                TargetCommands::Undo => {
                    let Some(name) = pending_target else {
                        println!("Nothing to undo");
                        return Ok(());
                    };
                    targeting.delete_undo(&name).await?;
                    println!("Restored target {}", name);
                }
            }
        }
        Commands::View { params } => {
            let pairs = params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
            let params = ListViewParams::from_pairs(pairs);
            let locale = LocaleLoader::new(context.clone(), session.clone());
            let source = Arc::new(NewsListClient::new(context.clone(), session.clone()));

            let lang = context.language_or_default().to_string();
            let view = NewsListView::mount(&params, &lang, None, &locale, source).await?;
            tracing::info!("{} at {}", view.title(), view.mount_point());

            let first: ListQuery = view.settings().first_page();
            let page = view.load_page(&first).await?;
            view.destroy();

            print_json(&serde_json::json!({
                "settings": view.settings(),
                "header": view.header_title(),
                "hasMore": page.as_ref().is_some_and(|p| first.has_more(p)),
                "page": page,
            }))?;
        }
        Commands::Extensions => {
            let templates = TemplateRegistry::with_defaults();
            let registry = news_registry_for_context(&news, &templates).await?;
            for point in registry.points() {
                println!("{}", point);
                for registration in registry.at(point) {
                    let contribution = serde_json::to_string(&registration.contribution)?;
                    println!("  [{}] {}", registration.rank, contribution);
                }
            }
        }
    }

    Ok(())
}
