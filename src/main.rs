use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use oak_viewer::api::HttpSource;
use oak_viewer::config::{parse_base_url, ViewerConfig};
use oak_viewer::controller::{FileListController, ShowOutcome};
use oak_viewer::display::{ChartOptions, ChartWidget, HtmlChart, TerminalChart};
use oak_viewer::page::{ConsolePage, Page};
use oak_viewer::source::{DirSource, TreeSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "oak-viewer")]
#[command(about = "Browse decision trees served by the tree file server")]
struct Args {
    /// Server to fetch the file list and trees from
    #[arg(long)]
    base_url: Option<String>,
    /// Path of the file list endpoint
    #[arg(long)]
    list_path: Option<String>,
    /// Read *.tree.json files from this directory instead of a server
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Write a Treant page into this directory instead of printing the tree
    #[arg(long)]
    html: Option<PathBuf>,
    /// Chart mount element selector
    #[arg(long)]
    container: Option<String>,
    /// Print the tree without colours
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(Args::parse()).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), oak_viewer::ViewerError> {
    let mut config = ViewerConfig::from_env()?;
    if let Some(base) = &args.base_url {
        config.base_url = parse_base_url(base)?;
    }
    if let Some(path) = args.list_path {
        config.list_path = path;
    }
    if let Some(container) = args.container {
        config.container = container;
    }
    if args.dir.is_some() {
        config.tree_dir = args.dir;
    }

    let source: Box<dyn TreeSource> = match &config.tree_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "reading trees from directory");
            Box::new(DirSource::new(dir))
        }
        None => {
            info!(base = %config.base_url, "reading trees from server");
            Box::new(HttpSource::with_client(
                reqwest::Client::new(),
                config.base_url.clone(),
                &config.list_path,
            ))
        }
    };
    let widget: Box<dyn ChartWidget> = match args.html {
        Some(out) => Box::new(HtmlChart::new(out)),
        None => Box::new(TerminalChart::stdout(!args.no_color)),
    };

    let controller = FileListController::new(
        source,
        widget,
        ConsolePage::stdout(),
        ChartOptions::new(&config.container),
    );

    let count = match controller.start().await {
        Ok(count) => count,
        Err(err) => {
            eprintln!("Error: could not load the file list: {}", err);
            return Ok(());
        }
    };
    print_summary(&controller).await;
    if count == 0 {
        println!("No tree files available.");
        return Ok(());
    }

    let mut input = String::new();
    loop {
        print!("Enter a file number (1-{count}) or type 'exit' to quit: ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let choice = input.trim();

        if choice == "exit" {
            break;
        }

        match choice.parse::<usize>() {
            Ok(n) if n >= 1 => {
                match controller.activate(n - 1).await {
                    Ok(ShowOutcome::Rendered) => print_summary(&controller).await,
                    Ok(ShowOutcome::Superseded) => {}
                    Err(err) => eprintln!("Error: {}", err),
                }
            }
            _ => eprintln!("Not a file number: {}", choice),
        }
    }

    Ok(())
}

async fn print_summary<S, W, P>(controller: &FileListController<S, W, P>)
where
    S: TreeSource,
    W: ChartWidget,
    P: Page,
{
    if let Some(summary) = controller.current_summary().await {
        println!("{}", summary);
    }
}
