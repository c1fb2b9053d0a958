use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::error;

use quarkdex::core::logging;
use quarkdex::{Config, ContentService, ErrorClass, ImageFilter, ImageSearch, QuizSearch, RandomQuery};

#[derive(Parser, Debug)]
#[command(name = "quarkdex", about = "Query quiz collections and the image dataset")]
struct Cli {
    /// Data root (overrides QUARKDEX_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Quiz(QuizCommand),
    #[command(subcommand)]
    Image(ImageCommand),
}

#[derive(Subcommand, Debug)]
enum QuizCommand {
    /// List collections with totals
    List,
    Random {
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        answers: bool,
    },
    /// Look up `<collection>-<question>`
    Get {
        id: String,
        #[arg(long)]
        answers: bool,
        #[arg(long)]
        no_options: bool,
    },
    Range {
        quiz: String,
        #[arg(long, default_value_t = 0)]
        start: i64,
        #[arg(long, default_value_t = 10)]
        end: i64,
        #[arg(long)]
        answers: bool,
    },
    Search {
        query: String,
        #[arg(long)]
        source: Option<String>,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        answers: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ImageCommand {
    Categories {
        #[arg(long)]
        category: Option<String>,
    },
    Random {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        no_cdn: bool,
    },
    Get {
        id: String,
        #[arg(long)]
        no_cdn: bool,
    },
    Range {
        subcategory: String,
        #[arg(long, default_value_t = 0)]
        start: i64,
        #[arg(long, default_value_t = 10)]
        end: i64,
        #[arg(long)]
        no_cdn: bool,
    },
    Search {
        query: String,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        no_cdn: bool,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    subcategory: Option<String>,
}

impl From<FilterArgs> for ImageFilter {
    fn from(args: FilterArgs) -> Self {
        ImageFilter {
            category: args.category,
            subcategory: args.subcategory,
        }
    }
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 10)]
    limit: usize,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    let service = ContentService::open(config);

    let outcome = run(&service, cli.command).await;
    service.shutdown().await;

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "request failed");
            match err.class() {
                ErrorClass::NotFound => ExitCode::from(4),
                ErrorClass::BadRequest => ExitCode::from(2),
                ErrorClass::Internal => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(service: &ContentService, command: Command) -> quarkdex::Result<()> {
    match command {
        Command::Quiz(command) => run_quiz(service, command).await,
        Command::Image(command) => run_image(service, command),
    }
}

async fn run_quiz(service: &ContentService, command: QuizCommand) -> quarkdex::Result<()> {
    let quizzes = service.quizzes();
    match command {
        QuizCommand::List => print(&quizzes.catalog().await?),
        QuizCommand::Random { source, count, answers } => {
            let query = RandomQuery { source, count, include_answers: answers };
            print(&quizzes.random(&query).await?)
        }
        QuizCommand::Get { id, answers, no_options } => {
            print(&quizzes.question(&id, answers, !no_options).await?)
        }
        QuizCommand::Range { quiz, start, end, answers } => {
            print(&quizzes.range(&quiz, start, end, answers).await?)
        }
        QuizCommand::Search { query, source, page, answers } => {
            let search = QuizSearch {
                query,
                source,
                limit: page.limit,
                page: page.page,
                include_answers: answers,
            };
            print(&quizzes.search(&search).await?)
        }
    }
}

fn run_image(service: &ContentService, command: ImageCommand) -> quarkdex::Result<()> {
    let images = service.images();
    match command {
        ImageCommand::Categories { category: Some(id) } => print(&images.category(&id)?),
        ImageCommand::Categories { category: None } => print(&images.categories()?),
        ImageCommand::Random { filter, count, no_cdn } => {
            print(&images.random(&filter.into(), count, !no_cdn)?)
        }
        ImageCommand::Get { id, no_cdn } => print(&images.image(&id, !no_cdn)?),
        ImageCommand::Range { subcategory, start, end, no_cdn } => {
            print(&images.range(&subcategory, start, end, !no_cdn)?)
        }
        ImageCommand::Search { query, filter, page, no_cdn } => {
            let search = ImageSearch {
                query,
                filter: filter.into(),
                limit: page.limit,
                page: page.page,
                use_cdn: !no_cdn,
            };
            print(&images.search(&search)?)
        }
    }
}

fn print<T: Serialize>(value: &T) -> quarkdex::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
