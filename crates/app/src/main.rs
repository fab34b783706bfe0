use log::{info, warn};

use app::api;
use app::config::{Args, Command, print_usage};
use quiz_core::model::{BankName, QuestionBank};
use services::{AppServices, Clock};
use storage::bank_file::{
    BankLoadError, BankSource, default_candidates, load_first, load_or_fallback,
};

fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();
}

/// Easy bank (with fallback) plus the hard bank when one can be found.
fn load_banks(args: &Args) -> Vec<(BankName, QuestionBank)> {
    let easy_candidates = args
        .bank
        .clone()
        .map_or_else(|| default_candidates(BankName::Easy), |path| vec![path]);
    let easy = load_or_fallback(&easy_candidates);
    match &easy.source {
        BankSource::File(path) => info!("easy bank source: {}", path.display()),
        BankSource::Fallback => warn!("easy bank source: built-in fallback"),
    }
    let mut banks = vec![(BankName::Easy, easy.bank)];

    let hard_candidates = args
        .hard_bank
        .clone()
        .map_or_else(|| default_candidates(BankName::Hard), |path| vec![path]);
    match load_first(&hard_candidates) {
        Ok(hard) => banks.push((BankName::Hard, hard.bank)),
        Err(BankLoadError::NotFound { .. }) => {
            info!("no hard question bank found; only easy questions are available");
        }
        Err(err) => warn!("hard question bank ignored: {err}"),
    }

    banks
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::parse() {
        Ok(Command::Serve(args)) => args,
        Ok(Command::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    let banks = load_banks(&args);
    for (name, bank) in &banks {
        info!(
            "{name} bank: {} questions, {} chapters",
            bank.len(),
            bank.meta().chapters().len()
        );
    }

    let services = AppServices::new(banks, args.difficulty, Clock::system())?;
    let loaded: Vec<String> = services.selector().loaded().map(|name| name.to_string()).collect();
    info!("difficulties available: {}", loaded.join(", "));
    let router = api::router(services);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(
        "quiz server listening on {} ({} bank active)",
        listener.local_addr()?,
        args.difficulty
    );
    axum::serve(listener, router).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_logging();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
