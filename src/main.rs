use clap::{Parser, Subcommand};
use lob_engine::{
    api,
    cli::{handle_add, handle_cancel, handle_modify, parse_side, parse_tif, print_book, print_size},
    orderbook::OrderBook,
    state::AppState,
    utils::shutdown_token,
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "lob-engine")]
#[command(version, about = "A limit order-book matching engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP transport on the given port.
    Server { port: u16 },
    /// Add an order to an ephemeral, throwaway book and print any resulting trades.
    Add {
        id: u64,
        side: String,
        price: i32,
        quantity: u32,
        #[arg(default_value = "gtc")]
        tif: String,
    },
    /// Cancel an order in an ephemeral book (useful only in combination with `--repl`-style scripting).
    Cancel { id: u64 },
    /// Cancel-replace an order in an ephemeral book.
    Modify { id: u64, side: String, price: i32, quantity: u32 },
    /// Print the depth of an ephemeral book.
    Book,
    /// Print the size of an ephemeral book.
    Size,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Server { port } => {
            let state = AppState::new();
            let app = api::router(state);
            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
            info!(port, "HTTP server listening");
            let token = shutdown_token();
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await?;
        }
        Commands::Add { id, side, price, quantity, tif } => {
            let mut book = OrderBook::new();
            let (Some(side), Some(tif)) = (parse_side(&side), parse_tif(&tif)) else {
                anyhow::bail!("side must be buy/sell and tif must be gtc/fak");
            };
            handle_add(&mut book, id, side, price, quantity, tif);
        }
        Commands::Cancel { id } => {
            let mut book = OrderBook::new();
            handle_cancel(&mut book, id);
        }
        Commands::Modify { id, side, price, quantity } => {
            let mut book = OrderBook::new();
            let Some(side) = parse_side(&side) else {
                anyhow::bail!("side must be buy/sell");
            };
            handle_modify(&mut book, id, side, price, quantity);
        }
        Commands::Book => {
            let book = OrderBook::new();
            print_book(&book);
        }
        Commands::Size => {
            let book = OrderBook::new();
            print_size(&book);
        }
    }
    Ok(())
}
