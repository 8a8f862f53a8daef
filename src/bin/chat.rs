// Space chatbot REPL
// Run with: cargo run --bin chat

use astroscope::{
    chatbot::{ChatSession, QUICK_QUESTIONS},
    error::DynErr,
    metrics::MetricsRegistry,
    render,
};
use dotenv::dotenv;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DynErr> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut session = ChatSession::new();
    let registry = MetricsRegistry::new();
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    for message in session.transcript().messages() {
        println!("{}", render::chat_line(message));
    }
    println!("(type /help for suggestions, /quit to leave)");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/help" => {
                for question in QUICK_QUESTIONS {
                    println!("  - {question}");
                }
                continue;
            }
            "/metrics" => {
                println!("{}", registry.gather_metrics());
                continue;
            }
            _ => {}
        }

        let Some(pending) = session.begin(&line) else {
            continue;
        };
        if let Some(message) = session.transcript().last() {
            println!("{}", render::chat_line(message));
        }
        println!("  ...");

        tokio::select! {
            _ = tokio::time::sleep(pending.delay()) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted while composing, closing session");
                session.mount().unmount();
            }
        }

        match session.finish(pending) {
            Some(reply) => println!("{}", render::chat_line(reply)),
            None => break,
        }
    }

    info!(messages = session.transcript().len(), "Chat session ended");
    Ok(())
}
