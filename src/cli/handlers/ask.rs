//! Ask and search command handlers

use std::io::Write;
use std::io::{
    self,
};
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use super::build_search_engine;
use crate::cli::output::*;
use crate::rag::InsuranceChatbot;
use crate::AppConfig;
use crate::Result;

/// Simple spinner for showing progress
struct Spinner {
    message: String,
    running: Arc<AtomicBool>,
}

impl Spinner {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    fn start(&self) {
        let message = self.message.clone();
        let running = self.running.clone();
        running.store(true, Ordering::Relaxed);

        std::thread::spawn(move || {
            let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let mut idx = 0;

            while running.load(Ordering::Relaxed) {
                print!("\r   {} {}...", frames[idx], message);
                io::stdout().flush().ok();
                idx = (idx + 1) % frames.len();
                std::thread::sleep(Duration::from_millis(80));
            }

            // Clear the line
            print!("\r{}\r", " ".repeat(80));
            io::stdout().flush().ok();
        });
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
        std::thread::sleep(Duration::from_millis(100));
    }
}

pub async fn handle_ask_command(config: &AppConfig, query: &str) -> Result<()> {
    let chatbot = InsuranceChatbot::new(build_search_engine(config)?, &config.search)?;

    let spinner = Spinner::new("Searching regulations");
    spinner.start();
    let reply = chatbot.respond(query).await;
    spinner.stop();

    println!("{}", reply?.message());
    Ok(())
}

pub async fn handle_search_command(
    config: &AppConfig,
    query: &str,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let top_k = top_k.unwrap_or_else(|| config.search_top_k());
    let engine = build_search_engine(config)?;
    let results = engine.search_scored(query, top_k).await?;

    if json {
        let documents: Vec<_> = results.iter().map(|r| &r.document).collect();
        println!("{}", serde_json::to_string_pretty(&documents)?);
    } else {
        print_search_header(query, top_k);
        print_search_results(&results);
    }
    Ok(())
}
