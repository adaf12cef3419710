mod cli;
mod render;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use quiz_source::OpenTdbSource;
use services::{QuizSession, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let source = OpenTdbSource::new(cli.source_config()?)?;
    tracing::debug!(endpoint = %source.endpoint(), "using trivia source");

    let session = QuizSession::new(Arc::new(source)).with_config(cli.session_config());
    println!("{}", render::LOADING);
    session.start()?;

    let state = session.settled().await;
    if let SessionState::Error(message) = &state {
        return Err(message.clone().into());
    }
    if let Some(status) = render::status_line(&state) {
        println!("{status}");
        return Ok(());
    }

    ask_all(&session, &state).await?;

    if let Some(progress) = session.progress() {
        println!("{}", render::score_line(&progress));
    }
    Ok(())
}

/// Ask every question in order until stdin is exhausted.
async fn ask_all(session: &QuizSession, state: &SessionState) -> std::io::Result<()> {
    let Some(quiz) = state.quiz() else {
        return Ok(());
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for (index, question) in quiz.questions().iter().enumerate() {
        println!();
        for line in render::question_lines(index, question) {
            println!("{line}");
        }

        let selected = loop {
            print!("Your answer (1-{}): ", question.options().len());
            std::io::stdout().flush()?;

            let Some(input) = lines.next_line().await? else {
                return Ok(());
            };
            match render::parse_choice(&input, question.options().len()) {
                Some(choice) => break &question.options()[choice],
                None => println!("Please enter a number between 1 and {}.", question.options().len()),
            }
        };

        if let Some(outcome) = session.select_answer(index, selected) {
            println!("{}", render::feedback(&outcome));
        }
    }
    Ok(())
}

/// Explicit -v/-q flags win; otherwise `RUST_LOG` applies, defaulting to warnings.
fn init_logging(cli: &Cli) {
    let level = cli.verbosity.tracing_level_filter();
    let builder = tracing_subscriber::fmt().with_writer(std::io::stderr);
    if cli.verbosity.is_present() {
        builder.with_max_level(level).init();
    } else {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
        builder.with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
