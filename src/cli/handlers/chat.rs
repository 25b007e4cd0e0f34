//! Interactive question/answer loop

use std::io::BufRead;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use tracing::error;

use crate::cli::output::BANNER_RULE;
use crate::cli::output::GREEN;
use crate::cli::output::RED;
use crate::cli::output::WELCOME;
use crate::cli::output::WHITE;
use crate::cli::output::YELLOW;
use crate::config::AppConfig;
use crate::rag::Conversation;
use crate::rag::ConversationMemory;
use crate::rag::ConversationalRetrievalChain;
use crate::Result;

const EXIT_COMMANDS: [&str; 4] = ["exit", "quit", "q", "f"];

pub fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS.contains(&input)
}

/// Handle `docbot chat` against stdin/stdout
pub async fn handle_chat_command(config: &AppConfig) -> Result<()> {
    let chain = Arc::new(ConversationalRetrievalChain::from_config(config).await?);
    let mut conversation = Conversation::new(chain, ConversationMemory::from_config(config));

    let input = std::io::BufReader::new(std::io::stdin());
    let mut stdout = std::io::stdout();
    run_chat_loop(&mut conversation, input, &mut stdout).await
}

/// Prompt, answer, repeat until an exit keyword or end of input
pub async fn run_chat_loop<R: BufRead, W: Write>(
    conversation: &mut Conversation,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{YELLOW}{BANNER_RULE}")?;
    writeln!(out, "{WELCOME}")?;
    writeln!(out, "{BANNER_RULE}")?;

    loop {
        write!(out, "{GREEN}Prompt: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out, "{WHITE}")?;
            break;
        }

        let query = line.trim();
        if is_exit_command(query) {
            writeln!(out, "{WHITE}Exiting")?;
            break;
        }
        if query.is_empty() {
            continue;
        }

        let start = Instant::now();
        match conversation.ask(query).await {
            Ok(response) => {
                writeln!(out, "{WHITE}Answer: {}", response.answer)?;
                writeln!(out, "Time taken: {:.2} secs", start.elapsed().as_secs_f64())?;
            }
            Err(e) => {
                error!("Failed to answer question: {}", e);
                writeln!(out, "{RED}Error: {e}{WHITE}")?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
