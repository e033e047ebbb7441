mod app;
mod config;
mod content;
mod generation;
mod llm;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use content::validate::{validate_form, FormInput};
use content::GeneratedContent;
use generation::Outcome;
use llm::{OpenAiClient, OPENAI_API_KEY_ENV};

#[derive(Parser, Debug)]
#[command(name = "linkpost")]
#[command(version)]
#[command(about = "Generate personalized LinkedIn posts from the terminal")]
struct Args {
    /// Parse a saved completion reply and print its sections
    #[arg(short, long, value_name = "FILE", conflicts_with = "generate")]
    format: Option<PathBuf>,

    /// Generate once without the TUI and print the result
    #[arg(short, long)]
    generate: bool,

    /// Topic description (with --generate)
    #[arg(long, requires = "generate")]
    topic: Option<String>,

    /// LinkedIn profile URL (with --generate)
    #[arg(long, requires = "generate")]
    url: Option<String>,

    /// Industry keyword (with --generate)
    #[arg(long, requires = "generate")]
    industry: Option<String>,

    /// API key (defaults to $OPENAI_API_KEY)
    #[arg(long, requires = "generate")]
    api_key: Option<String>,

    /// Include the image prompt section
    #[arg(long)]
    image: bool,

    /// Print sections as JSON
    #[arg(long)]
    json: bool,

    /// Print only the extracted post
    #[arg(long, conflicts_with = "json")]
    post_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Handle CLI-only commands
    if let Some(path) = &args.format {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let content = GeneratedContent::from_reply(raw, args.image);
        return print_content(&content, &args);
    }

    if args.generate {
        return generate_once(&args).await;
    }

    // Run TUI
    run_tui().await
}

fn env_api_key() -> Option<String> {
    std::env::var(OPENAI_API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
}

async fn generate_once(args: &Args) -> Result<()> {
    let config = AppConfig::load();

    let form = FormInput {
        api_key: args.api_key.clone().or_else(env_api_key).unwrap_or_default(),
        topic: args.topic.clone().unwrap_or_default(),
        profile_url: args.url.clone().unwrap_or_default(),
        industry: args.industry.clone().unwrap_or_default(),
        generate_image: args.image,
    };

    let request = match validate_form(&form) {
        Ok(request) => request,
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::bail!("Invalid input:\n  {}", messages.join("\n  "));
        }
    };

    let client = OpenAiClient::new(config.openai())?;
    match generation::run_once(&client, &request, &config.region).await {
        Outcome::Ready(content) => print_content(&content, args),
        Outcome::Failed(message) => anyhow::bail!(message),
    }
}

fn print_content(content: &GeneratedContent, args: &Args) -> Result<()> {
    if args.post_only {
        println!("{}", content.post);
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(content)?);
        return Ok(());
    }

    if content.sections.is_empty() {
        println!("{}", content.raw);
        return Ok(());
    }

    for section in &content.sections {
        println!("{}\n{}\n", section.label.title(), section.body);
    }
    Ok(())
}

async fn run_tui() -> Result<()> {
    let config_path = AppConfig::config_path()
        .map_err(|e| tracing::warn!("Theme changes will not be saved: {}", e))
        .ok();
    let config = config_path
        .as_deref()
        .map(AppConfig::load_from)
        .unwrap_or_default();
    let client = OpenAiClient::new(config.openai())?;

    // Create app state
    let mut app = App::new(config, config_path, Arc::new(client));
    if let Some(key) = env_api_key() {
        app.form.api_key = key;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                tracing::error!("Key handling failed: {}", e);
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Collect finished generations, expire status messages
        app.tick();

        // Let the generation task make progress between frames
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_format_mode() {
        let args = Args::try_parse_from(["linkpost", "--format", "reply.txt", "--image", "--json"]).unwrap();
        assert_eq!(args.format, Some(PathBuf::from("reply.txt")));
        assert!(args.image && args.json && !args.generate);
    }

    #[test]
    fn test_generate_flags_require_generate() {
        assert!(Args::try_parse_from(["linkpost", "--topic", "x"]).is_err());
        assert!(Args::try_parse_from(["linkpost", "--generate", "--topic", "x"]).is_ok());
    }

    #[test]
    fn test_json_and_post_only_conflict() {
        assert!(Args::try_parse_from(["linkpost", "--format", "f", "--json", "--post-only"]).is_err());
    }
}
