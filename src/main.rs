use std::path::PathBuf;
use std::sync::Arc;

use agentops::util::DataDir;
use agentops::{Config, HttpBackend, MessageRole, Preset, UiMode, UserProfile, WorkflowController};
use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Terminal front end for the AgentOps opportunity chatbot
#[derive(Debug, Parser)]
#[command(name = "agentops", version, about)]
struct Cli {
    /// Data directory (default: ~/.agentops)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Chat backend base URL, overriding the config file
    #[arg(long)]
    base_url: Option<String>,
}

/// One line of user input
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Upload(PathBuf),
    /// `/upload` without a path
    UploadUsage,
    CreateOpportunity,
    Preset(Preset),
    Text(String),
}

fn parse_command(line: &str, mode: UiMode) -> Command {
    let trimmed = line.trim();
    match trimmed {
        "/quit" | "/q" => return Command::Quit,
        "/create" => return Command::CreateOpportunity,
        "/upload" => return Command::UploadUsage,
        _ => {}
    }
    if let Some(path) = trimmed.strip_prefix("/upload ") {
        return Command::Upload(PathBuf::from(path.trim()));
    }
    if mode == UiMode::Preset {
        match trimmed {
            "1" => return Command::Preset(Preset::LookingForOpportunity),
            "2" => return Command::Preset(Preset::PostingOpportunity),
            _ => {}
        }
    }
    Command::Text(line.to_string())
}

fn print_profile(profile: Option<&UserProfile>) {
    match profile {
        Some(profile) => {
            println!("Name:       {}", profile.display_name());
            println!("Email:      {}", profile.email);
            println!("Role:       {}", profile.title());
            println!("Department: {}", profile.department());
        }
        None => println!("(not signed in)"),
    }
    println!();
}

/// Print transcript entries added since the last call
fn print_new_messages(controller: &WorkflowController, printed: &mut usize) {
    let messages = controller.session().messages();
    for message in messages.iter().skip(*printed) {
        let who = match message.role() {
            MessageRole::User => "you",
            MessageRole::Assistant => "bot",
        };
        println!("{who}> {}", message.content());
    }
    *printed = messages.len();
}

fn print_prompt(controller: &WorkflowController) {
    if controller.session().mode() == UiMode::Preset {
        for (index, preset) in Preset::ALL.iter().enumerate() {
            println!("  [{}] {}", index + 1, preset.prompt());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = DataDir::resolve(cli.data_dir);

    // Initialize logging to file (~/.agentops/logs/agentops.log)
    let log_file = data_dir.open_log()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let mut config = Config::load(&data_dir.config_file());
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    let backend = Arc::new(HttpBackend::new(config.backend.clone())?);
    let controller = WorkflowController::new(backend, &config);

    print_profile(UserProfile::load(&data_dir.profile_file()).as_ref());

    let mut printed = 0;
    print_new_messages(&controller, &mut printed);
    print_prompt(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line, controller.session().mode()) {
            Command::Quit => break,
            Command::Upload(path) => {
                if config.accepts_upload(&path) {
                    println!("Uploading {}...", path.display());
                    let _ = controller.upload_file(path);
                } else {
                    println!(
                        "Only {} files can be uploaded",
                        config.upload_extensions.join(", ")
                    );
                }
            }
            Command::UploadUsage => println!("Usage: /upload <path>"),
            Command::CreateOpportunity => {
                println!("Creating opportunity...");
                let _ = controller.request_summary();
            }
            Command::Preset(preset) => {
                controller.choose(preset).await;
            }
            Command::Text(text) => {
                controller.set_input(text);
                controller.submit_input().await;
            }
        }
        print_new_messages(&controller, &mut printed);
        print_prompt(&controller);
    }

    Ok(())
}
