use colored::*;
use emojigen::{
    command::{Command, HELP},
    config::{Config, BASE_URL_ENV},
    logger, view, EmojiApiClient, GenerationController,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

async fn save(controller: &GenerationController, dir: Option<PathBuf>) -> emojigen::Result<()> {
    let Some(file) = view::download(&controller.snapshot(), controller.images())? else {
        println!("{}", "Nothing to save yet".bright_black());
        return Ok(());
    };

    let path = file.path_in(dir.unwrap_or_else(|| PathBuf::from(".")));
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| emojigen::EmojiError::Unknown(format!("Failed to write {}: {}", path.display(), e)))?;

    log::info!("💾 Saved {} bytes to {}", file.bytes.len(), path.display());
    println!("💾 {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init_with_config(logger::LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    log::debug!(
        "Debounce {}ms, output {}x{}",
        config.generator.debounce_ms,
        config.generator.width,
        config.generator.height
    );

    let client = match EmojiApiClient::new(config.api) {
        Ok(client) => {
            log::info!("✅ Using emoji API at {}", client.base_url());
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize emoji API client: {}", e);
            log::warn!("💡 Set {} to the API base URL", BASE_URL_ENV);
            return Err(e.into());
        }
    };

    let controller = GenerationController::new(Arc::new(client), config.generator);

    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        let mut last = None;
        while updates.changed().await.is_ok() {
            let preview = view::preview(&updates.borrow_and_update());
            if last.as_ref() != Some(&preview) {
                print_lines(view::render_preview(&preview));
                last = Some(preview);
            }
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.red());
                continue;
            }
        };

        match command.apply(&controller) {
            Ok(Some(_)) => continue,
            Ok(None) => {}
            Err(e) => {
                println!("{}", e.to_string().red());
                continue;
            }
        }

        match command {
            Command::Fonts => {
                let state = controller.snapshot();
                print_lines(view::render_fonts(&view::font_selector(
                    &state.font_categories,
                    &state.typeface,
                )));
            }
            Command::Show => {
                let state = controller.snapshot();
                print_lines(view::render_settings(&state));
                print_lines(view::render_preview(&view::preview(&state)));
            }
            Command::Save(dir) => {
                if let Err(e) = save(&controller, dir).await {
                    log::error!("❌ {}", e);
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            _ => {}
        }
    }

    controller.shutdown();
    printer.abort();
    log::info!("👋 Bye");
    Ok(())
}
