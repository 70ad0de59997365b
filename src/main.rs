use std::fs::{self, OpenOptions};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, EventStream};
use env_logger::{Env, Target};
use futures::StreamExt;

mod app;
mod background;
mod cli;
mod color;
mod config;
mod input;
mod palette;
mod platform;
mod popup;
mod render;
mod scripting;
mod storage;
mod theme;

use app::App;
use background::{Background, TriggerSource};
use cli::{Cli, CliError, Commands};
use color::{ColorNamer, ColorReading, NamedColorTable, Rgb};
use config::Settings;
use input::{Action, Keymap};
use palette::ColorListManager;
use platform::{CommandSampler, Notifier, Osc52Clipboard};
use popup::PopupController;
use render::Renderer;
use scripting::ScriptEngine;
use storage::{JsonFileStore, MemoryStore, Store};

const TICK: Duration = Duration::from_millis(100);

fn log_env() -> Env<'static> {
    Env::new().filter_or("PIPETTE_LOG", "info")
}

/// The popup owns the screen, so its log goes to a file
fn init_file_logging() {
    let mut builder = env_logger::Builder::from_env(log_env());
    builder.format_timestamp_millis();

    let file = dirs::data_dir()
        .map(|dir| dir.join("pipette"))
        .and_then(|dir| fs::create_dir_all(&dir).ok().map(|()| dir.join("pipette.log")))
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());
    match file {
        Some(file) => builder.target(Target::Pipe(Box::new(file))),
        // Nowhere to write without corrupting the screen
        None => builder.filter_level(log::LevelFilter::Off),
    };
    builder.init();
}

fn init_stderr_logging() {
    env_logger::Builder::from_env(log_env())
        .format_timestamp_millis()
        .target(Target::Stderr)
        .init();
}

fn load_settings(config: Option<&Path>) -> Settings {
    let mut engine = ScriptEngine::new();
    let loaded = match config {
        Some(path) => engine.load_file(path),
        None => engine.load_default(),
    };
    if let Err(err) = loaded {
        log::error!("{err}");
    }
    engine.settings()
}

fn namer(settings: &Settings) -> Option<Arc<dyn ColorNamer>> {
    if !settings.show_color_name {
        return None;
    }
    let table: Arc<dyn ColorNamer> = Arc::new(NamedColorTable::css());
    Some(table)
}

fn lists<S: Store>(store: Arc<S>, settings: &Settings) -> ColorListManager<S> {
    ColorListManager::with_capacities(store, settings.history_capacity, settings.favorites_capacity)
}

fn sampler(settings: &Settings) -> Arc<CommandSampler> {
    Arc::new(CommandSampler::new(
        settings.sampler.clone(),
        settings.sampler_args.clone(),
    ))
}

fn file_store() -> Result<Arc<JsonFileStore>, CliError> {
    let store = JsonFileStore::open_default().ok_or(CliError::NoDataDir)?;
    log::debug!("using store {}", store.path().display());
    Ok(Arc::new(store))
}

/// Validate a `#RRGGBB` argument, keeping its casing so it matches what
/// the picker stored.
fn require_hex(hex: &str) -> Result<&str, CliError> {
    Rgb::from_hex(hex)
        .map(|_| hex)
        .ok_or_else(|| CliError::InvalidHex(hex.to_string()))
}

async fn save_command<S: Store>(lists: &ColorListManager<S>, hex: &str) -> Result<(), CliError> {
    let hex = require_hex(hex)?;
    lists.save_favorite(Some(hex)).await?;
    println!("saved {hex}");
    Ok(())
}

async fn remove_command<S: Store>(lists: &ColorListManager<S>, hex: &str) -> Result<(), CliError> {
    let hex = require_hex(hex)?;
    let before = lists.list_favorites().await?.len();
    let after = lists.remove_favorite(hex).await?.len();
    if after == before {
        println!("{hex} is not saved");
    } else {
        println!("removed {hex}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::io::Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command();

    if let Commands::Popup { ephemeral } = command {
        init_file_logging();
        let settings = load_settings(cli.config.as_deref());
        if ephemeral {
            run_popup(Arc::new(MemoryStore::new()), &settings).await?;
        } else {
            match file_store() {
                Ok(store) => run_popup(store, &settings).await?,
                Err(err) => {
                    eprintln!("pipette: {err}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    init_stderr_logging();
    let settings = load_settings(cli.config.as_deref());
    match run_command(command, &settings).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("pipette: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_command(command: Commands, settings: &Settings) -> Result<(), CliError> {
    match command {
        Commands::Describe { hex, json } => {
            let namer = namer(settings);
            let reading = ColorReading::describe(&hex, namer.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&reading)?);
                return Ok(());
            }
            println!("HEX  {}", reading.hex);
            println!("RGB  {}", reading.rgb);
            println!("HSL  {}", reading.hsl);
            println!("Name {}", reading.name);
        }
        Commands::Pick => {
            let store = file_store()?;
            let (background, _requests, _rx) = Background::new(
                lists(store, settings),
                sampler(settings),
                Notifier::detached(),
            );
            let hex = background.pick_now(TriggerSource::Shortcut).await?;
            println!("{hex}");
        }
        Commands::History => {
            for hex in lists(file_store()?, settings).list_history().await? {
                println!("{hex}");
            }
        }
        Commands::Favorites => {
            for hex in lists(file_store()?, settings).list_favorites().await? {
                println!("{hex}");
            }
        }
        Commands::Save { hex } => save_command(&lists(file_store()?, settings), &hex).await?,
        Commands::Remove { hex } => {
            remove_command(&lists(file_store()?, settings), &hex).await?
        }
        Commands::Popup { .. } => {}
    }
    Ok(())
}

async fn run_popup<S: Store + 'static>(store: Arc<S>, settings: &Settings) -> std::io::Result<()> {
    let theme = theme::resolve(&settings.theme);
    let keymap = Keymap::with_overrides(&settings.keybinds);
    let help = help_line(&keymap);
    let lists = lists(store, settings);
    let sampler = sampler(settings);

    let (popup_notifier, mut inbox) = Notifier::channel();
    let (background, requests, background_rx) =
        Background::new(lists.clone(), Arc::clone(&sampler), popup_notifier.clone());
    let service = tokio::spawn(background.run(background_rx));

    let controller = PopupController::new(lists, Arc::new(Osc52Clipboard), namer(settings))
        .copy_on_pick(settings.copy_on_pick)
        .toast_duration(settings.toast_duration());
    let mut app = App::new(controller, sampler, requests, popup_notifier);
    app.open().await;

    Renderer::setup()?;
    let result = event_loop(&mut app, &keymap, &theme, &help, &mut inbox).await;
    Renderer::teardown()?;

    // A pick still in flight dies with the runtime, which kills the picker
    service.abort();
    log::info!("popup closed");
    result
}

async fn event_loop<S, C, P>(
    app: &mut App<S, C, P>,
    keymap: &Keymap,
    theme: &theme::Theme,
    help: &str,
    inbox: &mut tokio::sync::mpsc::UnboundedReceiver<popup::PopupMessage>,
) -> std::io::Result<()>
where
    S: Store,
    C: platform::Clipboard,
    P: platform::Sampler + 'static,
{
    let mut renderer = Renderer::new()?;
    renderer.render(&app.state, theme, help)?;

    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);

    while app.state.running {
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Resize(width, height))) => renderer.resize(width, height),
                Some(Ok(event)) => {
                    let Some(action) = input::handle_event(&app.state, keymap, event) else {
                        continue;
                    };
                    app.dispatch(action, renderer.size()).await;
                }
                Some(Err(err)) => return Err(err),
                None => break,
            },
            Some(message) = inbox.recv() => app.on_message(message).await,
            _ = ticker.tick() => {
                if !app.state.expire_toast(Instant::now()) {
                    continue;
                }
            }
        }
        renderer.render(&app.state, theme, help)?;
    }
    Ok(())
}

fn help_line(keymap: &Keymap) -> String {
    [
        (Action::Pick, "pick"),
        (Action::ShortcutPick, "shortcut"),
        (Action::SaveFavorite, "save"),
        (Action::RemoveFavorite, "remove"),
        (Action::CopyHex, "hex"),
        (Action::CopyRgb, "rgb"),
        (Action::CopyHsl, "hsl"),
        (Action::FocusNext, "lists"),
        (Action::Quit, "quit"),
    ]
    .iter()
    .filter_map(|(action, label)| keymap.key_for(*action).map(|key| format!("{key} {label}")))
    .collect::<Vec<_>>()
    .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_lists() -> ColorListManager<MemoryStore> {
        lists(Arc::new(MemoryStore::new()), &Settings::default())
    }

    #[test]
    fn hex_argument_keeps_its_casing() {
        assert_eq!(require_hex("#2ecc71").unwrap(), "#2ecc71");
        assert_eq!(require_hex("#2ECC71").unwrap(), "#2ECC71");
        assert!(matches!(require_hex("2ecc71"), Err(CliError::InvalidHex(_))));
        assert!(matches!(require_hex("#2ecc7"), Err(CliError::InvalidHex(_))));
    }

    #[tokio::test]
    async fn saving_a_picked_color_again_keeps_one_entry() {
        let lists = memory_lists();
        lists.save_favorite(Some("#2ecc71")).await.unwrap();

        save_command(&lists, "#2ecc71").await.unwrap();

        assert_eq!(lists.list_favorites().await.unwrap(), vec!["#2ecc71"]);
    }

    #[tokio::test]
    async fn remove_matches_the_stored_casing() {
        let lists = memory_lists();
        lists.save_favorite(Some("#2ecc71")).await.unwrap();
        lists.save_favorite(Some("#ABCDEF")).await.unwrap();

        remove_command(&lists, "#2ecc71").await.unwrap();

        assert_eq!(lists.list_favorites().await.unwrap(), vec!["#ABCDEF"]);
    }

    #[tokio::test]
    async fn invalid_argument_leaves_favorites_alone() {
        let lists = memory_lists();
        lists.save_favorite(Some("#ABCDEF")).await.unwrap();

        assert!(matches!(
            save_command(&lists, "not-a-color").await,
            Err(CliError::InvalidHex(_))
        ));
        assert!(matches!(
            remove_command(&lists, "#ABCDEFF").await,
            Err(CliError::InvalidHex(_))
        ));
        assert_eq!(lists.list_favorites().await.unwrap(), vec!["#ABCDEF"]);
    }
}
