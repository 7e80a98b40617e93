// ~/glasspane/glasspane-addon/src/cli.rs
// Manages the persisted overlay settings and runs the simulated-host demo.

use std::{path::PathBuf, rc::Rc, time::Duration};

use clap::{ArgAction, Parser, ValueEnum};

use crate::custom::{transparency::TransparencyController, ADDON_ID, MOUNT_ID, SETTINGS_KEY};
use crate::host::{
    events::WindowEvent,
    sim::{SimDocument, SimHost},
    store::{JsonFileStore, SettingsStore},
    styles::MemoryStyleRegistry,
};
use crate::settings::{OpacityField, TransparencySettings, MAX_OPACITY, MIN_OPACITY};
use crate::{custom::stylesheet, info, logging, paths, warn};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Action {
    /// Print the persisted settings record.
    Show,
    /// Set one opacity field and persist it.
    Set,
    /// Restore the default settings record.
    Reset,
    /// Print the generated style sheet for the current settings.
    Css,
    /// Drive the overlay against the simulated host.
    Demo,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Field {
    Window,
    Servers,
    Channels,
    Chat,
    Members,
}

impl From<Field> for OpacityField {
    fn from(field: Field) -> Self {
        match field {
            Field::Window => OpacityField::Window,
            Field::Servers => OpacityField::Servers,
            Field::Channels => OpacityField::Channels,
            Field::Chat => OpacityField::Chat,
            Field::Members => OpacityField::Members,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "GlassPane overlay unified CLI")]
struct Cli {
    /// Verbose logging to glasspane.log.
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    debug: bool,
    /// Override the state root directory.
    #[arg(long = "root", value_name = "PATH")]
    root: Option<PathBuf>,
    #[arg(value_enum)]
    action: Action,
    #[arg(value_enum)]
    field: Option<Field>,
    value: Option<f64>,
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let root = cli.root.clone().unwrap_or_else(paths::glasspane_root_dir);
    info!("Using state root {}", root.display());
    let store = JsonFileStore::new(root);

    match cli.action {
        Action::Show => show(&store),
        Action::Set => set(&store, cli.field, cli.value),
        Action::Reset => reset(&store),
        Action::Css => css(&store),
        Action::Demo => demo(store),
    }
}

/// Load the persisted record through the same merge path the addon uses.
fn current_settings(store: &JsonFileStore) -> TransparencySettings {
    match store.get(ADDON_ID, SETTINGS_KEY) {
        Ok(Some(saved)) => TransparencySettings::merged_from(&saved),
        Ok(None) => TransparencySettings::default(),
        Err(e) => {
            warn!("Failed to read settings, showing defaults: {e}");
            TransparencySettings::default()
        }
    }
}

fn persist(store: &JsonFileStore, settings: &TransparencySettings) -> Result<(), String> {
    let record = serde_json::to_value(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    store
        .set(ADDON_ID, SETTINGS_KEY, &record)
        .map_err(|e| format!("Failed to write settings: {e}"))
}

fn show(store: &JsonFileStore) -> Result<(), String> {
    let settings = current_settings(store);
    for field in OpacityField::ALL {
        println!("{} = {:.2}", field.key(), settings.get(field));
    }
    Ok(())
}

fn set(store: &JsonFileStore, field: Option<Field>, value: Option<f64>) -> Result<(), String> {
    let field: OpacityField = field.ok_or("Missing field for set")?.into();
    let value = value.ok_or("Missing value for set")?;
    if !value.is_finite() {
        return Err(format!("Not a usable opacity value: {value}"));
    }

    let clamped = value.clamp(MIN_OPACITY, MAX_OPACITY);
    if clamped != value {
        warn!("Clamping {} from {value} to {clamped}", field.key());
    }

    let mut settings = current_settings(store);
    settings.set(field, clamped);
    persist(store, &settings)?;
    info!("Set {} to {clamped}", field.key());
    println!("{} = {clamped:.2}", field.key());
    Ok(())
}

fn reset(store: &JsonFileStore) -> Result<(), String> {
    persist(store, &TransparencySettings::default())?;
    info!("Settings reset to defaults");
    println!("Settings reset to defaults");
    Ok(())
}

fn css(store: &JsonFileStore) -> Result<(), String> {
    println!("{}", stylesheet::render(&current_settings(store)));
    Ok(())
}

/// Scripted end-to-end session against the simulated host: start, a window
/// event burst, one slider interaction, stop.
fn demo(store: JsonFileStore) -> Result<(), String> {
    let sim = Rc::new(SimHost::new());
    let document = Rc::new(SimDocument::new());
    document.insert_node(MOUNT_ID);
    let styles = Rc::new(MemoryStyleRegistry::new());
    let api = sim.host_api(&document, Rc::new(store), styles.clone());
    let controller = TransparencyController::new(api);

    println!("-- start --");
    controller.start();
    println!(
        "window opacity override: {:?}",
        document.root_node().opacity()
    );
    println!(
        "injected sheet: {} bytes",
        styles.sheet(ADDON_ID).map(|s| s.len()).unwrap_or(0)
    );

    println!("-- window event burst --");
    let writes_before = document.root_node().opacity_writes();
    for event in [WindowEvent::Blur, WindowEvent::Focus, WindowEvent::Resize] {
        sim.dispatch(event);
        sim.advance(Duration::from_millis(30));
    }
    sim.advance(Duration::from_millis(100));
    sim.run_frames();
    println!(
        "re-applies after burst: {}",
        document.root_node().opacity_writes() - writes_before
    );

    println!("-- slider: chat opacity 0.5 --");
    let panel = controller.settings_panel();
    if let Some(slider) = panel.slider(OpacityField::Chat) {
        slider.input("0.5");
        println!("{}", slider.label());
    }
    println!(
        "sheet carries chat layer: {}",
        styles
            .sheet(ADDON_ID)
            .map(|s| s.contains("rgba(54, 57, 63, 0.5)"))
            .unwrap_or(false)
    );

    println!("-- stop --");
    controller.stop();
    println!(
        "window opacity override: {:?}",
        document.root_node().opacity()
    );
    println!(
        "injected sheet: {} bytes",
        styles.sheet(ADDON_ID).map(|s| s.len()).unwrap_or(0)
    );
    Ok(())
}
