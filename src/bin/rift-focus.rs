use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{ArgGroup, Args, Parser, Subcommand};
use rift_focus::common::config::{Config, config_file, state_file};
use rift_focus::common::log;
use rift_focus::layout_engine::{
    Boundaries, BoundariesAction, CardinalOrDfsDirection, FocusEngine, FocusRequest, FocusTarget,
};
use rift_focus::model::World;
use rift_focus::sys::cmd_io::CmdOutput;
use rift_focus::sys::window_server::{RecordingWindowServer, WindowId};
use serde::Serialize;

#[derive(Parser)]
#[command(version, about = "Move focus between windows of a tiling window manager")]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// World snapshot to operate on (overrides default).
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move focus and write the updated snapshot back.
    Focus(FocusArgs),
    /// Print the window tree of a workspace.
    Tree {
        /// Workspace name. Defaults to the focused workspace.
        #[arg(long)]
        workspace: Option<String>,
    },
    /// Check the configuration file and exit.
    Validate,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["direction", "window_id", "dfs_index"])
))]
struct FocusArgs {
    /// (left|down|up|right|dfs-next|dfs-prev)
    direction: Option<CardinalOrDfsDirection>,

    /// Focus the window with this ID.
    #[arg(long)]
    window_id: Option<u32>,

    /// Focus the window at this position in depth-first order.
    #[arg(long)]
    dfs_index: Option<usize>,

    #[arg(long, value_enum)]
    boundaries: Option<Boundaries>,

    #[arg(long, value_enum)]
    boundaries_action: Option<BoundariesAction>,

    /// Don't let floating windows take part in navigation.
    #[arg(long)]
    ignore_floating: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    json: bool,
}

impl FocusArgs {
    fn target(&self) -> anyhow::Result<FocusTarget> {
        Ok(match (self.direction, self.window_id, self.dfs_index) {
            (Some(direction), None, None) => direction.into(),
            (None, Some(id), None) => FocusTarget::WindowId(WindowId::new(id)),
            (None, None, Some(index)) => FocusTarget::DfsIndex(index),
            _ => bail!("exactly one of direction, --window-id or --dfs-index is required"),
        })
    }

    fn request(&self, config: &Config) -> anyhow::Result<FocusRequest> {
        let mut request = FocusRequest::with_settings(self.target()?, &config.settings.focus);
        if let Some(boundaries) = self.boundaries {
            request = request.boundaries(boundaries);
        }
        if let Some(action) = self.boundaries_action {
            request = request.boundaries_action(action);
        }
        if self.ignore_floating {
            request = request.floating_as_tiling(false);
        }
        request.validate()?;
        Ok(request)
    }
}

#[derive(Serialize)]
struct FocusOutcome {
    success: bool,
    focused_window: Option<WindowId>,
    workspace: Option<String>,
    activated: Vec<WindowId>,
    errors: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    log::init_logging();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config_file()?,
    };
    let state_path = match cli.state {
        Some(path) => path,
        None => state_file()?,
    };

    match cli.command {
        Commands::Validate => {
            let config = Config::read(&config_path)?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("Config validation passed");
                return Ok(0);
            }
            for issue in issues {
                eprintln!("{issue}");
            }
            Ok(1)
        }
        Commands::Tree { workspace } => {
            let world = load_world(&state_path)?;
            let workspace = match workspace {
                Some(name) => world
                    .workspace_by_name(&name)
                    .with_context(|| format!("no workspace named {name}"))?,
                None => world.focused_workspace().context("no workspace is focused")?,
            };
            print!("{}", world.draw_tree(workspace));
            Ok(0)
        }
        Commands::Focus(args) => {
            let config = Config::read_or_default(&config_path)?;
            let issues = config.validate();
            if !issues.is_empty() {
                bail!("invalid config {}:\n{}", config_path.display(), issues.join("\n"));
            }
            let request = args.request(&config)?;
            let world = load_world(&state_path)?;
            let server = RecordingWindowServer::from_world(&world);

            let mut engine = FocusEngine::new(world, server, config.settings.gaps.outer);
            let mut io = CmdOutput::new();
            let success = engine.resolve_focus_target(&request, &mut io);
            let (world, server) = engine.into_parts();
            world.save(&state_path)?;

            let outcome = FocusOutcome {
                success,
                focused_window: world.focused_window().and_then(|w| world.window_id(w)),
                workspace: world
                    .focused_workspace()
                    .and_then(|ws| world.workspace_name(ws))
                    .map(str::to_owned),
                activated: server.focused().to_vec(),
                errors: io.stderr,
            };
            print_outcome(&outcome, args.json)?;
            Ok(if success { 0 } else { 1 })
        }
    }
}

fn load_world(path: &Path) -> anyhow::Result<World> {
    if !path.exists() {
        bail!("no world snapshot at {}", path.display());
    }
    World::load(path).with_context(|| format!("loading {}", path.display()))
}

fn print_outcome(outcome: &FocusOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    for error in &outcome.errors {
        eprintln!("{error}");
    }
    match (outcome.focused_window, &outcome.workspace) {
        (Some(window), Some(workspace)) => println!("window {window} on workspace {workspace}"),
        (None, Some(workspace)) => println!("workspace {workspace} (no window)"),
        _ => {}
    }
    Ok(())
}
