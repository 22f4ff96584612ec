mod script;

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use actionstate_common::{ACTIVITY_THRESHOLD, RawValue};
use actionstate_host::{ActionAsset, ActionDefinition, ActionMap, InputConfig, InputHost};
use actionstate_input::{ActionChange, ChangeFilter, MemorySource};
use actionstate_tools::{ActionInfo, CacheInspector, InputDebugger};
use clap::{Parser, Subcommand};
use glam::Vec2;
use script::{Script, ScriptEvent};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "actionstate-cli", about = "CLI tool for actionstate operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default thresholds
    Info,
    /// Validate an input config (YAML or JSON) and summarise its asset
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
    /// Play a frame script through a host built from a config
    Play {
        /// Path to the config file
        config: PathBuf,
        /// Path to the frame script (YAML or JSON)
        script: PathBuf,
        /// Print typed reads of these actions every frame
        #[arg(short, long)]
        watch: Vec<String>,
    },
    /// Run a built-in Jump/Move scenario
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("actionstate-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("activity threshold: {ACTIVITY_THRESHOLD}");
            println!("default change threshold: {}", ChangeFilter::DEFAULT_THRESHOLD);
        }
        Commands::Validate { config } => {
            let config = InputConfig::load(&config)?;
            config.validate()?;
            println!("{}", config.debug_info());
            for map in &config.asset.maps {
                println!("map {}:", map.name);
                for action in &map.actions {
                    println!("  {} -> {}", action.name, action.kind());
                }
            }
        }
        Commands::Play {
            config,
            script,
            watch,
        } => {
            let config = InputConfig::load(&config)?;
            let script = Script::load(&script)?;
            run(config, &script, &watch, cli.verbose)?;
        }
        Commands::Demo => {
            let config = demo_config();
            let script = demo_script();
            run(config, &script, &["Jump".to_string(), "Move".to_string()], true)?;
        }
    }

    Ok(())
}

fn run(config: InputConfig, script: &Script, watch: &[String], debug: bool) -> anyhow::Result<()> {
    let source = config.memory_source();
    let debug = debug || config.enable_debug;
    let mut host = InputHost::new(config, source)?;

    let debugger = Rc::new(RefCell::new(InputDebugger::new(debug)));
    let sink = Rc::clone(&debugger);
    host.subscribe(Box::new(move |change: &ActionChange| {
        sink.borrow_mut().log_input_activity(change)
    }));

    for (i, events) in script.frames.iter().enumerate() {
        let report = play_frame(&mut host, events)?;
        println!("frame {i}: {report}");
        print_watched(&mut host, watch)?;

        let mut view = debugger.borrow_mut();
        let text = view.generate_debug_text();
        if !text.is_empty() {
            print!("{text}");
        }
    }

    println!("{}", CacheInspector::summary(host.cache()));
    host.shutdown()?;
    Ok(())
}

/// Edge and hold sets visible after one frame's update, sorted by action name.
#[derive(Debug, Default, PartialEq)]
struct FrameReport {
    dispatched: usize,
    pressed: Vec<String>,
    released: Vec<String>,
    held: Vec<String>,
}

impl FrameReport {
    fn capture(host: &InputHost<MemorySource>, dispatched: usize) -> Self {
        let snapshot = CacheInspector::snapshot(host.cache());
        Self {
            dispatched,
            pressed: names_where(&snapshot, |i| i.pressed),
            released: names_where(&snapshot, |i| i.released),
            held: names_where(&snapshot, |i| i.held),
        }
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dispatched={} pressed={:?} released={:?} held={:?}",
            self.dispatched, self.pressed, self.released, self.held
        )
    }
}

/// Apply one frame's events, run the end-of-frame update and report the result.
fn play_frame(
    host: &mut InputHost<MemorySource>,
    events: &[ScriptEvent],
) -> anyhow::Result<FrameReport> {
    for event in events {
        event.apply(host);
    }
    let dispatched = host.late_update()?;
    Ok(FrameReport::capture(host, dispatched))
}

fn print_watched(host: &mut InputHost<MemorySource>, watch: &[String]) -> anyhow::Result<()> {
    for name in watch {
        let Some(accessor) = host.accessor(name) else {
            continue;
        };
        println!(
            "  {name}: bool={} int={} float={:.2} vec2={}",
            accessor.as_bool()?,
            accessor.as_int()?,
            accessor.as_float()?,
            RawValue::Vector2(accessor.as_vec2()?),
        );
    }
    Ok(())
}

fn names_where(snapshot: &[ActionInfo], pred: impl Fn(&ActionInfo) -> bool) -> Vec<String> {
    snapshot
        .iter()
        .filter(|&info| pred(info))
        .map(|info| info.name.clone())
        .collect()
}

fn demo_config() -> InputConfig {
    InputConfig {
        asset: ActionAsset {
            maps: vec![ActionMap {
                name: "Player".into(),
                actions: vec![
                    ActionDefinition::new("Jump", "Button"),
                    ActionDefinition::new("Move", "Vector2"),
                ],
            }],
        },
        ..InputConfig::default()
    }
}

fn demo_script() -> Script {
    let jump = || "Jump".to_string();
    let mv = |x: f32| ScriptEvent::Deliver {
        action: "Move".into(),
        value: RawValue::Vector2(Vec2::new(x, 0.0)),
    };
    Script {
        frames: vec![
            vec![
                ScriptEvent::Deliver {
                    action: jump(),
                    value: RawValue::Bool(true),
                },
                mv(0.05),
            ],
            vec![ScriptEvent::Deliver {
                action: jump(),
                value: RawValue::Bool(true),
            }],
            vec![ScriptEvent::Clear { action: jump() }, mv(0.5)],
            vec![],
            vec![ScriptEvent::Clear {
                action: "Move".into(),
            }],
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(config: InputConfig, script: &Script) -> Vec<FrameReport> {
        let source = config.memory_source();
        let mut host = InputHost::new(config, source).unwrap();
        let reports = script
            .frames
            .iter()
            .map(|events| play_frame(&mut host, events).unwrap())
            .collect();
        host.shutdown().unwrap();
        reports
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn demo_scenario_edges() {
        let reports = play(demo_config(), &demo_script());
        assert_eq!(reports.len(), 5);

        // A 0.05 stick deflection is below the activity threshold.
        assert_eq!(reports[0].pressed, names(&["Jump"]));
        assert_eq!(reports[0].held, names(&["Jump"]));

        assert!(reports[1].pressed.is_empty());
        assert_eq!(reports[1].held, names(&["Jump"]));

        assert_eq!(reports[2].pressed, names(&["Move"]));
        assert_eq!(reports[2].released, names(&["Jump"]));
        assert_eq!(reports[2].held, names(&["Move"]));

        assert!(reports[3].pressed.is_empty());
        assert!(reports[3].released.is_empty());
        assert_eq!(reports[3].held, names(&["Move"]));

        assert_eq!(reports[4].released, names(&["Move"]));
        assert!(reports[4].held.is_empty());
    }

    #[test]
    fn bundled_demo_files_play() {
        let config = InputConfig::from_yaml_str(include_str!("../demos/input.yaml")).unwrap();
        config.validate().unwrap();
        let script: Script = serde_yaml::from_str(include_str!("../demos/frames.yaml")).unwrap();

        let reports = play(config, &script);
        assert_eq!(reports.len(), 5);

        assert_eq!(reports[0].pressed, names(&["Jump"]));
        assert_eq!(reports[1].pressed, names(&["Move", "Throttle"]));
        assert_eq!(reports[1].held, names(&["Jump", "Move", "Throttle"]));
        assert_eq!(reports[2].released, names(&["Jump"]));
        assert!(reports[2].pressed.is_empty());
        assert_eq!(reports[3].held, names(&["Move", "Throttle"]));
        assert_eq!(reports[4].released, names(&["Move", "Throttle"]));
        assert_eq!(reports[4].pressed, names(&["Select"]));
        assert_eq!(reports[4].held, names(&["Select"]));
    }

    #[test]
    fn every_bundled_event_reaches_a_registered_action() {
        let config = InputConfig::from_yaml_str(include_str!("../demos/input.yaml")).unwrap();
        let script: Script = serde_yaml::from_str(include_str!("../demos/frames.yaml")).unwrap();
        let source = config.memory_source();
        let mut host = InputHost::new(config, source).unwrap();
        for events in &script.frames {
            for event in events {
                assert!(event.apply(&mut host), "dropped {event:?}");
            }
            host.late_update().unwrap();
        }
    }

    #[test]
    fn frame_report_display() {
        let report = FrameReport {
            dispatched: 2,
            pressed: names(&["Jump"]),
            released: vec![],
            held: names(&["Jump"]),
        };
        assert_eq!(
            report.to_string(),
            r#"dispatched=2 pressed=["Jump"] released=[] held=["Jump"]"#
        );
    }
}
