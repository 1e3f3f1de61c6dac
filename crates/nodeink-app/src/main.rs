//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    use clap::{Arg, ArgAction, Command};
    use std::path::PathBuf;

    env_logger::init();

    let matches = Command::new("nodeink")
        .about("Replay gesture scripts through a nodeink editor session")
        .arg(Arg::new("config").short('c').long("config").value_name("FILE").help("JSON config file"))
        .arg(Arg::new("script").short('s').long("script").value_name("FILE").help("Gesture script to replay"))
        .arg(Arg::new("quiet").short('q').long("quiet").action(ArgAction::SetTrue).help("Suppress shortcut help and summary"))
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let script_path = matches.get_one::<String>("script").map(PathBuf::from);
    let quiet = matches.get_flag("quiet");

    if let Err(e) = run(config_path, script_path, quiet) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "native")]
fn run(
    config_path: Option<std::path::PathBuf>,
    script_path: Option<std::path::PathBuf>,
    quiet: bool,
) -> nodeink_app::AppResult<()> {
    use nodeink_app::{AppConfig, ShortcutRegistry, graph_summary, parse_script, replay};
    use nodeink_core::Editor;

    let config = match config_path {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };
    log::info!("Starting NodeInk");

    let mut editor = Editor::new(config.editor.clone());
    if !quiet {
        ShortcutRegistry::print_all();
    }

    if let Some(path) = script_path {
        let commands = parse_script(&std::fs::read_to_string(&path)?)?;
        let report = replay(&mut editor, &commands);
        log::info!(
            "Replayed {} commands ({} rejected), {} domain events",
            report.commands,
            report.failures,
            report.events.len()
        );
    }

    if config.summary && !quiet {
        println!("{:#}", graph_summary(editor.graph()));
    }
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
