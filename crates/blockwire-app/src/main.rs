//! Headless replay of pointer events against the Blockwire core.
//!
//! Usage: `blockwire <script.json> [config.json]`

mod log_renderer;
mod script;

use blockwire_core::{BlockId, EditorConfig, Editor};
use log_renderer::LogRenderer;
use script::{Script, ScriptError};
use std::collections::HashMap;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    log::info!("Starting Blockwire replay");

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(script_path) = args.next() else {
        eprintln!("usage: blockwire <script.json> [config.json]");
        std::process::exit(2);
    };
    let config_path = args.next();

    if let Err(e) = run(&script_path, config_path.as_deref()) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(script_path: &std::path::Path, config_path: Option<&std::path::Path>) -> Result<(), ScriptError> {
    let mut script = Script::load(script_path)?;
    if let Some(path) = config_path {
        script.config = EditorConfig::load(path)?;
    }

    let mut editor = Editor::new(script.config.clone(), Box::new(LogRenderer::default()));
    let mut names: HashMap<BlockId, String> = HashMap::new();
    for block in &script.blocks {
        let id = editor.add_block(&block.profile, block.position);
        names.insert(id, block.name.clone());
    }

    for event in script.events {
        if let Some(outcome) = editor.handle_pointer_event(event) {
            log::info!("click: {outcome:?}");
        }
    }

    let name = |id: &BlockId| names.get(id).map(String::as_str).unwrap_or("?");
    let graph = editor.graph();
    for (_, conn) in graph.connections() {
        log::info!("connection {} -> {}", name(&conn.from), name(&conn.to));
    }
    for block in graph.blocks() {
        log::info!(
            "block {} at ({}, {}) selected={} face={:?}",
            name(&block.id()),
            block.position().x,
            block.position().y,
            block.is_selected(),
            block.connection_face()
        );
        if let Some(style) = graph.highlight_of(block.id()) {
            log::debug!(
                "  highlight shadow={:?} blur={} opacity={}",
                style.shadow_color.color(),
                style.shadow_blur,
                style.shadow_opacity
            );
        }
    }
    let batch: Vec<&str> = editor.selection().batch().iter().map(name).collect();
    log::info!("selection batch: {batch:?}");
    Ok(())
}
