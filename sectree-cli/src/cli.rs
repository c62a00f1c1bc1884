use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sectree::{
    ChangeDescriptor, EngineSettings, ListItem, SectionTree, SelectionSink,
    TreeEngine,
};
use serde::Serialize;

use crate::entry::{Entry, load_entries, load_settings};
use crate::render::{Line, TextRenderer, change_text, sections_text};

#[derive(Debug, Parser)]
#[command(
    name = "sectree-cli",
    about = "Print the section list of a JSON element file and replay toggles",
    version
)]
pub struct Cli {
    /// JSON array of `{ id, parent, rank, collapsed, title }` records.
    pub elements: PathBuf,

    /// Section index to toggle; repeat to toggle several times in order.
    #[arg(long = "toggle", value_name = "SECTION")]
    pub toggles: Vec<usize>,

    /// JSON file with engine settings.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Also print every section, ignoring collapsed branches.
    #[arg(long)]
    pub all: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Step<'a> {
    toggled: Option<usize>,
    change: Option<&'a ChangeDescriptor>,
    sections: &'a [Vec<Line>],
}

/// Logs header activations the way a display layer would report them.
struct ActivationLog;

impl SelectionSink<Entry> for ActivationLog {
    fn selected(&mut self, item: ListItem<Entry>) {
        match item {
            ListItem::Section(entry, state) => {
                info!("activated header {:?} ({state:?})", entry.id)
            },
            ListItem::Cell(entry) => info!("activated row {:?}", entry.id),
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let entries = load_entries(&cli.elements)?;
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => EngineSettings::default(),
    };
    let renderer = TextRenderer::new(&settings);

    if cli.all {
        let tree = SectionTree::new(entries.clone())
            .context("failed to build section tree")?;
        let rendered = renderer.render_all(&tree.all_sections());
        emit(&cli, None, None, &rendered)?;
    }

    let engine = TreeEngine::spawn(entries, settings)
        .context("failed to start tree engine")?;
    let rendered = renderer.render_all(&engine.sections());
    emit(&cli, None, None, &rendered)?;

    let mut sink = ActivationLog;
    for &index in &cli.toggles {
        if let Some(section) = engine.sections().get(index) {
            sink.selected(ListItem::Section(
                section.header.clone(),
                section.state,
            ));
        }

        let toggled = engine
            .toggle(index)
            .await
            .with_context(|| format!("failed to toggle section {index}"))?;
        let rendered = renderer.render_all(&engine.sections());
        emit(&cli, Some(index), Some(&toggled.change), &rendered)?;
    }

    Ok(())
}

fn emit(
    cli: &Cli,
    toggled: Option<usize>,
    change: Option<&ChangeDescriptor>,
    sections: &[Vec<Line>],
) -> Result<()> {
    if cli.json {
        let step = Step {
            toggled,
            change,
            sections,
        };
        let json = serde_json::to_string(&step)
            .context("failed to serialize output")?;
        println!("{json}");
        return Ok(());
    }

    if let (Some(index), Some(change)) = (toggled, change) {
        println!("toggle {index}: {}", change_text(change));
    }
    print!("{}", sections_text(sections));
    println!();
    Ok(())
}
