use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use planscope::RenderConfig;
use planscope::output;
use planscope::plan::{AsciiRenderer, DiffRenderer, HtmlRenderer};
use tracing::debug;

/// Output format of the show command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

/// Flags of the show command that override configuration
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub drift: bool,
    pub show_sensitive: bool,
    pub show_unchanged: bool,
    pub side_by_side: bool,
    pub compact: bool,
    pub output: Option<PathBuf>,
}

pub struct ShowCommand;

impl ShowCommand {
    /// Execute the show command
    pub fn execute(
        plan_path: &Path,
        format: OutputFormat,
        options: &ShowOptions,
        config: &RenderConfig,
    ) -> Result<()> {
        let model = super::load_model(plan_path)?;

        let mut config = config.clone();
        config.use_drift |= options.drift;
        config.show_sensitive |= options.show_sensitive;
        config.show_unchanged |= options.show_unchanged;
        config.side_by_side |= options.side_by_side;
        config.compact_mode |= options.compact;

        let view = model.plan_view(config.use_drift, config.show_unchanged);
        debug!("rendering {} resources as {:?}", view.resources.len(), format);

        let render_options = config.to_render_options();
        let rendered = match format {
            OutputFormat::Text => AsciiRenderer::new().render(&view, &render_options),
            OutputFormat::Html => HtmlRenderer::new().render(&view, &render_options),
        };

        match &options.output {
            Some(path) => {
                std::fs::write(path, rendered)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                output::success(&format!("Wrote plan diff to {}", path.display()));
            }
            None => print!("{}", rendered),
        }

        Ok(())
    }
}
