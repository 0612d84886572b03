use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config;
use crate::controller::Settings;
use crate::figlet::{self, Figlet};
use crate::logging::{self, debug_log};
use crate::tasks::TaskContext;
use crate::ui;

pub fn run() -> Result<()> {
    let cfg = config::load(config::LoadOptions::default()).context("load config")?;

    let binary = figlet::locate_binary(&cfg.figlet.command).with_context(|| {
        format!(
            "{} command not found. Please install figlet to use fontlet.",
            cfg.figlet.command
        )
    })?;

    debug_log(format!(
        "starting fontlet {} with {} (config: {}, log: {})",
        crate::VERSION,
        binary.display(),
        config::default_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<none>".to_string()),
        logging::log_path().display()
    ));

    let options = ui::Options {
        settings: Settings::from_config(&cfg.ui),
        theme: ui::Theme::named(&cfg.ui.theme),
        tasks: TaskContext {
            tool: Arc::new(Figlet::new(binary)),
            font_dirs: cfg.figlet.font_dirs.clone(),
            font_extension: cfg.figlet.font_extension.clone(),
        },
    };

    let mut model = ui::Model::new(options);
    model.run()
}
