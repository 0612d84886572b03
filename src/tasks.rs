//! Blocking work that runs off the interactive loop.
//!
//! Every [`Task`] is a self-contained snapshot of what it needs. [`Runner`]
//! executes it on a worker thread and sends exactly one
//! [`Event::Completed`](crate::controller::Event::Completed) back.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::controller::{Effect, Event};
use crate::figlet::{self, FontTool, RenderError};
use crate::fonts::{self, DiscoveryError, FontEntry};
use crate::logging::debug_log;

#[derive(Debug, thiserror::Error)]
#[error("failed to save file '{path}': {source}")]
pub struct SaveError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    DiscoverFonts {
        request_id: u64,
    },
    GeneratePreviews {
        request_id: u64,
        fonts: Vec<FontEntry>,
        text: String,
        width: usize,
        max_lines: usize,
    },
    RenderFullOutput {
        request_id: u64,
        font_path: PathBuf,
        text: String,
        width: usize,
    },
    SaveFile {
        request_id: u64,
        path: PathBuf,
        content: String,
    },
}

impl Task {
    pub fn request_id(&self) -> u64 {
        match self {
            Task::DiscoverFonts { request_id }
            | Task::GeneratePreviews { request_id, .. }
            | Task::RenderFullOutput { request_id, .. }
            | Task::SaveFile { request_id, .. } => *request_id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Task::DiscoverFonts { .. } => "discover-fonts",
            Task::GeneratePreviews { .. } => "generate-previews",
            Task::RenderFullOutput { .. } => "render-output",
            Task::SaveFile { .. } => "save-file",
        }
    }

    pub fn execute(self, ctx: &TaskContext) -> Completion {
        match self {
            Task::DiscoverFonts { request_id } => Completion::FontsDiscovered {
                request_id,
                result: fonts::discover_fonts(
                    ctx.tool.as_ref(),
                    &ctx.font_dirs,
                    &ctx.font_extension,
                ),
            },
            Task::GeneratePreviews {
                request_id,
                fonts,
                text,
                width,
                max_lines,
            } => Completion::PreviewsGenerated {
                request_id,
                fonts: generate_previews(ctx.tool.as_ref(), fonts, &text, width, max_lines),
            },
            Task::RenderFullOutput {
                request_id,
                font_path,
                text,
                width,
            } => Completion::OutputRendered {
                request_id,
                result: figlet::render_with_fallback(ctx.tool.as_ref(), &font_path, &text, width)
                    .map(|output| RenderedOutput {
                        font_path,
                        text,
                        width,
                        output,
                    }),
            },
            Task::SaveFile {
                request_id,
                path,
                content,
            } => Completion::FileSaved {
                request_id,
                result: save_file(path, &content),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub font_path: PathBuf,
    pub text: String,
    pub width: usize,
    pub output: String,
}

#[derive(Debug)]
pub enum Completion {
    FontsDiscovered {
        request_id: u64,
        result: Result<Vec<FontEntry>, DiscoveryError>,
    },
    PreviewsGenerated {
        request_id: u64,
        fonts: Vec<FontEntry>,
    },
    OutputRendered {
        request_id: u64,
        result: Result<RenderedOutput, RenderError>,
    },
    FileSaved {
        request_id: u64,
        result: Result<PathBuf, SaveError>,
    },
}

impl Completion {
    pub fn request_id(&self) -> u64 {
        match self {
            Completion::FontsDiscovered { request_id, .. }
            | Completion::PreviewsGenerated { request_id, .. }
            | Completion::OutputRendered { request_id, .. }
            | Completion::FileSaved { request_id, .. } => *request_id,
        }
    }
}

/// Render every font in turn. A failing font gets a placeholder preview and
/// the batch carries on.
pub fn generate_previews(
    tool: &dyn FontTool,
    mut fonts: Vec<FontEntry>,
    text: &str,
    width: usize,
    max_lines: usize,
) -> Vec<FontEntry> {
    for font in &mut fonts {
        font.preview = match figlet::render_with_fallback(tool, &font.path, text, width) {
            Ok(output) => fonts::truncate_preview(&output, max_lines),
            Err(err) => {
                debug_log(format!("preview for {} failed: {err}", font.name));
                fonts::truncate_preview(&fonts::preview_placeholder(&err.to_string()), max_lines)
            }
        };
    }
    fonts
}

pub fn save_file(path: PathBuf, content: &str) -> Result<PathBuf, SaveError> {
    match fs::write(&path, content.as_bytes()) {
        Ok(()) => Ok(path),
        Err(source) => Err(SaveError {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// What the workers share: the renderer and the discovery settings.
#[derive(Clone)]
pub struct TaskContext {
    pub tool: Arc<dyn FontTool>,
    pub font_dirs: Vec<PathBuf>,
    pub font_extension: String,
}

pub struct Runner {
    ctx: TaskContext,
    events: Sender<Event>,
}

impl Runner {
    pub fn new(ctx: TaskContext, events: Sender<Event>) -> Self {
        Self { ctx, events }
    }

    /// Start the effects a controller step produced. Returns `true` when one
    /// of them asks the application to quit.
    pub fn apply(&self, effects: Vec<Effect>) -> bool {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::Spawn(task) => self.spawn(task),
                Effect::StartStatusTimer { request_id, after } => {
                    self.start_timer(request_id, after)
                }
                Effect::Quit => quit = true,
            }
        }
        quit
    }

    pub fn spawn(&self, task: Task) {
        let ctx = self.ctx.clone();
        let tx = self.events.clone();
        debug_log(format!(
            "dispatch {} (request {})",
            task.label(),
            task.request_id()
        ));
        thread::spawn(move || {
            let completion = task.execute(&ctx);
            let _ = tx.send(Event::Completed(completion));
        });
    }

    fn start_timer(&self, request_id: u64, after: Duration) {
        let tx = self.events.clone();
        thread::spawn(move || {
            thread::sleep(after);
            let _ = tx.send(Event::StatusTimeout { request_id });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figlet::tests::FakeTool;
    use crossbeam_channel::unbounded;
    use tempfile::tempdir;

    fn five_fonts() -> Vec<FontEntry> {
        ["alpha", "beta", "gamma", "delta", "epsilon"]
            .iter()
            .map(|name| FontEntry::new(*name, format!("/fonts/{name}.flf")))
            .collect()
    }

    #[test]
    fn one_failing_font_does_not_abort_the_batch() {
        let tool = FakeTool {
            failing_fonts: ["gamma".to_string()].into_iter().collect(),
            ..FakeTool::default()
        };
        let fonts = generate_previews(&tool, five_fonts(), "Hi", 60, 11);
        assert_eq!(fonts.len(), 5);
        let failed: Vec<&str> = fonts
            .iter()
            .filter(|f| f.preview_failed())
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(failed, vec!["gamma"]);
        assert_eq!(fonts[0].preview, "alpha:Hi");
        assert!(fonts[2].preview.starts_with(fonts::PREVIEW_ERROR_PREFIX));
    }

    #[test]
    fn previews_succeed_when_tool_rejects_width() {
        let tool = FakeTool {
            reject_width: true,
            ..FakeTool::default()
        };
        let fonts = generate_previews(&tool, five_fonts(), "Hi", 60, 11);
        assert!(fonts.iter().all(|f| !f.preview_failed()));
        assert_eq!(tool.calls.lock().unwrap().len(), 10);
    }

    #[test]
    fn render_task_reports_width_and_output() {
        let ctx = TaskContext {
            tool: Arc::new(FakeTool::default()),
            font_dirs: Vec::new(),
            font_extension: "flf".into(),
        };
        let completion = Task::RenderFullOutput {
            request_id: 9,
            font_path: PathBuf::from("/fonts/big.flf"),
            text: "Yo".into(),
            width: 72,
        }
        .execute(&ctx);
        match completion {
            Completion::OutputRendered { request_id, result } => {
                assert_eq!(request_id, 9);
                let rendered = result.unwrap();
                assert_eq!(rendered.width, 72);
                assert_eq!(rendered.output, "big:Yo\n\n");
            }
            other => panic!("unexpected completion {other:?}"),
        }
    }

    #[test]
    fn discovery_task_uses_reported_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("fonts")).unwrap();
        fs::write(dir.path().join("fonts").join("small.flf"), "").unwrap();
        let ctx = TaskContext {
            tool: Arc::new(FakeTool {
                font_dir: Some(dir.path().to_path_buf()),
                ..FakeTool::default()
            }),
            font_dirs: Vec::new(),
            font_extension: "flf".into(),
        };
        match (Task::DiscoverFonts { request_id: 1 }).execute(&ctx) {
            Completion::FontsDiscovered { result, .. } => {
                let fonts = result.unwrap();
                assert_eq!(fonts.len(), 1);
                assert_eq!(fonts[0].name, "small");
            }
            other => panic!("unexpected completion {other:?}"),
        }
    }

    #[test]
    fn save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old contents that are longer").unwrap();
        let saved = save_file(path.clone(), "ABC").unwrap();
        assert_eq!(saved, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "ABC");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let err = save_file(dir.path().join("nope").join("out.txt"), "ABC").unwrap_err();
        assert!(err.to_string().starts_with("failed to save file"));
    }

    #[test]
    fn runner_delivers_completion_and_timer_events() {
        let (tx, rx) = unbounded();
        let runner = Runner::new(
            TaskContext {
                tool: Arc::new(FakeTool::default()),
                font_dirs: Vec::new(),
                font_extension: "flf".into(),
            },
            tx,
        );
        let quit = runner.apply(vec![
            Effect::Spawn(Task::RenderFullOutput {
                request_id: 3,
                font_path: PathBuf::from("/fonts/big.flf"),
                text: "Yo".into(),
                width: 40,
            }),
            Effect::StartStatusTimer {
                request_id: 4,
                after: Duration::from_millis(10),
            },
        ]);
        assert!(!quit);

        let mut saw_render = false;
        let mut saw_timer = false;
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Event::Completed(completion) => {
                    assert_eq!(completion.request_id(), 3);
                    saw_render = true;
                }
                Event::StatusTimeout { request_id } => {
                    assert_eq!(request_id, 4);
                    saw_timer = true;
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(saw_render && saw_timer);
        assert!(runner.apply(vec![Effect::Quit]));
    }
}
