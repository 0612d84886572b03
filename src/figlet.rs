use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::logging::debug_log;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("figlet exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
    #[error("figlet failed (font: {font}, width: {width}): {source}")]
    Fallback {
        font: String,
        width: usize,
        #[source]
        source: Box<RenderError>,
    },
}

/// The external text-art renderer. `Figlet` shells out to the real binary;
/// tests substitute scripted doubles.
pub trait FontTool: Send + Sync {
    /// Render `text` with the font file at `font`, optionally asking for a
    /// wrap width. Returns the tool's stdout verbatim.
    fn render(&self, font: &Path, text: &str, width: Option<usize>) -> Result<String, RenderError>;

    /// The tool's own idea of where its fonts live, if it can tell.
    fn font_directory(&self) -> Option<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct Figlet {
    binary: PathBuf,
}

impl Figlet {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl FontTool for Figlet {
    fn render(&self, font: &Path, text: &str, width: Option<usize>) -> Result<String, RenderError> {
        let mut command = Command::new(&self.binary);
        command.arg("-f").arg(font);
        if let Some(width) = width {
            command.arg("-w").arg(width.to_string());
        }
        command.arg(text);
        command.stdin(Stdio::null());

        let output = command.output().map_err(|source| RenderError::Spawn {
            program: self.binary.display().to_string(),
            source,
        })?;
        if !output.status.success() {
            return Err(RenderError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn font_directory(&self) -> Option<PathBuf> {
        let output = Command::new(&self.binary)
            .args(["-I", "2"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(dir))
        }
    }
}

/// Render with an explicit wrap width, retrying once without `-w` when the
/// tool rejects it. Some fonts and figlet builds refuse small widths.
pub fn render_with_fallback(
    tool: &dyn FontTool,
    font: &Path,
    text: &str,
    width: usize,
) -> Result<String, RenderError> {
    match tool.render(font, text, Some(width)) {
        Ok(output) => Ok(output),
        Err(first) => {
            debug_log(format!(
                "render of {} at width {width} failed ({first}); retrying without width",
                font.display()
            ));
            tool.render(font, text, None)
                .map_err(|err| RenderError::Fallback {
                    font: font.display().to_string(),
                    width,
                    source: Box::new(err),
                })
        }
    }
}

/// Resolve the configured command to an executable path. Commands containing
/// a path separator are checked as-is; bare names are searched on `PATH`.
pub fn locate_binary(command: &str) -> Option<PathBuf> {
    let command = command.trim();
    if command.is_empty() {
        return None;
    }
    let direct = Path::new(command);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(command);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let candidate = dir.join(format!("{command}.exe"));
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
