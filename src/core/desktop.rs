//! Desktop integration: clipboard and browser
//!
//! Both shell out to the platform's clipboard and URL opener tools.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{Result, WeaveError};

type ClipboardTool = (&'static str, &'static [&'static str]);

const MACOS_CLIPBOARD: &[ClipboardTool] = &[("pbcopy", &[])];
const LINUX_CLIPBOARD: &[ClipboardTool] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("wl-copy", &[]),
];
const WINDOWS_CLIPBOARD: &[ClipboardTool] = &[("clip", &[])];

/// Copy `text` to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let candidates = if cfg!(target_os = "macos") {
        MACOS_CLIPBOARD
    } else if cfg!(target_os = "linux") {
        LINUX_CLIPBOARD
    } else if cfg!(target_os = "windows") {
        WINDOWS_CLIPBOARD
    } else {
        return Err(WeaveError::Clipboard(format!(
            "unsupported platform: {}",
            std::env::consts::OS
        )));
    };

    let mut last_error = String::from("no clipboard tool found");
    for (program, args) in candidates {
        match pipe_to(program, args, text) {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::debug!("Clipboard via {} failed: {}", program, e);
                last_error = format!("{}: {}", program, e);
            }
        }
    }

    Err(WeaveError::Clipboard(last_error))
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("exited with {}", status)))
    }
}

/// Open `url` in the default browser
pub fn open_in_browser(url: &str) -> Result<()> {
    let (program, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("open", vec![url])
    } else if cfg!(target_os = "linux") {
        ("xdg-open", vec![url])
    } else if cfg!(target_os = "windows") {
        ("rundll32", vec!["url.dll,FileProtocolHandler", url])
    } else {
        return Err(WeaveError::Browser(format!(
            "unsupported platform: {}",
            std::env::consts::OS
        )));
    };

    tracing::debug!("Opening {} with {}", url, program);
    Command::new(program)
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| WeaveError::Browser(format!("{}: {}", program, e)))
}
