//! PTY session management: shell launch policy, child environment, resize,
//! and exit tracking.

use std::error::Error;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::{debug, warn};
use portable_pty::{ChildKiller, CommandBuilder, MasterPty, PtySize, native_pty_system};

/// Resolved configuration handed down by the configuration module. The core
/// never reads config files; it receives paths and switches.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Shell executable; `$SHELL` and then `sh` when unset.
    pub shell: Option<String>,
    /// Whether the user's rc files are sourced on startup.
    pub source_rc: bool,
    /// Extra environment entries from the configuration.
    pub extra_env: Vec<(String, String)>,
    /// Path of the generated init script, regenerated externally on demand.
    pub init_script: Option<PathBuf>,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            shell: None,
            source_rc: true,
            extra_env: Vec::new(),
            init_script: None,
        }
    }
}

/// Colors for `ls` and friends, fixed so listings look identical on every
/// machine the terminal runs on.
const LS_COLORS: &str = "di=1;34:ln=36:so=35:pi=33:ex=1;32:bd=1;33:cd=1;33:\
su=37;41:sg=30;43:tw=30;42:ow=34;42:st=37;44:or=1;31:mi=1;31:\
*.tar=31:*.tgz=31:*.zip=31:*.gz=31:*.bz2=31:*.xz=31:*.7z=31:\
*.jpg=35:*.jpeg=35:*.png=35:*.gif=35:*.svg=35:*.webp=35:\
*.mp3=36:*.flac=36:*.ogg=36:*.mp4=35:*.mkv=35:*.webm=35";

/// A shell child on a pseudo-terminal: master side, kill handle, and an
/// exit flag flipped by a detached waiter thread.
pub struct PtySession {
    master: Box<dyn MasterPty + Send>,
    killer: Box<dyn ChildKiller + Send + Sync>,
    pid: Option<u32>,
    exited: Arc<AtomicBool>,
}

impl PtySession {
    /// Spawn the configured shell on a fresh PTY of `cols` x `rows`.
    ///
    /// portable-pty puts the child in a new session with the slave as its
    /// controlling terminal. The start directory is the requested one when
    /// it exists, the home directory otherwise.
    pub fn spawn(
        cols: usize,
        rows: usize,
        cwd: Option<&Path>,
        config: &PtyConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let pty_system = native_pty_system();
        let pair = pty_system.openpty(PtySize {
            rows: rows as u16,
            cols: cols as u16,
            pixel_width: 0,
            pixel_height: 0,
        })?;

        let shell = config
            .shell
            .clone()
            .or_else(|| std::env::var("SHELL").ok())
            .unwrap_or_else(|| "sh".to_owned());
        let (args, shell_env) =
            shell_invocation(&shell, config.source_rc, config.init_script.as_deref());

        let mut cmd = CommandBuilder::new(&shell);
        for arg in &args {
            cmd.arg(arg);
        }
        apply_environment(&mut cmd, cols, rows, &config.extra_env);
        for (key, value) in shell_env {
            cmd.env(key, value);
        }
        cmd.cwd(start_dir(cwd));

        let mut child = pair.slave.spawn_command(cmd)?;
        drop(pair.slave);
        debug!("spawned {shell} at {cols}x{rows}");

        let killer = child.clone_killer();
        let pid = child.process_id();
        let exited = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&exited);
        thread::spawn(move || {
            let _ = child.wait();
            flag.store(true, Ordering::SeqCst);
        });

        Ok(Self {
            master: pair.master,
            killer,
            pid,
            exited,
        })
    }

    pub fn clone_reader(&self) -> Result<Box<dyn Read + Send>, Box<dyn Error>> {
        Ok(self.master.try_clone_reader()?)
    }

    pub fn take_writer(&mut self) -> Result<Box<dyn Write + Send>, Box<dyn Error>> {
        Ok(self.master.take_writer()?)
    }

    /// Update the kernel's window size. Failure is logged and absorbed; the
    /// grid was already resized and the next resize converges.
    pub fn resize(&self, cols: usize, rows: usize) {
        let result = self.master.resize(PtySize {
            rows: rows as u16,
            cols: cols as u16,
            pixel_width: 0,
            pixel_height: 0,
        });
        if let Err(err) = result {
            warn!("pty resize to {cols}x{rows} failed: {err}");
        }
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    /// Shared exit flag, also flipped by the pane's reader on EOF.
    pub fn exited_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.exited)
    }

    /// The child's current working directory, resolved through procfs when
    /// available.
    pub fn current_dir(&self) -> Option<PathBuf> {
        let pid = self.pid?;
        std::fs::read_link(format!("/proc/{pid}/cwd")).ok()
    }

    /// Kill the child. The waiter thread reaps it and flips the exit flag.
    pub fn kill(&mut self) {
        if let Err(err) = self.killer.kill() {
            debug!("kill failed (child likely already gone): {err}");
        }
    }
}

impl Drop for PtySession {
    fn drop(&mut self) {
        self.kill();
    }
}

impl std::fmt::Debug for PtySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtySession")
            .field("pid", &self.pid)
            .field("exited", &self.has_exited())
            .finish_non_exhaustive()
    }
}

/// Arguments and extra environment for launching `shell`, keyed off its
/// basename.
fn shell_invocation(
    shell: &str,
    source_rc: bool,
    init_script: Option<&Path>,
) -> (Vec<String>, Vec<(String, String)>) {
    let base = Path::new(shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(shell);

    let mut args: Vec<String> = Vec::new();
    let mut env: Vec<(String, String)> = Vec::new();

    match base {
        "bash" => match (init_script, source_rc) {
            (Some(init), true) => {
                args.push("--rcfile".to_owned());
                args.push(init.to_string_lossy().into_owned());
            }
            (Some(init), false) => {
                args.push("--noprofile".to_owned());
                args.push("--rcfile".to_owned());
                args.push(init.to_string_lossy().into_owned());
                // Non-interactive subshells still pick up the init script.
                env.push(("BASH_ENV".to_owned(), init.to_string_lossy().into_owned()));
            }
            (None, true) => args.push("-i".to_owned()),
            (None, false) => {
                args.push("--noprofile".to_owned());
                args.push("--norc".to_owned());
                args.push("-i".to_owned());
            }
        },
        "zsh" => {
            if !source_rc {
                args.push("--no-rcs".to_owned());
            }
            args.push("-i".to_owned());
            if let Some(init) = init_script {
                env.push((
                    "RAVEN_INIT_SCRIPT".to_owned(),
                    init.to_string_lossy().into_owned(),
                ));
            }
        }
        "fish" => {
            if !source_rc {
                args.push("--no-config".to_owned());
            }
            args.push("-i".to_owned());
        }
        _ => args.push("-i".to_owned()),
    }

    (args, env)
}

/// The fixed child environment, layered over the inherited one (DISPLAY,
/// WAYLAND_DISPLAY, and the rest pass through untouched).
fn apply_environment(cmd: &mut CommandBuilder, cols: usize, rows: usize, extra: &[(String, String)]) {
    cmd.env("PATH", prepended_path());
    cmd.env("TERM", "xterm-256color");
    cmd.env("COLORTERM", "truecolor");
    cmd.env("TERM_PROGRAM", "raven");
    cmd.env("LANG", "en_US.UTF-8");
    cmd.env("LC_ALL", "en_US.UTF-8");
    cmd.env("LS_COLORS", LS_COLORS);
    cmd.env("COLUMNS", cols.to_string());
    cmd.env("LINES", rows.to_string());
    if std::env::var_os("XDG_RUNTIME_DIR").is_none() {
        if let Some(uid) = current_uid() {
            cmd.env("XDG_RUNTIME_DIR", format!("/run/user/{uid}"));
        }
    }
    for (key, value) in extra {
        cmd.env(key, value);
    }
}

/// PATH with the local bin directories in front, when not already present.
fn prepended_path() -> String {
    let current = std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_owned());

    let mut candidates = Vec::new();
    if let Ok(home) = std::env::var("HOME") {
        candidates.push(format!("{home}/.local/bin"));
    }
    candidates.push("/usr/local/bin".to_owned());

    let mut prefix: Vec<String> = Vec::new();
    for dir in candidates {
        if !current.split(':').any(|p| p == dir) {
            prefix.push(dir);
        }
    }

    if prefix.is_empty() {
        current
    } else {
        format!("{}:{current}", prefix.join(":"))
    }
}

#[cfg(unix)]
fn current_uid() -> Option<u32> {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata("/proc/self").map(|m| m.uid()).ok()
}

#[cfg(not(unix))]
fn current_uid() -> Option<u32> {
    None
}

fn start_dir(requested: Option<&Path>) -> PathBuf {
    if let Some(dir) = requested {
        if dir.is_dir() {
            return dir.to_path_buf();
        }
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}
