//! A pane couples one PTY session with one terminal interpreter.
//!
//! A reader thread pulls PTY output in fixed-size chunks and feeds the
//! interpreter under its mutex, never holding the lock across the blocking
//! read. Input and parser responses share a second mutex around the PTY
//! writer so neither can interleave a partial sequence into the other.

use std::error::Error;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use log::debug;
use parking_lot::Mutex;

use crate::pty::{PtyConfig, PtySession};
use crate::term::Term;

const READ_BUFFER_SIZE: usize = 4096;

/// Unique identifier for a pane, stable across tree surgery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(pub u64);

static NEXT_PANE_ID: AtomicU64 = AtomicU64::new(1);

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Adapter handed to the interpreter for device reports; takes the shared
/// writer lock per write.
struct ResponseWriter(SharedWriter);

impl Write for ResponseWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

pub struct Pane {
    pub id: PaneId,
    term: Arc<Mutex<Term>>,
    pty: PtySession,
    writer: SharedWriter,
    exited: Arc<AtomicBool>,
}

impl Pane {
    /// Spawn the shell and start the reader task. `cwd` seeds the child's
    /// working directory (split panes inherit their sibling's).
    pub fn new(
        cols: usize,
        rows: usize,
        cwd: Option<&Path>,
        config: &PtyConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let mut pty = PtySession::spawn(cols, rows, cwd, config)?;
        let writer: SharedWriter = Arc::new(Mutex::new(pty.take_writer()?));
        let reader = pty.clone_reader()?;

        let mut term = Term::new(cols, rows);
        term.set_writer(Box::new(ResponseWriter(Arc::clone(&writer))));
        let term = Arc::new(Mutex::new(term));

        let id = PaneId(NEXT_PANE_ID.fetch_add(1, Ordering::Relaxed));
        let exited = pty.exited_flag();
        spawn_reader_thread(id, reader, Arc::clone(&term), Arc::clone(&exited));

        Ok(Self {
            id,
            term,
            pty,
            writer,
            exited,
        })
    }

    /// The interpreter guarding this pane's grids. Renderers take the lock
    /// only for short snapshot copies.
    pub fn term(&self) -> &Arc<Mutex<Term>> {
        &self.term
    }

    /// Raw input to the child (keystrokes, pastes).
    pub fn write(&self, bytes: &[u8]) {
        let mut writer = self.writer.lock();
        match writer.write_all(bytes) {
            Ok(()) => {
                let _ = writer.flush();
            }
            Err(err) => debug!("pane {}: pty write failed: {err}", self.id.0),
        }
    }

    /// Resize the grids, then the kernel's idea of the window. A reader
    /// between the two observes the new grid with the old wire size, which
    /// converges on the next frame.
    pub fn resize(&self, cols: usize, rows: usize) {
        if cols == 0 || rows == 0 {
            return;
        }
        self.term.lock().resize(cols, rows);
        self.pty.resize(cols, rows);
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    /// The child's live working directory, for CWD inheritance.
    pub fn current_dir(&self) -> Option<PathBuf> {
        self.pty.current_dir()
    }

    /// Kill the child. The reader sees EOF and the pane reports exited.
    pub fn close(&mut self) {
        self.pty.kill();
    }
}

impl std::fmt::Debug for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pane")
            .field("id", &self.id)
            .field("exited", &self.has_exited())
            .finish_non_exhaustive()
    }
}

fn spawn_reader_thread(
    id: PaneId,
    mut reader: Box<dyn Read + Send>,
    term: Arc<Mutex<Term>>,
    exited: Arc<AtomicBool>,
) {
    thread::spawn(move || {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    debug!("pane {}: pty eof", id.0);
                    break;
                }
                Err(err) => {
                    debug!("pane {}: pty read error: {err}", id.0);
                    break;
                }
                Ok(n) => term.lock().process(&buf[..n]),
            }
        }
        exited.store(true, Ordering::SeqCst);
    });
}
