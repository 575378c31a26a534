use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use thiserror::Error;

const SHUTDOWN_WAIT: Duration = Duration::from_secs(2);
const SHUTDOWN_POLL: Duration = Duration::from_millis(25);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine process is not running")]
    Unavailable,
    #[error("unusable engine reply {0:?}")]
    Protocol(String),
    #[error("engine i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to spawn engine {path}: {source}")]
    Spawn { path: String, source: std::io::Error },
}

/// The opponent capability: one position in, one move out, blocking.
///
/// Implemented by [`EngineProcess`] for a real bot; tests substitute
/// scripted implementations.
pub trait MoveEngine: Send + Sync {
    /// Sends a FEN line and blocks until the engine replies with a line.
    /// The reply is trimmed but otherwise unvalidated.
    fn request_move(&self, fen: &str) -> Result<String, EngineError>;

    /// Ends the engine session. Idempotent.
    fn shutdown(&self);
}

/// A single external bot process speaking the line protocol: FEN in,
/// coordinate move out, `quit` to exit.
///
/// The handles sit behind mutexes so the one worker thread can block on
/// the reply read while the session keeps teardown access; shutdown never
/// takes the stdout lock, so a blocked read is released by process exit.
pub struct EngineProcess {
    child: Mutex<Child>,
    stdin: Mutex<Option<BufWriter<ChildStdin>>>,
    stdout: Mutex<BufReader<ChildStdout>>,
}

impl EngineProcess {
    pub fn spawn(path: &Path) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn { path: path.display().to_string(), source })?;
        let stdin = child.stdin.take().map(BufWriter::new).ok_or(EngineError::Unavailable)?;
        let stdout = child.stdout.take().map(BufReader::new).ok_or(EngineError::Unavailable)?;
        debug!("spawned engine {} (pid {})", path.display(), child.id());
        Ok(Self {
            child: Mutex::new(child),
            stdin: Mutex::new(Some(stdin)),
            stdout: Mutex::new(stdout),
        })
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.child.lock().unwrap().try_wait(), Ok(None))
    }
}

impl MoveEngine for EngineProcess {
    fn request_move(&self, fen: &str) -> Result<String, EngineError> {
        if !self.is_alive() {
            return Err(EngineError::Unavailable);
        }
        {
            let mut stdin = self.stdin.lock().unwrap();
            let writer = stdin.as_mut().ok_or(EngineError::Unavailable)?;
            writeln!(writer, "{fen}")?;
            writer.flush()?;
        }
        let mut line = String::new();
        let n = self.stdout.lock().unwrap().read_line(&mut line)?;
        if n == 0 {
            // EOF: the process went away mid-request
            return Err(EngineError::Unavailable);
        }
        let reply = line.trim().to_string();
        debug!("engine replied {reply:?}");
        if reply.is_empty() {
            return Err(EngineError::Protocol(reply));
        }
        Ok(reply)
    }

    fn shutdown(&self) {
        // Closing the write side after `quit` lets a well-behaved bot exit
        // on its own; taking the writer also makes shutdown idempotent.
        if let Some(mut writer) = self.stdin.lock().unwrap().take() {
            let _ = writeln!(writer, "quit");
            let _ = writer.flush();
        } else {
            return;
        }
        let mut child = self.child.lock().unwrap();
        let deadline = Instant::now() + SHUTDOWN_WAIT;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("engine exited: {status}");
                    return;
                }
                Ok(None) if Instant::now() < deadline => thread::sleep(SHUTDOWN_POLL),
                Ok(None) => break,
                Err(e) => {
                    warn!("could not observe engine exit: {e}");
                    break;
                }
            }
        }
        warn!("engine ignored quit, killing it");
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.shutdown();
    }
}
