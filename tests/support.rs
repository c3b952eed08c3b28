use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

pub const OK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK";
pub const ERROR_RESPONSE: &[u8] =
    b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nboom";

pub struct ServerHandle {
    requests: Arc<AtomicUsize>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ServerHandle {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Blocks until the server has answered at least `count` requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the count is not reached within `limit`.
    pub fn wait_for_requests(&self, count: usize, limit: Duration) -> Result<(), String> {
        let started = Instant::now();
        while self.requests() < count {
            if started.elapsed() > limit {
                return Err(format!(
                    "server saw {} request(s), expected {}",
                    self.requests(),
                    count
                ));
            }
            thread::sleep(Duration::from_millis(10));
        }
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server that answers every request with
/// `response` and counts what it served.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(response: &'static [u8]) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let requests = Arc::new(AtomicUsize::new(0));
    let served = Arc::clone(&requests);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let served = Arc::clone(&served);
                    thread::spawn(move || {
                        if handle_client(stream, response) {
                            served.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}/", addr),
        ServerHandle {
            requests,
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Same as [`spawn_http_server`], but skips in sandboxes without sockets.
///
/// # Errors
///
/// Returns an error if the server fails for any other reason.
pub fn spawn_http_server_or_skip(
    response: &'static [u8],
) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server(response) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream, response: &[u8]) -> bool {
    if stream.set_nonblocking(false).is_err() {
        return false;
    }
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return false;
    }
    if stream.write_all(response).is_err() {
        return false;
    }
    if stream.flush().is_err() {
        return false;
    }
    drop(stream.shutdown(Shutdown::Both));
    true
}

fn bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_infinite-wget").map_or_else(
        || Err("CARGO_BIN_EXE_infinite-wget missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

fn command<I, S>(args: I, cwd: &Path) -> Result<Command, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(bin()?);
    cmd.args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "error")
        .env_remove("INFINITE_WGET_LOG")
        .env_remove("INFINITE_WGET_URL");
    Ok(cmd)
}

/// Run the binary to completion and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_infinite_wget<I, S>(args: I, cwd: &Path) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    command(args, cwd)?
        .output()
        .map_err(|err| format!("run infinite-wget failed: {}", err))
}

/// Start the binary in the background with piped output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn spawn_infinite_wget<I, S>(args: I, cwd: &Path) -> Result<Child, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    command(args, cwd)?
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("spawn infinite-wget failed: {}", err))
}

/// Send SIGINT and collect the output once the process exits.
///
/// # Errors
///
/// Returns an error if the signal cannot be delivered or the process does
/// not exit within `limit`.
#[cfg(unix)]
pub fn interrupt_and_wait(mut child: Child, limit: Duration) -> Result<Output, String> {
    let pid = i32::try_from(child.id()).map_err(|err| format!("pid out of range: {}", err))?;
    // SAFETY: `kill` only reads its two integer arguments; `pid` is our own
    // child, which has not been reaped yet.
    let rc = unsafe { libc::kill(pid, libc::SIGINT) };
    if rc != 0 {
        return Err(format!(
            "kill failed: {}",
            std::io::Error::last_os_error()
        ));
    }

    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_status)) => break,
            Ok(None) if started.elapsed() > limit => {
                drop(child.kill());
                let output = child
                    .wait_with_output()
                    .map_err(|err| format!("wait failed: {}", err))?;
                return Err(format!(
                    "process did not exit after SIGINT\nstdout: {}\nstderr: {}",
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr)
                ));
            }
            Ok(None) => thread::sleep(Duration::from_millis(20)),
            Err(err) => return Err(format!("try_wait failed: {}", err)),
        }
    }
    child
        .wait_with_output()
        .map_err(|err| format!("collect output failed: {}", err))
}
