//! Terminal driver for the controlling tty of this process.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use libc::{self, c_int};
use signal_hook::SigId;
use tracing::{debug, warn};

use crate::config::EnvConfig;
use crate::core::geometry::{Point, Size};
use crate::core::input::{decode, parse_cursor_report, InputToken};
use crate::core::terminal::{InputSource, Terminal};

const FALLBACK_SIZE: Size = (80, 24);
const POLL_INTERVAL_MS: i32 = 50;
const CURSOR_REPORT_TIMEOUT: Duration = Duration::from_millis(200);

fn wait_writable(fd: c_int) -> io::Result<()> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, -1) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result > 0 && (fds.revents & libc::POLLOUT) != 0 {
            return Ok(());
        }
        if result > 0 {
            return Err(io::Error::other(format!(
                "poll(POLLOUT) returned revents=0x{:x}",
                fds.revents
            )));
        }
    }
}

fn write_all_fd_with<FWrite, FWait>(
    fd: c_int,
    bytes: &[u8],
    mut write_once: FWrite,
    mut wait_writable: FWait,
) -> io::Result<()>
where
    FWrite: FnMut(c_int, &[u8]) -> io::Result<usize>,
    FWait: FnMut(c_int) -> io::Result<()>,
{
    let mut written = 0;
    while written < bytes.len() {
        match write_once(fd, &bytes[written..]) {
            Ok(0) => {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
            }
            Ok(count) => written += count.min(bytes.len() - written),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => wait_writable(fd)?,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn write_fd(fd: c_int, data: &str) -> io::Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    write_all_fd_with(
        fd,
        data.as_bytes(),
        |fd, buf| {
            let result = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
            if result < 0 {
                Err(io::Error::last_os_error())
            } else {
                Ok(result as usize)
            }
        },
        wait_writable,
    )
}

fn read_fd(fd: c_int) -> io::Result<Vec<u8>> {
    let mut buf = [0u8; 1024];
    loop {
        let result = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(buf[..result as usize].to_vec());
    }
}

fn read_winsize(fd: c_int) -> Option<Size> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col as usize, size.ws_row as usize))
    } else {
        None
    }
}

fn poll_readable(fd: c_int, timeout_ms: i32) -> bool {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    // A hangup is reported as readable so the following read sees end of input.
    result > 0 && (fds.revents & (libc::POLLIN | libc::POLLHUP)) != 0
}

fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Raw-mode driver over stdin/stdout.
///
/// Input is read synchronously from [`InputSource::next_token`]; `SIGWINCH` only raises a
/// flag, which the next read turns into an [`InputToken::Resize`].
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: Option<libc::termios>,
    resized: Arc<AtomicBool>,
    sigwinch: Option<SigId>,
    pending: VecDeque<InputToken>,
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
}

impl ProcessTerminal {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            original_termios: None,
            resized: Arc::new(AtomicBool::new(false)),
            sigwinch: None,
            pending: VecDeque::new(),
            write_log_path: config.write_log.as_ref().map(PathBuf::from),
            write_log_failed: false,
        }
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        let original = match self.original_termios {
            Some(original) => original,
            None => {
                let original = get_termios(self.stdin_fd)?;
                self.original_termios = Some(original);
                original
            }
        };
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(self.stdin_fd, &raw)
    }

    fn restore_raw_mode(&mut self) -> io::Result<()> {
        if let Some(original) = self.original_termios.take() {
            set_termios(self.stdin_fd, &original)?;
        }
        Ok(())
    }

    fn log_write(&mut self, data: &str) {
        let Some(path) = self.write_log_path.as_ref() else {
            return;
        };
        if self.write_log_failed {
            return;
        }
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(data.as_bytes()));
        if let Err(err) = result {
            warn!(path = %path.display(), %err, "terminal write log disabled");
            self.write_log_failed = true;
        }
    }

    fn read_tokens(&mut self, timeout_ms: i32) -> io::Result<bool> {
        if !poll_readable(self.stdin_fd, timeout_ms) {
            return Ok(true);
        }
        let bytes = read_fd(self.stdin_fd)?;
        if bytes.is_empty() {
            return Ok(false);
        }
        self.pending
            .extend(decode(&String::from_utf8_lossy(&bytes)));
        Ok(true)
    }
}

impl Terminal for ProcessTerminal {
    fn start(&mut self) -> io::Result<()> {
        self.enable_raw_mode()?;
        if self.sigwinch.is_none() {
            let id = signal_hook::flag::register(libc::SIGWINCH, Arc::clone(&self.resized))?;
            self.sigwinch = Some(id);
        }
        debug!(size = ?self.size(), "process terminal started");
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        if let Some(id) = self.sigwinch.take() {
            signal_hook::low_level::unregister(id);
        }
        self.restore_raw_mode()
    }

    fn write(&mut self, data: &str) -> io::Result<()> {
        self.log_write(data);
        write_fd(self.stdout_fd, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> Size {
        read_winsize(self.stdout_fd).unwrap_or(FALLBACK_SIZE)
    }

    fn query_cursor(&mut self) -> io::Result<Option<Point>> {
        self.write("\x1b[6n")?;
        let deadline = Instant::now() + CURSOR_REPORT_TIMEOUT;
        let mut reply = Vec::new();

        while Instant::now() < deadline {
            if !poll_readable(self.stdin_fd, POLL_INTERVAL_MS) {
                continue;
            }
            reply.extend(read_fd(self.stdin_fd)?);
            let text = String::from_utf8_lossy(&reply).into_owned();
            if let Some(start) = text.rfind("\x1b[") {
                if let Some(len) = text[start..].find('R') {
                    let report = &text[start..=start + len];
                    if let Some(pos) = parse_cursor_report(report) {
                        let rest = format!("{}{}", &text[..start], &text[start + len + 1..]);
                        self.pending.extend(decode(&rest));
                        return Ok(Some(pos));
                    }
                }
            }
        }

        self.pending
            .extend(decode(&String::from_utf8_lossy(&reply)));
        Ok(None)
    }
}

impl InputSource for ProcessTerminal {
    fn next_token(&mut self) -> io::Result<Option<InputToken>> {
        loop {
            if self.resized.swap(false, Ordering::Relaxed) {
                return Ok(Some(InputToken::Resize(self.size())));
            }
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            if !self.read_tokens(POLL_INTERVAL_MS)? {
                return Ok(None);
            }
        }
    }
}

impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(%err, "failed to restore terminal");
        }
    }
}
