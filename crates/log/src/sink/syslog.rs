//! Local system log sink

use std::io;

use crate::level::Severity;

use super::Sink;

/// `LOG_DAEMON`
const FACILITY_CODE: u8 = 3;

/// Default socket of the local syslog daemon
pub const DEFAULT_SOCKET: &str = "/dev/log";

/// Sends lines to the local syslog daemon over its datagram socket
///
/// Messages use the traditional `<PRI>ident[pid]: text` framing. When the
/// socket cannot be reached the sink is inert and every write is a no-op.
#[derive(Debug)]
pub struct SyslogSink {
    ident: String,
    pid: u32,
    #[cfg(unix)]
    socket: Option<std::os::unix::net::UnixDatagram>,
}

impl SyslogSink {
    /// Connect to [`DEFAULT_SOCKET`]
    pub fn new(ident: impl Into<String>) -> Self {
        Self::with_socket(ident, DEFAULT_SOCKET)
    }

    /// Connect to a specific datagram socket
    pub fn with_socket(ident: impl Into<String>, socket_path: impl AsRef<std::path::Path>) -> Self {
        #[cfg(not(unix))]
        let _ = socket_path;
        Self {
            ident: ident.into(),
            pid: std::process::id(),
            #[cfg(unix)]
            socket: connect(socket_path.as_ref()),
        }
    }

    /// Whether a daemon socket is connected
    pub fn is_connected(&self) -> bool {
        #[cfg(unix)]
        {
            self.socket.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Frame a rendered line for the daemon
    pub fn frame(&self, level: Severity, line: &str) -> String {
        let pri = FACILITY_CODE * 8 + level.syslog_priority();
        format!(
            "<{pri}>{}[{}]: {}",
            self.ident,
            self.pid,
            line.trim_end_matches('\n')
        )
    }
}

#[cfg(unix)]
fn connect(path: &std::path::Path) -> Option<std::os::unix::net::UnixDatagram> {
    let socket = std::os::unix::net::UnixDatagram::unbound().ok()?;
    socket.connect(path).ok()?;
    Some(socket)
}

impl Sink for SyslogSink {
    fn write_line(&self, level: Severity, line: &str) -> io::Result<()> {
        #[cfg(unix)]
        {
            if let Some(socket) = &self.socket {
                socket.send(self.frame(level, line).as_bytes())?;
            }
        }
        #[cfg(not(unix))]
        let _ = (level, line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_priority() {
        let sink = SyslogSink::with_socket("vswitchd", "/nonexistent/socket");
        assert!(!sink.is_connected());

        let framed = sink.frame(Severity::Warn, "WARN  netdev eth.c:42: down\n");
        let expected = format!("<28>vswitchd[{}]: WARN  netdev eth.c:42: down", std::process::id());
        assert_eq!(framed, expected);
        assert!(sink.frame(Severity::Dbg, "x").starts_with("<31>"));

        // Disconnected sinks accept writes silently.
        sink.write_line(Severity::Err, "x\n").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_sends_datagrams() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.sock");
        let server = std::os::unix::net::UnixDatagram::bind(&path).unwrap();

        let sink = SyslogSink::with_socket("app", &path);
        assert!(sink.is_connected());
        sink.write_line(Severity::Err, "ERR   app   a.rs:1: boom\n").unwrap();

        let mut buf = [0u8; 256];
        let n = server.recv(&mut buf).unwrap();
        let received = std::str::from_utf8(&buf[..n]).unwrap();
        assert!(received.starts_with("<27>app["));
        assert!(received.ends_with("]: ERR   app   a.rs:1: boom"));
    }
}
