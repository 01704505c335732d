use crate::fs::File;
use crate::http::error::RequestError;
use crate::reactor::poller::platform::{sys_sendfile, sys_wait_writable, sys_write};

use std::io;
use std::os::fd::RawFd;
use std::time::SystemTime;

/// Identity sent in the `Server` header of every response.
pub const SERVER_NAME: &str = "mini-webserver/0.1";

/// HTTP status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Formats the status line and the standard header block.
///
/// Field order is fixed: `Server`, `Date` (RFC 1123), `Content-Type`,
/// `Content-Length`, `Connection: close`, blank line. The body, if any,
/// follows the returned block on the wire.
pub fn format_header(status: StatusCode, content_type: &str, content_length: u64) -> Vec<u8> {
    let date = httpdate::fmt_http_date(SystemTime::now());

    format!(
        "HTTP/1.1 {} {}\r\n\
         Server: {}\r\n\
         Date: {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        status.as_u16(),
        status.reason_phrase(),
        SERVER_NAME,
        date,
        content_type,
        content_length,
    )
    .into_bytes()
}

/// Writes a complete header + body response to the socket.
///
/// Partial writes are retried until every byte is sent or a fatal socket
/// error occurs.
pub fn send_response(
    fd: RawFd,
    status: StatusCode,
    content_type: &str,
    body: &[u8],
) -> io::Result<()> {
    let header = format_header(status, content_type, body.len() as u64);

    send_all(fd, &header)?;
    if !body.is_empty() {
        send_all(fd, body)?;
    }

    Ok(())
}

/// Writes a success header for the file, then streams its contents.
pub fn send_file(fd: RawFd, file: &File, content_type: &str) -> io::Result<()> {
    let header = format_header(StatusCode::Ok, content_type, file.size());

    send_all(fd, &header)?;
    transfer_file(fd, file)
}

/// Writes the canned response for a request error.
pub fn send_error(fd: RawFd, error: RequestError) -> io::Result<()> {
    send_response(fd, error.status(), error.content_type(), error.body())
}

/// Writes the entire buffer to a non-blocking socket.
///
/// `EAGAIN` waits for writability and retries; `EINTR` retries immediately.
/// A write of zero bytes means the peer can accept nothing more and is
/// reported as `WriteZero`.
pub(crate) fn send_all(fd: RawFd, mut buffer: &[u8]) -> io::Result<()> {
    while !buffer.is_empty() {
        let n = sys_write(fd, buffer);

        if n > 0 {
            buffer = &buffer[n as usize..];
        } else if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write returned zero bytes",
            ));
        } else {
            let err = io::Error::last_os_error();

            match err.kind() {
                io::ErrorKind::WouldBlock => sys_wait_writable(fd)?,
                io::ErrorKind::Interrupted => continue,
                _ => return Err(err),
            }
        }
    }

    Ok(())
}

/// Copies the whole file to the socket with `sendfile`.
///
/// The success header must already have been sent. The kernel advances the
/// offset cursor; the loop runs until all bytes are on the wire. `EAGAIN`
/// waits for socket writability and continues — the transfer itself stays
/// synchronous, which can hold the single thread for the duration of a
/// large file. Zero progress or any other error is unrecoverable for this
/// connection.
pub fn transfer_file(fd: RawFd, file: &File) -> io::Result<()> {
    let total = file.size() as libc::off_t;
    let mut offset: libc::off_t = 0;

    while offset < total {
        let remaining = (total - offset) as usize;
        let sent = sys_sendfile(fd, file.as_raw_fd(), &mut offset, remaining);

        if sent == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "sendfile made no progress",
            ));
        }

        if sent < 0 {
            let err = io::Error::last_os_error();

            match err.kind() {
                io::ErrorKind::WouldBlock => sys_wait_writable(fd)?,
                io::ErrorKind::Interrupted => continue,
                _ => return Err(err),
            }
        }
    }

    Ok(())
}
