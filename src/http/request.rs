/// Maximum accepted length of the method token.
pub const MAX_METHOD_LEN: usize = 15;

/// Maximum accepted length of the request-target token.
pub const MAX_TARGET_LEN: usize = 511;

/// Maximum accepted length of the protocol-version token.
pub const MAX_VERSION_LEN: usize = 15;

/// A parsed request line, borrowing from the connection's input buffer.
///
/// Only the three request-line tokens are extracted; headers beyond the
/// request line are ignored (the server answers a single GET per connection
/// and never honors keep-alive).
#[derive(Debug, PartialEq, Eq)]
pub struct Request<'a> {
    /// The method token, e.g. `GET`.
    pub method: &'a str,
    /// The request target, e.g. `/index.html`.
    pub target: &'a str,
    /// The protocol version token, e.g. `HTTP/1.1`.
    pub version: &'a str,
}

/// Why a buffered request could not be parsed. All variants answer 400.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than three whitespace-delimited tokens were found.
    MissingTokens,
    /// A token exceeded its maximum length.
    OversizedToken,
    /// A token was not valid UTF-8.
    InvalidEncoding,
}

/// Extracts the method, target, and version tokens from buffered bytes.
///
/// The caller invokes this only once the buffer holds a complete header
/// terminator (`\r\n\r\n`); detecting the terminator is the event loop's
/// responsibility, not the parser's. Tokens are the first three maximal
/// runs of non-whitespace bytes, each bounded to a maximum length.
pub fn parse(buffer: &[u8]) -> Result<Request<'_>, ParseError> {
    let mut tokens = buffer
        .split(|b| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty());

    let method = token(tokens.next(), MAX_METHOD_LEN)?;
    let target = token(tokens.next(), MAX_TARGET_LEN)?;
    let version = token(tokens.next(), MAX_VERSION_LEN)?;

    Ok(Request {
        method,
        target,
        version,
    })
}

fn token(raw: Option<&[u8]>, max_len: usize) -> Result<&str, ParseError> {
    let raw = raw.ok_or(ParseError::MissingTokens)?;

    if raw.len() > max_len {
        return Err(ParseError::OversizedToken);
    }

    std::str::from_utf8(raw).map_err(|_| ParseError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();

        assert_eq!(req.method, "GET");
        assert_eq!(req.target, "/index.html");
        assert_eq!(req.version, "HTTP/1.1");
    }

    #[test]
    fn parse_root_target() {
        let req = parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.target, "/");
    }

    #[test]
    fn fewer_than_three_tokens_is_malformed() {
        assert_eq!(parse(b"\r\n\r\n"), Err(ParseError::MissingTokens));
        assert_eq!(parse(b"GET\r\n\r\n"), Err(ParseError::MissingTokens));
        assert_eq!(parse(b"GET /\r\n\r\n"), Err(ParseError::MissingTokens));
    }

    #[test]
    fn oversized_tokens_are_malformed() {
        let method = "X".repeat(MAX_METHOD_LEN + 1);
        let line = format!("{method} / HTTP/1.1\r\n\r\n");
        assert_eq!(parse(line.as_bytes()), Err(ParseError::OversizedToken));

        let target = format!("/{}", "a".repeat(MAX_TARGET_LEN));
        let line = format!("GET {target} HTTP/1.1\r\n\r\n");
        assert_eq!(parse(line.as_bytes()), Err(ParseError::OversizedToken));
    }

    #[test]
    fn longest_allowed_target_parses() {
        let target = format!("/{}", "a".repeat(MAX_TARGET_LEN - 1));
        let line = format!("GET {target} HTTP/1.1\r\n\r\n");

        let req = parse(line.as_bytes()).unwrap();
        assert_eq!(req.target.len(), MAX_TARGET_LEN);
    }

    #[test]
    fn non_utf8_token_is_malformed() {
        assert_eq!(
            parse(b"GET /\xff\xfe HTTP/1.1\r\n\r\n"),
            Err(ParseError::InvalidEncoding)
        );
    }

    #[test]
    fn non_get_methods_still_parse() {
        // Method filtering is the handler's job, not the parser's.
        let req = parse(b"DELETE /x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.method, "DELETE");
    }
}
