//! Address validation and message composition

use std::fmt;

/// Extract the bare address from `addr` or `Name <addr>`
fn bare_address(address: &str) -> &str {
    let address = address.trim();
    match (address.rfind('<'), address.rfind('>')) {
        (Some(start), Some(end)) if start < end => address[start + 1..end].trim(),
        _ => address,
    }
}

/// Whether `address` looks like `local@domain`
///
/// This is a sanity check against typos on the command line, not an RFC 5322
/// parser.
pub fn is_valid_address(address: &str) -> bool {
    let bare = bare_address(address);
    if bare.chars().any(char::is_whitespace) {
        return false;
    }
    match bare.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Validate every address, logging the first invalid one
pub fn verify_addresses<S: AsRef<str>>(addresses: &[S]) -> bool {
    for address in addresses {
        if !is_valid_address(address.as_ref()) {
            tracing::warn!(address = %address.as_ref(), "Not a valid email address");
            return false;
        }
    }
    true
}

/// An HTML email ready to hand to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    /// Compose a message to `to` with an HTML body
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cc: Vec::new(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }

    /// Add CC recipients
    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        if !cc.is_empty() {
            tracing::info!(cc = %cc.join(", "), "Sending CC");
        }
        self.cc = cc;
        self
    }

    /// Every envelope recipient, primary first
    pub fn recipients(&self) -> Vec<&str> {
        std::iter::once(self.to.as_str())
            .chain(self.cc.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for EmailMessage {
    /// RFC 5322 rendition with CRLF line endings
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "From: {}\r\n", self.from)?;
        write!(f, "To: {}\r\n", self.to)?;
        if !self.cc.is_empty() {
            write!(f, "Cc: {}\r\n", self.cc.join(", "))?;
        }
        write!(f, "Subject: {}\r\n", self.subject)?;
        write!(f, "MIME-Version: 1.0\r\n")?;
        write!(f, "Content-Type: text/html; charset=utf-8\r\n")?;
        write!(f, "Content-Transfer-Encoding: 8bit\r\n")?;
        write!(f, "\r\n")?;
        for line in self.html_body.lines() {
            write!(f, "{line}\r\n")?;
        }
        Ok(())
    }
}
