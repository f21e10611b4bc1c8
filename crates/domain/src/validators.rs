use url::Url;

pub fn validate_source_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Source id cannot be empty".to_string());
    }
    if id.len() > 200 {
        return Err("Source id cannot exceed 200 characters".to_string());
    }
    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), String> {
    if url.len() > 2048 {
        return Err("URL cannot exceed 2048 characters".to_string());
    }
    let parsed = Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err("URL scheme must be http or https".to_string());
    }
    if parsed.host_str().is_none() {
        return Err(format!("URL '{}' has no host", url));
    }
    Ok(())
}

/// Basic hostname syntax check for rewrite domains.
///
/// Accepts LDH labels of 1..=63 chars, a total of at most 253 chars, at least
/// two labels, and one optional leading `*.` wildcard label.
pub fn validate_domain(domain: &str) -> Result<(), String> {
    let name = domain.strip_prefix("*.").unwrap_or(domain);

    if name.is_empty() {
        return Err("Domain cannot be empty".to_string());
    }
    if name.len() > 253 {
        return Err("Domain cannot exceed 253 characters".to_string());
    }
    if !name.contains('.') {
        return Err(format!("'{}' has no TLD", domain));
    }

    for label in name.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(format!("'{}' has an empty or oversized label", domain));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("'{}' has a label starting or ending with '-'", domain));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(format!("'{}' contains invalid characters", domain));
        }
    }

    Ok(())
}
