use serde::Serialize;

/// Database URL split into loggable parts, with secrets masked.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RedactedConnection {
    pub user: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub redacted: String,
}

/// Mask the password and sensitive query parameters of a Postgres URL.
pub fn redact_connection_string(conn: &str) -> RedactedConnection {
    let Some((scheme, rest)) = conn.split_once("://") else {
        return RedactedConnection {
            user: None,
            host: None,
            port: None,
            database: None,
            redacted: redact_query(conn),
        };
    };

    // Passwords may hold '/' or '?', so the userinfo ends at the last '@'.
    let (credentials, after_credentials) = match rest.rsplit_once('@') {
        Some((credentials, after)) => (Some(credentials), after),
        None => (None, rest),
    };
    let (host_and_path, query) = match after_credentials.split_once('?') {
        Some((head, query)) => (head, Some(query)),
        None => (after_credentials, None),
    };
    let (host_port, path) = host_and_path
        .split_once('/')
        .unwrap_or((host_and_path, ""));

    let (user, masked_credentials) = match credentials {
        Some(credentials) => match credentials.split_once(':') {
            Some((user, _)) => (Some(user.to_string()), format!("{user}:***@")),
            None => (Some(credentials.to_string()), format!("{credentials}@")),
        },
        None => (None, String::new()),
    };

    let (host, port) = match host_port.rsplit_once(':') {
        Some((host, port)) => (host.to_string(), port.parse::<u16>().ok()),
        None => (host_port.to_string(), None),
    };

    let mut redacted = format!("{scheme}://{masked_credentials}{host_port}");
    if !path.is_empty() {
        redacted.push('/');
        redacted.push_str(path);
    }
    if let Some(query) = query {
        redacted.push('?');
        redacted.push_str(&redact_pairs(query));
    }

    RedactedConnection {
        user,
        host: (!host.is_empty()).then_some(host),
        port,
        database: (!path.is_empty()).then(|| path.to_string()),
        redacted,
    }
}

fn redact_query(conn: &str) -> String {
    match conn.split_once('?') {
        Some((base, query)) => format!("{base}?{}", redact_pairs(query)),
        None => conn.to_string(),
    }
}

fn redact_pairs(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn is_sensitive_key(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "password" | "pass" | "sslpassword" | "token"
    )
}
