//! HTTP Basic credential parsing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::AuthError;

/// Username and password carried by a Basic `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Parse the value of an `Authorization` header.
///
/// The value must be exactly two whitespace-separated tokens, the first one
/// `basic` in any case. The password is everything after the first `:` of
/// the decoded payload, so passwords may themselves contain colons.
pub fn parse_basic_credentials(header: &str) -> Result<Credentials, AuthError> {
    let mut tokens = header.split_whitespace();
    let (scheme, token) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::MalformedHeader),
    };

    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::UnsupportedScheme(scheme.to_string()));
    }

    let decoded = STANDARD
        .decode(token)
        .map_err(|_| AuthError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidEncoding)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MissingSeparator)?;

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        STANDARD.encode(raw)
    }

    #[test]
    fn test_parses_valid_header() {
        let header = format!("Basic {}", encode("alice:secret"));
        let creds = parse_basic_credentials(&header).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let header = format!("bAsIc {}", encode("alice:secret"));
        assert!(parse_basic_credentials(&header).is_ok());
    }

    #[test]
    fn test_password_keeps_extra_colons() {
        let header = format!("Basic {}", encode("alice:se:cr:et"));
        assert_eq!(parse_basic_credentials(&header).unwrap().password, "se:cr:et");
    }

    #[test]
    fn test_rejects_wrong_token_count() {
        assert_eq!(parse_basic_credentials("Basic"), Err(AuthError::MalformedHeader));
        assert_eq!(
            parse_basic_credentials("Basic abc def"),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(parse_basic_credentials(""), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            parse_basic_credentials("Bearer abc"),
            Err(AuthError::UnsupportedScheme("Bearer".to_string()))
        );
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert_eq!(
            parse_basic_credentials("Basic !!!not-base64!!!"),
            Err(AuthError::InvalidEncoding)
        );
    }

    #[test]
    fn test_rejects_missing_separator() {
        let header = format!("Basic {}", encode("alicesecret"));
        assert_eq!(
            parse_basic_credentials(&header),
            Err(AuthError::MissingSeparator)
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
