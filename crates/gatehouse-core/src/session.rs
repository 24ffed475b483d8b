//! Signed, self-contained session cookies.
//!
//! A token is `base64url(json payload) "." base64url(hmac-sha256(payload))`.
//! Nothing is kept server-side; logging out only clears the cookie.

use crate::config::SessionConfig;
use crate::crypto::Crypto;
use crate::error::{GatehouseError, Result};
use crate::user::User;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user: SessionUser,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn create(user: &User, ttl: Duration) -> Result<Self> {
        Self::create_at(user, ttl, Utc::now())
    }

    /// Fails when `now + ttl` does not fit in a timestamp.
    pub fn create_at(user: &User, ttl: Duration, now: DateTime<Utc>) -> Result<Self> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            GatehouseError::InvalidConfig(format!(
                "session ttl of {} hours is out of range",
                ttl.num_hours()
            ))
        })?;
        Ok(Self {
            id: Uuid::new_v4(),
            user: SessionUser {
                id: user.id,
                username: user.username.clone(),
            },
            issued_at,
            expires_at,
        })
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn encode(&self, crypto: &Crypto) -> Result<String> {
        let payload = serde_json::to_vec(self)?;
        let tag = crypto.sign(&payload);
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Checks shape, then signature, then payload, then expiry.
    pub fn decode(token: &str, crypto: &Crypto, now: DateTime<Utc>) -> Result<Self> {
        let invalid = |reason: &str| GatehouseError::InvalidSession(reason.to_string());

        let (payload, tag) = token.split_once('.').ok_or_else(|| invalid("malformed token"))?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| invalid("malformed payload"))?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| invalid("malformed signature"))?;
        if !crypto.verify(&payload, &tag) {
            return Err(invalid("bad signature"));
        }
        let session: Session =
            serde_json::from_slice(&payload).map_err(|_| invalid("unreadable payload"))?;
        if now >= session.expires_at {
            return Err(invalid("expired"));
        }
        Ok(session)
    }

    /// Find and decode the named cookie in a `Cookie` request header.
    ///
    /// Absent or empty cookie is `Ok(None)`; a present but bad one is an error.
    pub fn from_cookie_header(
        header: &str,
        cookie_name: &str,
        crypto: &Crypto,
        now: DateTime<Utc>,
    ) -> Result<Option<Self>> {
        let value = header.split(';').find_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            (name == cookie_name).then_some(value)
        });
        match value {
            None | Some("") => Ok(None),
            Some(token) => Self::decode(token, crypto, now).map(Some),
        }
    }

    /// `Set-Cookie` value that stores this session in the browser.
    pub fn cookie_login(&self, crypto: &Crypto, config: &SessionConfig) -> Result<String> {
        let max_age = (self.expires_at - self.issued_at).num_seconds().max(0);
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}",
            config.cookie_name,
            self.encode(crypto)?
        );
        if config.secure {
            cookie.push_str("; Secure");
        }
        Ok(cookie)
    }

    /// `Set-Cookie` value that clears the session cookie.
    pub fn cookie_logout(config: &SessionConfig) -> String {
        let mut cookie = format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
            config.cookie_name
        );
        if config.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> Crypto {
        Crypto::new(vec![42u8; 32]).unwrap()
    }

    fn alice() -> User {
        User {
            id: 7,
            username: "alice".into(),
            created_at: Utc::now(),
        }
    }

    fn token_value(set_cookie: &str) -> &str {
        let first = set_cookie.split(';').next().unwrap();
        first.split_once('=').unwrap().1
    }

    #[test]
    fn encoded_session_decodes_to_same_session() {
        let c = crypto();
        let session = Session::create(&alice(), Duration::hours(1)).unwrap();
        let token = session.encode(&c).unwrap();
        let decoded = Session::decode(&token, &c, Utc::now()).unwrap();
        assert_eq!(decoded, session);
        assert_eq!(decoded.user().id, 7);
        assert_eq!(decoded.user().username, "alice");
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let c = crypto();
        let token = Session::create(&alice(), Duration::hours(1))
            .unwrap()
            .encode(&c)
            .unwrap();
        let (_, tag) = token.split_once('.').unwrap();

        let mut forged = Session::create(&alice(), Duration::hours(1)).unwrap();
        forged.user.id = 1;
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());

        let err = Session::decode(&format!("{forged_payload}.{tag}"), &c, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("bad signature"));
    }

    #[test]
    fn token_from_other_key_is_rejected() {
        let token = Session::create(&alice(), Duration::hours(1))
            .unwrap()
            .encode(&Crypto::new(vec![1u8; 32]).unwrap())
            .unwrap();
        assert!(Session::decode(&token, &crypto(), Utc::now()).is_err());
    }

    #[test]
    fn expired_session_is_rejected() {
        let c = crypto();
        let issued = Utc::now() - Duration::hours(2);
        let token = Session::create_at(&alice(), Duration::hours(1), issued)
            .unwrap()
            .encode(&c)
            .unwrap();
        let err = Session::decode(&token, &c, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn out_of_range_ttl_is_an_error() {
        for ttl in [Duration::hours(u32::MAX as i64), Duration::days(i32::MAX as i64)] {
            assert!(matches!(
                Session::create(&alice(), ttl),
                Err(GatehouseError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let c = crypto();
        for token in ["", "no-dot", "!!!.???", "e30.AAAA"] {
            assert!(
                matches!(
                    Session::decode(token, &c, Utc::now()),
                    Err(GatehouseError::InvalidSession(_))
                ),
                "expected rejection for {token:?}"
            );
        }
    }

    #[test]
    fn cookie_header_lookup() {
        let c = crypto();
        let config = SessionConfig::default();
        let session = Session::create(&alice(), Duration::hours(1)).unwrap();
        let set_cookie = session.cookie_login(&c, &config).unwrap();
        let header = format!("theme=dark; session={}; other=1", token_value(&set_cookie));

        let found = Session::from_cookie_header(&header, "session", &c, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(found, session);

        assert_eq!(
            Session::from_cookie_header("theme=dark", "session", &c, Utc::now()).unwrap(),
            None
        );
        assert_eq!(
            Session::from_cookie_header("session=", "session", &c, Utc::now()).unwrap(),
            None
        );
        assert!(Session::from_cookie_header("session=junk", "session", &c, Utc::now()).is_err());
    }

    #[test]
    fn login_cookie_attributes() {
        let c = crypto();
        let mut config = SessionConfig::default();
        let session = Session::create(&alice(), Duration::hours(1)).unwrap();

        let cookie = session.cookie_login(&c, &config).unwrap();
        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        config.secure = true;
        config.cookie_name = "gh".into();
        let cookie = session.cookie_login(&c, &config).unwrap();
        assert!(cookie.starts_with("gh="));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn logout_cookie_clears_value() {
        let cookie = Session::cookie_logout(&SessionConfig::default());
        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
