use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite as CookieSameSite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    None,
    #[default]
    Lax,
    Strict,
}

impl From<SameSite> for CookieSameSite {
    fn from(value: SameSite) -> Self {
        match value {
            SameSite::None => CookieSameSite::None,
            SameSite::Lax => CookieSameSite::Lax,
            SameSite::Strict => CookieSameSite::Strict,
        }
    }
}

/// Attributes written on a session cookie.
///
/// `max_age` is in seconds: positive values set `Max-Age`, zero makes a
/// browser-session cookie, and a negative value deletes the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub domain: Option<String>,
    pub max_age: i64,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_owned(),
            domain: None,
            max_age: 3600,
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

impl CookieOptions {
    #[must_use]
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = seconds;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Same attributes, marked for deletion.
    #[must_use]
    pub fn expired(&self) -> Self {
        Self {
            max_age: -1,
            ..self.clone()
        }
    }

    pub fn is_expired(&self) -> bool {
        self.max_age < 0
    }

    pub(crate) fn build_cookie(&self, name: String, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::build(name, value)
            .path(self.path.clone())
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(self.same_site.into())
            .finish();

        if self.max_age > 0 {
            cookie.set_max_age(CookieDuration::seconds(self.max_age));
        }

        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }

        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CookieOptions::default();
        assert_eq!(options.path, "/");
        assert_eq!(options.max_age, 3600);
        assert!(options.http_only);
        assert!(!options.secure);
        assert_eq!(options.same_site, SameSite::Lax);
        assert!(!options.is_expired());
    }

    #[test]
    fn test_build_cookie_attributes() {
        let options = CookieOptions::default()
            .with_max_age(120)
            .with_domain("example.com")
            .with_secure(true)
            .with_same_site(SameSite::Strict);

        let cookie = options.build_cookie("name".to_owned(), "value".to_owned());
        assert_eq!(cookie.name(), "name");
        assert_eq!(cookie.value(), "value");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(120)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(CookieSameSite::Strict));
    }

    #[test]
    fn test_zero_max_age_is_browser_session_cookie() {
        let cookie = CookieOptions::default()
            .with_max_age(0)
            .build_cookie("name".to_owned(), "value".to_owned());
        assert_eq!(cookie.max_age(), None);
    }

    #[test]
    fn test_expired_keeps_path() {
        let options = CookieOptions::default().with_path("/app").expired();
        assert!(options.is_expired());
        assert_eq!(options.path, "/app");
        assert!(options.http_only);
    }
}
