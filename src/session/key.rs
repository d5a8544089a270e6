use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::DEFAULT_SESSION_ALIAS;

/// A session key with a declared value type.
///
/// Values written through [`Sessions::set_key`](super::Sessions::set_key)
/// can only be of `Value`, and reads come back as `Value` or a conversion
/// error if the cookie holds something else.
///
/// ```rust
/// use jwt_session::SessionKey;
///
/// struct CartItems;
///
/// impl SessionKey for CartItems {
///     const NAME: &'static str = "cart_items";
///     const SESSION: &'static str = "cart";
///     type Value = Vec<u32>;
/// }
/// ```
pub trait SessionKey {
    /// Key inside the session's value map.
    const NAME: &'static str;
    /// Session holding the key; the alias targets the default session.
    const SESSION: &'static str = DEFAULT_SESSION_ALIAS;

    type Value: Serialize + DeserializeOwned;
}
