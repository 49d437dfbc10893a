//! Asset URL derivation for the provider CDN
//!
//! These are pure functions of an entity id, an optional content hash and
//! (for users) the legacy discriminator. The formats must match the
//! provider's CDN exactly.

/// Size query parameter appended to custom asset URLs.
pub const ASSET_SIZE: u32 = 1024;

/// Number of built-in default avatars.
pub const DEFAULT_AVATAR_COUNT: u64 = 5;

/// `gif` for animated hashes (prefixed `a_`), `png` otherwise.
pub fn asset_extension(hash: &str) -> &'static str {
    if hash.starts_with("a_") {
        "gif"
    } else {
        "png"
    }
}

/// Index of the default avatar shown for a user without a custom one.
///
/// A numeric discriminator selects `discriminator mod 5`; without a
/// discriminator the user id is used instead. Anything unparsable falls
/// back to index 0.
pub fn default_avatar_index(user_id: &str, discriminator: Option<&str>) -> u64 {
    let source = match discriminator {
        Some(disc) if !disc.is_empty() && disc.bytes().all(|b| b.is_ascii_digit()) => disc,
        Some(_) => return 0,
        None => user_id,
    };

    source
        .parse::<u64>()
        .map(|n| n % DEFAULT_AVATAR_COUNT)
        .unwrap_or(0)
}

fn custom_asset_url(cdn_base: &str, kind: &str, id: &str, hash: &str) -> String {
    format!(
        "{}/{}/{}/{}.{}?size={}",
        cdn_base.trim_end_matches('/'),
        kind,
        id,
        hash,
        asset_extension(hash),
        ASSET_SIZE
    )
}

/// Avatar URL for a user, falling back to a default avatar.
///
/// # Examples
///
/// ```
/// use netcord::cdn::user_avatar_url;
///
/// let cdn = "https://cdn.discordapp.com";
/// assert_eq!(
///     user_avatar_url(cdn, "1234567890", None, Some("7")),
///     "https://cdn.discordapp.com/embed/avatars/2.png"
/// );
/// assert_eq!(
///     user_avatar_url(cdn, "1234567890", Some("a_abc"), Some("7")),
///     "https://cdn.discordapp.com/avatars/1234567890/a_abc.gif?size=1024"
/// );
/// ```
pub fn user_avatar_url(
    cdn_base: &str,
    user_id: &str,
    avatar_hash: Option<&str>,
    discriminator: Option<&str>,
) -> String {
    match avatar_hash {
        Some(hash) => custom_asset_url(cdn_base, "avatars", user_id, hash),
        None => format!(
            "{}/embed/avatars/{}.png",
            cdn_base.trim_end_matches('/'),
            default_avatar_index(user_id, discriminator)
        ),
    }
}

/// Profile banner URL for a user; `None` without a banner hash.
pub fn user_banner_url(cdn_base: &str, user_id: &str, banner_hash: Option<&str>) -> Option<String> {
    banner_hash.map(|hash| custom_asset_url(cdn_base, "banners", user_id, hash))
}

/// Icon URL for a guild; `None` without an icon hash.
pub fn guild_icon_url(cdn_base: &str, guild_id: &str, icon_hash: Option<&str>) -> Option<String> {
    icon_hash.map(|hash| custom_asset_url(cdn_base, "icons", guild_id, hash))
}

/// Banner URL for a guild; `None` without a banner hash.
pub fn guild_banner_url(
    cdn_base: &str,
    guild_id: &str,
    banner_hash: Option<&str>,
) -> Option<String> {
    banner_hash.map(|hash| custom_asset_url(cdn_base, "banners", guild_id, hash))
}

/// Icon URL for an application; `None` without an icon hash.
pub fn application_icon_url(
    cdn_base: &str,
    application_id: &str,
    icon_hash: Option<&str>,
) -> Option<String> {
    icon_hash.map(|hash| custom_asset_url(cdn_base, "app-icons", application_id, hash))
}
