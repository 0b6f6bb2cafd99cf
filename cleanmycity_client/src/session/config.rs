/// Storage key holding the raw bearer token.
pub const SESSION_TOKEN_KEY: &str = "cmc_token";

/// Storage key holding the serialized user profile.
pub const SESSION_USER_KEY: &str = "cmc_user";

/// Buffered capacity of the session event channel. Subscribers that fall
/// further behind than this observe a lag error rather than blocking senders.
pub(super) const EVENT_CHANNEL_CAPACITY: usize = 16;
