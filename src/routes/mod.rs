/// Router Module Index
///
/// Splits the routing surface by access level so the authentication layer is
/// applied explicitly at the module boundary and a protected endpoint cannot
/// be exposed by accident.

/// Routes accessible without a token (anonymous, read-only).
pub mod public;

/// Routes gated by the bearer-token layer. Each handler additionally checks
/// its own permission string, so authentication and authorization stay
/// separate failures (401 vs 403).
pub mod authenticated;
