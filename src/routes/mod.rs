/// Router Module Index
///
/// Splits the console's routes by how the route guard treats them. The guard
/// itself classifies paths from static rules; these modules only keep the
/// route tables readable.

/// Routes that are never redirected: health check and API docs.
pub mod public;

/// Login and signup pages plus the session actions that create and end a
/// session.
pub mod auth;

/// Pages that need a session token, and the data actions they trigger.
pub mod protected;
