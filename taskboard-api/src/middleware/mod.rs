/// Middleware for the API server
///
/// - `error_boundary`: turns unhandled faults and panics into the JSON 500
///   response
///
/// Request logging and CORS come from `tower-http` and are wired in
/// `app::build_router`.

pub mod error_boundary;
