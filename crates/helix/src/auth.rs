//! Admin authentication middleware

use axum::{
	extract::{Request, State},
	http::header,
	middleware::Next,
	response::Response,
};

use subtle::ConstantTimeEq;

use crate::app::App;
use crate::prelude::*;

fn bearer_token(req: &Request) -> Option<&str> {
	req.headers()
		.get(header::AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.map(str::trim)
}

/// Constant-time comparison, only the length may leak
fn token_matches(expected: &str, provided: &str) -> bool {
	expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Only lets requests through that carry the configured admin token
pub async fn require_admin(
	State(app): State<App>,
	req: Request,
	next: Next,
) -> Result<Response, Error> {
	match bearer_token(&req) {
		Some(token) if token_matches(&app.admin_token, token) => Ok(next.run(req).await),
		Some(_) => {
			warn!("Rejected request to {} with invalid admin token", req.uri().path());
			Err(Error::PermissionDenied)
		}
		None => {
			debug!("Rejected unauthenticated request to {}", req.uri().path());
			Err(Error::PermissionDenied)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_token_matches() {
		assert!(token_matches("s3cret-token", "s3cret-token"));
		assert!(!token_matches("s3cret-token", "s3cret-tokem"));
		assert!(!token_matches("s3cret-token", "s3cret"));
		assert!(!token_matches("s3cret-token", ""));
	}
}

// vim: ts=4
