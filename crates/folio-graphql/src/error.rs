//! Mapping of content errors onto GraphQL errors

use async_graphql::{Error, ErrorExtensions, Result as GqlResult};
use folio_core::error::CmsError;

/// GraphQL error carrying the content error message and `extensions.code`
pub fn to_gql(err: CmsError) -> Error {
	let code = err.code();
	tracing::debug!(code, error = %err, "resolver error");
	Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

/// Convert a content result into a resolver result
pub trait IntoGql<T> {
	/// Map the error side through [`to_gql`]
	fn into_gql(self) -> GqlResult<T>;
}

impl<T> IntoGql<T> for Result<T, CmsError> {
	fn into_gql(self) -> GqlResult<T> {
		self.map_err(to_gql)
	}
}
