//! Environment variable lookup with prefix support

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable reader. Every key is looked up as `{prefix}{key}`.
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Optional prefix for environment variables (e.g., "FOLIO_")
	pub prefix: Option<String>,
}

impl Env {
	/// Create a reader without a prefix
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a prefix for all lookups
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	/// Read a string if the variable is set
	pub fn opt_str(&self, key: &str) -> Result<Option<String>, EnvError> {
		let full_key = self.key_name(key);
		validate_env_var_name(&full_key)?;
		match env::var(&full_key) {
			Ok(val) => Ok(Some(val)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(env::VarError::NotUnicode(_)) => Err(EnvError::ParseError {
				key: full_key,
				value_len: 0,
				error: "value is not valid unicode".to_string(),
			}),
		}
	}

	/// Read a string, falling back to `default`
	pub fn str_with_default(&self, key: &str, default: &str) -> Result<String, EnvError> {
		Ok(self.opt_str(key)?.unwrap_or_else(|| default.to_string()))
	}

	/// Read and parse a value if the variable is set
	pub fn opt_parse<T>(&self, key: &str) -> Result<Option<T>, EnvError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		match self.opt_str(key)? {
			Some(val) => val.trim().parse::<T>().map(Some).map_err(|e| EnvError::ParseError {
				key: self.key_name(key),
				value_len: val.len(),
				error: e.to_string(),
			}),
			None => Ok(None),
		}
	}

	/// Read a boolean if the variable is set
	pub fn opt_bool(&self, key: &str) -> Result<Option<bool>, EnvError> {
		match self.opt_str(key)? {
			Some(val) => parse_bool(&val).map(Some).map_err(|error| EnvError::ParseError {
				key: self.key_name(key),
				value_len: val.len(),
				error,
			}),
			None => Ok(None),
		}
	}
}

/// Parse `true/false`, `yes/no`, `on/off` and `1/0`
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" | "" => Ok(false),
		other => Err(format!("'{}' is not a boolean", other)),
	}
}

fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	if name.is_empty() {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}
	if name.contains('=') || name.contains('\0') {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '=' or NUL".to_string(),
		});
	}
	Ok(())
}

/// Environment lookup errors
#[derive(Debug, Error)]
pub enum EnvError {
	/// The value could not be parsed
	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		/// Full variable name
		key: String,
		/// Length of the original value, kept instead of the value itself
		value_len: usize,
		/// Parser message
		error: String,
	},

	/// The variable name itself is unusable
	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName {
		/// Offending name
		name: String,
		/// Why it was rejected
		reason: String,
	},
}
