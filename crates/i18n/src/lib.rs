//! Message translation for user-facing plugin text.
//!
//! Catalogs are flat JSON objects mapping a message key to its localized
//! template. Templates use positional `{0}`, `{1}` placeholders. Unknown keys
//! fall back to the key itself, with placeholders still substituted, so
//! untranslated strings remain readable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum I18nError {
	/// The catalog file could not be read.
	#[error("failed to read catalog {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	/// The catalog is not a flat JSON object of strings.
	#[error("invalid catalog: {0}")]
	Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, I18nError>;

/// Maps a message key plus positional arguments to a display string.
pub trait Translate: Send + Sync {
	fn translate(&self, key: &str, args: &[&str]) -> String;
}

/// Locale message catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
	locale: Option<String>,
	entries: HashMap<String, String>,
}

impl Catalog {
	/// Catalog with no entries; every key translates to itself.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Parses a catalog from a JSON object.
	pub fn from_json_str(json: &str) -> Result<Self> {
		let entries: HashMap<String, String> = serde_json::from_str(json)?;
		Ok(Self { locale: None, entries })
	}

	/// Reads a catalog file.
	pub fn load(path: &Path) -> Result<Self> {
		let json = std::fs::read_to_string(path).map_err(|source| I18nError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json_str(&json)
	}

	/// Loads `<dir>/<locale>.json`.
	///
	/// A missing or unreadable locale file yields an empty catalog so the
	/// plugin keeps working in the source language.
	pub fn load_locale(dir: &Path, locale: &str) -> Self {
		let path = dir.join(format!("{locale}.json"));
		match Self::load(&path) {
			Ok(mut catalog) => {
				catalog.locale = Some(locale.to_string());
				tracing::debug!(locale, entries = catalog.len(), "i18n.catalog_loaded");
				catalog
			}
			Err(err) => {
				tracing::warn!(locale, error = %err, "i18n catalog unavailable, falling back to message keys");
				Self::empty()
			}
		}
	}

	/// Locale this catalog was loaded for, if any.
	pub fn locale(&self) -> Option<&str> {
		self.locale.as_deref()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Adds or replaces one entry.
	pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
		self.entries.insert(key.into(), template.into());
	}
}

impl Translate for Catalog {
	fn translate(&self, key: &str, args: &[&str]) -> String {
		let template = self.entries.get(key).map_or(key, String::as_str);
		format_positional(template, args)
	}
}

/// Replaces `{N}` placeholders with `args[N]`.
///
/// Placeholders without a matching argument, and braces that do not enclose a
/// plain index, are kept verbatim.
pub fn format_positional(template: &str, args: &[&str]) -> String {
	if args.is_empty() || !template.contains('{') {
		return template.to_string();
	}

	let mut out = String::with_capacity(template.len());
	let mut rest = template;
	while let Some(open) = rest.find('{') {
		out.push_str(&rest[..open]);
		let after = &rest[open + 1..];
		let substituted = after.find('}').and_then(|close| {
			let index: usize = after[..close].parse().ok()?;
			let value = args.get(index)?;
			Some((value, close))
		});
		match substituted {
			Some((value, close)) => {
				out.push_str(value);
				rest = &after[close + 1..];
			}
			None => {
				out.push('{');
				rest = after;
			}
		}
	}
	out.push_str(rest);
	out
}
