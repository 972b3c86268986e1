use std::borrow::Cow;

/// Rewrites `\r\n`, bare `\r` and the literal two-character `\n` escape to a
/// single `\n`.
///
/// Idempotent: the output contains no `\r` and no backslash followed by `n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
	if !text.contains('\r') && !text.contains("\\n") {
		return Cow::Borrowed(text);
	}
	Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n").replace("\\n", "\n"))
}

/// Strips leading and trailing newlines and literal `\n` escapes from a
/// panel title.
pub fn trim_newline_escapes(text: &str) -> &str {
	let mut out = text;
	loop {
		let trimmed = out.trim_matches('\n');
		let trimmed = trimmed.strip_prefix("\\n").unwrap_or(trimmed);
		let trimmed = trimmed.strip_suffix("\\n").unwrap_or(trimmed);
		if trimmed.len() == out.len() {
			return trimmed;
		}
		out = trimmed;
	}
}
