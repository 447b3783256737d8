// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Build a `ListUsers` filter matching the `email` attribute exactly.
///
/// Values are double-quoted; embedded `\` and `"` are backslash-escaped so a
/// crafted email cannot widen the filter.
pub fn email_filter(email: &str) -> String {
	let mut escaped = String::with_capacity(email.len());
	for c in email.chars() {
		if c == '"' || c == '\\' {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	format!("email = \"{escaped}\"")
}
