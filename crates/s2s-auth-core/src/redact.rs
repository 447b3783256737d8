// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Mask the local part of an email for log output: `test@test.com` becomes
/// `t***@test.com`.
pub fn redact_email(email: &str) -> String {
	match email.split_once('@') {
		Some((local, domain)) => match local.chars().next() {
			Some(first) => format!("{first}***@{domain}"),
			None => format!("***@{domain}"),
		},
		None => "***".to_string(),
	}
}
