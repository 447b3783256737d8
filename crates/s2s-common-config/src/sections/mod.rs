// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod directory;
mod linking;
mod logging;

pub use directory::{DirectoryConfig, DirectoryConfigLayer};
pub use linking::{LinkingConfig, LinkingConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
