// Copyright 2023 The Nodes Filter Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::str::FromStr;

use nodes_error::NodesError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log directives, e.g. `nodes_filter=debug`.
pub const LOG_ENV: &str = "RUST_LOG";

/// Initializes the logger from the `RUST_LOG` environment variable.
///
/// Falls back to `INFO` when the variable is unset or holds an invalid directive.
/// The output includes thread names, levels, line numbers and thread ids. Calling it
/// again after a subscriber has been installed is a no-op.
pub fn init_logger() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()));
    install(filter);
}

pub fn init_logger_with_level(level: Level) {
    install(EnvFilter::new(level.as_str()));
}

fn install(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_thread_names(true)
        .with_level(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_env_filter(filter)
        .try_init();
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Level(&'static str);

impl Level {
    /// Constant representing the ERROR log level.
    pub const ERROR: Level = Level("ERROR");

    /// Constant representing the WARN log level.
    pub const WARN: Level = Level("WARN");

    /// Constant representing the INFO log level.
    pub const INFO: Level = Level("INFO");

    /// Constant representing the DEBUG log level.
    pub const DEBUG: Level = Level("DEBUG");

    /// Constant representing the TRACE log level.
    pub const TRACE: Level = Level("TRACE");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl FromStr for Level {
    type Err = NodesError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::ERROR),
            "WARN" => Ok(Level::WARN),
            "INFO" => Ok(Level::INFO),
            "DEBUG" => Ok(Level::DEBUG),
            "TRACE" => Ok(Level::TRACE),
            _ => Err(NodesError::illegal_argument(format!("Invalid log level: {level}"))),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.0)
    }
}
