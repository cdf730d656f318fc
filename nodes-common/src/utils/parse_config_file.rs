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

use std::fmt::Debug;
use std::path::Path;

use config::Config;
use nodes_error::NodesError;
use nodes_error::NodesResult;
use serde::de::DeserializeOwned;
use tracing::info;

/// Loads a configuration file into `C`. The format is taken from the file extension
/// (`toml`, `json`, `yaml`, ...), as understood by the `config` crate.
pub fn parse_config_file<C>(config_file: impl AsRef<Path>) -> NodesResult<C>
where
    C: Debug + DeserializeOwned,
{
    let config_file = config_file.as_ref();
    if !config_file.is_file() {
        return Err(NodesError::illegal_argument(format!(
            "Config file does not exist or is not a file: {}",
            config_file.display()
        )));
    }
    info!("Loading config from file: {:?}", config_file);
    let cfg = Config::builder()
        .add_source(config::File::from(config_file))
        .build()?;
    let config = cfg.try_deserialize::<C>()?;
    Ok(config)
}
