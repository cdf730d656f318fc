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

use cheetah_string::CheetahString;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Immutable snapshot of the resource attributes a filter can inspect.
///
/// The caller derives it from its own resource tree representation; `is_folder` in
/// particular is computed by the caller from its structural rules.
///
/// # Example
///
/// ```
/// use nodes_filter::ResourceMetadata;
///
/// let metadata = ResourceMetadata::new("/content/site/en")
///     .with_primary_type("cq:Page")
///     .with_mixin_type("mix:versionable");
///
/// assert_eq!(metadata.name(), "en");
/// assert!(metadata.has_mixin_type("mix:versionable"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    path: CheetahString,
    name: CheetahString,
    #[serde(default)]
    primary_type: CheetahString,
    #[serde(default, deserialize_with = "deserialize_mixin_types")]
    mixin_types: Vec<CheetahString>,
    #[serde(default)]
    resource_type: Option<CheetahString>,
    #[serde(default)]
    mime_type: Option<CheetahString>,
    #[serde(default)]
    is_folder: bool,
}

impl ResourceMetadata {
    /// Creates metadata for `path`, naming it after the last path segment.
    ///
    /// The root path `/` has an empty name.
    pub fn new(path: impl Into<CheetahString>) -> Self {
        let path = path.into();
        let name = match path.as_str().rfind('/') {
            Some(index) => CheetahString::from_slice(&path.as_str()[index + 1..]),
            None => path.clone(),
        };
        ResourceMetadata {
            path,
            name,
            ..ResourceMetadata::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<CheetahString>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_primary_type(mut self, primary_type: impl Into<CheetahString>) -> Self {
        self.primary_type = primary_type.into();
        self
    }

    /// Adds a mixin type; the mixin types form a set, duplicates are ignored.
    pub fn with_mixin_type(mut self, mixin_type: impl Into<CheetahString>) -> Self {
        let mixin_type = mixin_type.into();
        if !self.mixin_types.contains(&mixin_type) {
            self.mixin_types.push(mixin_type);
        }
        self
    }

    pub fn with_mixin_types<I, S>(self, mixin_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CheetahString>,
    {
        mixin_types.into_iter().fold(self, |metadata, m| metadata.with_mixin_type(m))
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<CheetahString>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<CheetahString>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_folder(mut self, is_folder: bool) -> Self {
        self.is_folder = is_folder;
        self
    }

    #[inline]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn primary_type(&self) -> &str {
        self.primary_type.as_str()
    }

    #[inline]
    pub fn mixin_types(&self) -> impl Iterator<Item = &str> {
        self.mixin_types.iter().map(CheetahString::as_str)
    }

    pub fn has_mixin_type(&self, mixin_type: &str) -> bool {
        self.mixin_types().any(|m| m == mixin_type)
    }

    #[inline]
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_ref().map(CheetahString::as_str)
    }

    #[inline]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_ref().map(CheetahString::as_str)
    }

    #[inline]
    pub fn is_folder(&self) -> bool {
        self.is_folder
    }
}

/// Mixin types form a set; repeated entries of a snapshot keep their first position.
fn deserialize_mixin_types<'de, D>(deserializer: D) -> Result<Vec<CheetahString>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut mixin_types = Vec::<CheetahString>::deserialize(deserializer)?;
    let mut index = 0;
    while index < mixin_types.len() {
        if mixin_types[..index].contains(&mixin_types[index]) {
            mixin_types.remove(index);
        } else {
            index += 1;
        }
    }
    Ok(mixin_types)
}
