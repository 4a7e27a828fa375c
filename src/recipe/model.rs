//! The recipe document: a default executable plus an ordered collection of
//! recorded test cases.
//!
//! The document is human-edited YAML, so everything here round-trips with
//! key order intact.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Filename prefix applied to a produced file when it is moved aside.
pub const BASE_FILE_PREFIX: &str = "contest_";

/// Top-level recipe document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRecipe {
    /// Default program under test; unset only before the first merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
    #[serde(rename = "test-cases", default)]
    pub test_cases: TestCaseMap,
}

/// One recorded scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestCase {
    /// Present only when the case was recorded with a program other than
    /// the recipe default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
    pub return_code: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub argv: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<StdinCapture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ofstreams: Vec<Ofstream>,
}

/// A file the program produced during the recorded run.
///
/// `test_file` is the path the program wrote, relative to the working
/// directory; `base_file` is the namespaced path the file was moved to so
/// the original path stays free for future runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Ofstream {
    pub base_file: String,
    pub test_file: String,
}

/// Captured interactive input.
///
/// Recordings persist the line-list form; the newline-joined text form is
/// still accepted when loading recipes written by older versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StdinCapture {
    Lines(Vec<String>),
    Text(String),
}

impl StdinCapture {
    /// The ordered line sequence, whichever form is held.
    pub fn lines(&self) -> Vec<String> {
        match self {
            StdinCapture::Lines(lines) => lines.clone(),
            StdinCapture::Text(text) => text.split('\n').map(str::to_string).collect(),
        }
    }

    /// The line-list form this version persists.
    pub fn into_normalized(self) -> Self {
        match self {
            StdinCapture::Lines(lines) => StdinCapture::Lines(lines),
            text @ StdinCapture::Text(_) => StdinCapture::Lines(text.lines()),
        }
    }
}

/// Ordered name → test-case mapping.
///
/// Insertion order is part of the contract: it is exactly the order cases
/// are serialized in and the order they come back in after a reload, which
/// a general-purpose map does not promise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCaseMap {
    entries: Vec<(String, TestCase)>,
}

impl TestCaseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| entry == name)
    }

    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, case)| case)
    }

    /// Append `case` under `name`, after every existing entry.
    ///
    /// Returns `false` and leaves the map unchanged if the name is taken;
    /// rejecting duplicates with an error is the merge layer's job.
    pub fn insert(&mut self, name: String, case: TestCase) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, case));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestCase)> {
        self.entries
            .iter()
            .map(|(name, case)| (name.as_str(), case))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut TestCase)> {
        self.entries
            .iter_mut()
            .map(|(name, case)| (name.as_str(), case))
    }
}

impl Serialize for TestCaseMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, case) in &self.entries {
            map.serialize_entry(name, case)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TestCaseMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapOrderVisitor;

        impl<'de> Visitor<'de> for MapOrderVisitor {
            type Value = TestCaseMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of test-case names to test cases")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, TestCase>()? {
                    entries.push(entry);
                }
                Ok(TestCaseMap { entries })
            }
        }

        deserializer.deserialize_map(MapOrderVisitor)
    }
}
