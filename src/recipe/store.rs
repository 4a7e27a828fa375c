//! Loading, merging, and persisting recipe documents.
//!
//! A recording never patches the file in place: the whole document is read,
//! mutated in memory, and rewritten.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::recipe::model::{TestCase, TestRecipe};

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("{0} is already a test case! Choose a new name!")]
    DuplicateTestName(String),
    #[error("failed to parse recipe: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Read-modify-write access to one recipe file.
pub struct RecipeStore {
    path: PathBuf,
}

impl RecipeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the recipe file, preserving test-case order.
    ///
    /// A missing file is not an error: recording into a fresh directory
    /// starts from an empty recipe with no default executable.
    pub fn load(&self) -> Result<TestRecipe, RecipeError> {
        if !self.path.exists() {
            return Ok(TestRecipe::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        let mut recipe: TestRecipe = serde_yaml::from_str(&text)?;

        // Older recordings stored stdin as newline-joined text; unify to
        // the line-list form so every persisted document looks the same.
        for (_, case) in recipe.test_cases.iter_mut() {
            if let Some(stdin) = case.stdin.take() {
                case.stdin = Some(stdin.into_normalized());
            }
        }
        Ok(recipe)
    }

    /// Merge `case` into `recipe` under `name`.
    ///
    /// The first merge into an empty recipe fixes the default executable;
    /// later cases recorded with a different program carry it as a
    /// per-case override. On a duplicate name the recipe is untouched.
    pub fn merge(
        recipe: &mut TestRecipe,
        name: &str,
        mut case: TestCase,
        command_executable: &str,
    ) -> Result<(), RecipeError> {
        if recipe.test_cases.contains(name) {
            return Err(RecipeError::DuplicateTestName(name.to_string()));
        }

        match recipe.executable.as_deref() {
            None => recipe.executable = Some(command_executable.to_string()),
            Some(default) if default != command_executable => {
                case.executable = Some(command_executable.to_string());
            }
            Some(_) => {}
        }

        recipe.test_cases.insert(name.to_string(), case);
        Ok(())
    }

    /// Serialize the full document back to the file, overwriting it.
    pub fn persist(&self, recipe: &TestRecipe) -> Result<(), RecipeError> {
        let text = serde_yaml::to_string(recipe)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}
