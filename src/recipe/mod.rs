pub mod model;
pub mod store;

pub use model::{Ofstream, StdinCapture, TestCase, TestCaseMap, TestRecipe, BASE_FILE_PREFIX};
pub use store::{RecipeError, RecipeStore};
