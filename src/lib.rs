pub mod recipe;
pub mod record;

pub use recipe::{
    Ofstream, RecipeError, RecipeStore, StdinCapture, TestCase, TestCaseMap, TestRecipe,
    BASE_FILE_PREFIX,
};
pub use record::{record_test, CommandLine, InputInterceptor, ProcessCapture, RecordError};
