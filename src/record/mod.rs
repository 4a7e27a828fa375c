//! The recording engine: run a command once under instrumentation and fold
//! the captured outcome into the recipe document.

pub mod error;
pub mod interceptor;
pub mod snapshot;
pub mod supervisor;

pub use error::RecordError;
pub use interceptor::InputInterceptor;
pub use supervisor::{CommandLine, ProcessCapture};

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncBufRead;

use crate::recipe::{Ofstream, RecipeStore, StdinCapture, TestCase, BASE_FILE_PREFIX};

/// Record one run of `command` as test case `test_name` in the recipe at
/// `recipe_path`.
///
/// The sequence: snapshot `workdir`, run the command with its input
/// intercepted, snapshot again, move every newly produced file to its
/// `contest_`-prefixed base file, then merge the captured case into the
/// recipe and rewrite it wholesale.
///
/// A duplicate test name is only detected at merge time, after the run;
/// by then the file moves have already happened and they are not rolled
/// back.
pub async fn record_test<R>(
    recipe_path: &Path,
    test_name: &str,
    command: CommandLine,
    workdir: &Path,
    input: R,
) -> Result<(), RecordError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tracing::debug!(test = %test_name, program = %command.program, "starting recorded run");

    let mut interceptor = InputInterceptor::spawn(input);
    let before = snapshot::snapshot(workdir)?;

    let capture = supervisor::run(&command, workdir, &mut interceptor).await?;
    let lines = interceptor.finish().await;

    tracing::debug!(exit_code = capture.exit_code, "run complete, updating recipe");

    let after = snapshot::snapshot(workdir)?;
    let new_files: Vec<PathBuf> = after.difference(&before).cloned().collect();
    let ofstreams = relocate_new_files(workdir, &new_files)?;

    let case = TestCase {
        executable: None,
        return_code: capture.exit_code,
        argv: command.args.clone(),
        stdin: (!lines.is_empty()).then_some(StdinCapture::Lines(lines)),
        stdout: (!capture.stdout.is_empty()).then_some(capture.stdout),
        stderr: (!capture.stderr.is_empty()).then_some(capture.stderr),
        ofstreams,
    };

    let store = RecipeStore::new(recipe_path);
    let mut recipe = store.load()?;
    RecipeStore::merge(&mut recipe, test_name, case, &command.program)?;
    store.persist(&recipe)?;

    Ok(())
}

/// Move each newly produced file aside to its namespaced base file and
/// return the entries describing the moves.
fn relocate_new_files(
    workdir: &Path,
    new_files: &[PathBuf],
) -> Result<Vec<Ofstream>, RecordError> {
    let mut ofstreams = Vec::with_capacity(new_files.len());
    for test_file in new_files {
        let file_name = test_file.file_name().ok_or_else(|| {
            io::Error::other(format!(
                "produced path has no file name: {}",
                test_file.display()
            ))
        })?;

        let mut base_name = std::ffi::OsString::from(BASE_FILE_PREFIX);
        base_name.push(file_name);
        let base_file = test_file.with_file_name(base_name);

        std::fs::rename(workdir.join(test_file), workdir.join(&base_file))?;
        tracing::debug!(
            from = %test_file.display(),
            to = %base_file.display(),
            "relocated produced file"
        );

        ofstreams.push(Ofstream {
            base_file: base_file.to_string_lossy().into_owned(),
            test_file: test_file.to_string_lossy().into_owned(),
        });
    }
    Ok(ofstreams)
}
