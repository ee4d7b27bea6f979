//! Staging, source collection, and archive assembly for lambda-packager.
//!
//! # Packaging pipeline
//!
//! ```text
//! lambda-packager package
//!   0. Compile   ── src_patterns checked before anything is installed
//!   1. Select    ── requirements.txt > poetry export > none
//!   2. Install   ── python -m pip install -r … --target <staging> [--no-deps]
//!   3. Collect   ── src_patterns expanded recursively under the project
//!   4. Copy      ── matches merged into <staging>, hidden paths filtered
//!   5. Archive   ── <staging> → dist/lambda.zip
//! ```
//!
//! # Hidden paths
//!
//! With `ignore_hidden_files` (the default), any path with a `.`-prefixed
//! component relative to the project root is left out, whether it was
//! matched directly or found inside a matched directory.
//!
//! # Reproducibility
//!
//! Archives are written in sorted order with fixed timestamps, so two runs
//! over an unchanged project produce identical bytes.

pub mod archive;
pub mod collect;
pub mod copy;
pub mod pipeline;
pub mod staging;

pub use archive::{ArchiveError, ArchiveSummary, create_archive};
pub use collect::{
    CollectError, SourcePattern, collect_compiled, collect_matches, compile_pattern,
    compile_patterns,
};
pub use copy::{CopyError, CopyReport, copy_matches, is_hidden};
pub use pipeline::{PackageError, PackageOutcome, Packager};
pub use staging::{StagingDirectory, StagingError};
