use crate::executor::{CommandExecutor, RealExecutor};
use crate::process::{CommandSpec, args};

/// Toolchain diagnostics, parameterized over the executor for testability.
pub struct Doctor<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl Doctor<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for Doctor<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> Doctor<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Run all diagnostic checks without early return.
    ///
    /// `poetry_required` marks the Poetry check as fatal; otherwise a missing
    /// Poetry is reported but does not fail the report.
    pub fn check(&self, python: &str, poetry: &str, poetry_required: bool) -> DoctorReport {
        let mut report = DoctorReport {
            poetry_required,
            ..DoctorReport::default()
        };

        // 1. Python interpreter
        match self
            .executor
            .exec(&CommandSpec::new(python, args(["--version"])))
        {
            Ok(v) => report.python = CheckResult::ok(first_line(&v).unwrap_or(python)),
            Err(e) => report.python = CheckResult::fail(&e.to_string()),
        }

        // 2. pip module
        match self
            .executor
            .exec(&CommandSpec::new(python, args(["-m", "pip", "--version"])))
        {
            Ok(v) => {
                // "pip 24.0 from /usr/lib/python3/dist-packages/pip (python 3.12)"
                let version = first_line(&v)
                    .and_then(|line| line.split(" from ").next())
                    .unwrap_or("available");
                report.pip = CheckResult::ok(version);
            }
            Err(e) => report.pip = CheckResult::fail(&e.to_string()),
        }

        // 3. Poetry
        match self
            .executor
            .exec(&CommandSpec::new(poetry, args(["--version"])))
        {
            Ok(v) => report.poetry = CheckResult::ok(first_line(&v).unwrap_or(poetry)),
            Err(e) => report.poetry = CheckResult::fail(&e.to_string()),
        }

        report
    }
}

fn first_line(output: &str) -> Option<&str> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub python: CheckResult,
    pub pip: CheckResult,
    pub poetry: CheckResult,
    pub poetry_required: bool,
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.python.passed
            && self.pip.passed
            && self.config_file.passed
            && (self.poetry.passed || !self.poetry_required)
    }
}

impl std::fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let poetry_label = if self.poetry_required {
            "Poetry"
        } else {
            "Poetry (optional)"
        };
        let rows = [
            ("Python", &self.python),
            ("pip", &self.pip),
            (poetry_label, &self.poetry),
            ("Config", &self.config_file),
        ];
        for (label, result) in rows {
            writeln!(f, "  [{}] {label:<18} {}", result.icon(), result.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}
