use clap::Args;
use std::path::PathBuf;

use tagfix::config::{ConfigOverrides, RewriteConfig};
use tagfix::local_files;
use tagfix::rewrite::{self, FileOutcome, RewriteSummary};

use crate::commands::CmdResult;
use crate::output;

#[derive(Args, Debug, Default)]
pub struct FixArgs {
    /// Element to normalize (default: FooterCached)
    #[arg(long, value_name = "NAME")]
    pub element: Option<String>,

    /// Directory the pattern is resolved against (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Recursive glob of files to rewrite (default: app/**/*.tsx)
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// JSON config file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the rewrite. With `progress`, prints one line per changed file as it
/// is handled.
pub fn run(args: FixArgs, progress: bool) -> CmdResult<RewriteSummary> {
    let config = RewriteConfig::resolve(
        args.config.as_deref(),
        ConfigOverrides {
            element: args.element,
            root: args.root,
            pattern: args.pattern,
            dry_run: args.dry_run,
        },
    )?;

    let summary = rewrite::run(&config, &local_files::local(), |outcome| {
        if progress {
            let _ = output::print_text(&progress_line(outcome, config.dry_run));
        }
    })?;

    Ok((summary, 0))
}

pub fn progress_line(outcome: &FileOutcome, dry_run: bool) -> String {
    if dry_run {
        format!("🔎 Would fix: {}", outcome.file)
    } else {
        format!("✅ Fixed: {}", outcome.file)
    }
}

pub fn summary_line(summary: &RewriteSummary) -> String {
    if summary.dry_run {
        format!("🔎 Would fix {} files", summary.files_changed)
    } else {
        format!("🎉 Fixed {} files", summary.files_changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn outcome(file: &str) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from(file),
            file: file.to_string(),
            changed: true,
            replacements: 1,
        }
    }

    #[test]
    fn progress_line_marks_each_fixed_file() {
        assert_eq!(
            progress_line(&outcome("app/page.tsx"), false),
            "✅ Fixed: app/page.tsx"
        );
        assert_eq!(
            progress_line(&outcome("app/page.tsx"), true),
            "🔎 Would fix: app/page.tsx"
        );
    }

    #[test]
    fn run_applies_flags_over_defaults() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let page = dir.path().join("src/page.jsx");
        fs::write(&page, "<Widget a=\"1\" />\n<FooterCached b=\"2\" />\n").unwrap();

        let args = FixArgs {
            element: Some("Widget".to_string()),
            root: Some(dir.path().to_string_lossy().to_string()),
            pattern: Some("src/**/*.jsx".to_string()),
            ..Default::default()
        };
        let (summary, exit_code) = run(args, false).unwrap();

        assert_eq!(exit_code, 0);
        assert_eq!(summary_line(&summary), "🎉 Fixed 1 files");
        assert_eq!(
            fs::read_to_string(page).unwrap(),
            "<Widget />\n<FooterCached b=\"2\" />\n"
        );
    }

    #[test]
    fn run_rejects_invalid_element_before_touching_files() {
        let dir = TempDir::new().unwrap();
        let args = FixArgs {
            element: Some("Foo Bar".to_string()),
            root: Some(dir.path().to_string_lossy().to_string()),
            ..Default::default()
        };

        let err = run(args, false).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
