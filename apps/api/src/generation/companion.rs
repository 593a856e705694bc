//! Companion documents — certificates and pre/post tests.
//!
//! These are produced by external PDF generators. `DocumentGenerators` is the
//! seam: production uses `ScriptGenerators`, which runs the generator scripts as
//! child processes; tests swap in an in-process stub through `AppState`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::generation::workspace::{collect_files, GeneratedFile};
use crate::models::{AgencyProfile, StaffIdentity};
use crate::schedule::dates::format_us;
use crate::schedule::manifest::read_manifest;
use crate::schedule::TrainingEvent;

/// Env var the certificate script reads its background template from.
pub const CERTIFICATE_TEMPLATE_ENV: &str = "TEMPLATE_PDF";
/// Env var the test script reads its form template from.
pub const TEST_TEMPLATE_ENV: &str = "TEMPLATE_PDF_TEST";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to start {generator} generator: {source}")]
    Spawn {
        generator: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{generator} generator exited with status {status}: {stderr}")]
    Failed {
        generator: &'static str,
        status: i32,
        stderr: String,
    },

    #[error("{generator} generator timed out after {secs}s")]
    TimedOut { generator: &'static str, secs: u64 },

    #[error("failed to collect {generator} generator output: {source}")]
    Output {
        generator: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a generator needs for one staff member.
pub struct RenderContext<'a> {
    pub staff: &'a StaffIdentity,
    pub profile: &'static AgencyProfile,
    pub events: &'a [TrainingEvent],
    /// Schedule manifest written before any generator runs.
    pub manifest_path: &'a Path,
    /// Request-scoped scratch directory. Removed when the request ends.
    pub scratch: &'a Path,
}

#[async_trait]
pub trait DocumentGenerators: Send + Sync {
    /// One certificate per schedule event, dated with the event's certificate date.
    async fn render_certificates(
        &self,
        ctx: &RenderContext<'_>,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;

    /// Pre-test dated on the first training date, post-test on its certificate date.
    async fn render_tests(
        &self,
        ctx: &RenderContext<'_>,
        first: &TrainingEvent,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Script-backed generators
// ────────────────────────────────────────────────────────────────────────────

/// Runs the certificate and test generator scripts as child processes.
///
/// Arguments are passed directly (no shell). Each run gets its own output
/// directory inside the request scratch dir and is killed if it outlives the
/// timeout.
#[derive(Debug, Clone)]
pub struct ScriptGenerators {
    pub interpreter: String,
    pub certificate_script: PathBuf,
    pub test_script: PathBuf,
    pub template_dir: PathBuf,
    pub timeout: Duration,
}

impl ScriptGenerators {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interpreter: config.python_bin.clone(),
            certificate_script: config.certificate_script.clone(),
            test_script: config.test_script.clone(),
            template_dir: config.template_dir.clone(),
            timeout: config.generator_timeout,
        }
    }

    async fn run(
        &self,
        generator: &'static str,
        script: &Path,
        args: &[&str],
        template: (&str, PathBuf),
        out_dir: &Path,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| GeneratorError::Output { generator, source })?;

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(script)
            .args(args)
            .arg(out_dir)
            .env(template.0, &template.1)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            generator,
            script = %script.display(),
            template = %template.1.display(),
            "Running generator"
        );

        let started = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|source| GeneratorError::Spawn { generator, source })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| GeneratorError::Output { generator, source })?,
            Err(_) => {
                return Err(GeneratorError::TimedOut {
                    generator,
                    secs: self.timeout.as_secs(),
                })
            }
        };

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(generator, "{line}");
        }

        if !output.status.success() {
            return Err(GeneratorError::Failed {
                generator,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let files = collect_files(out_dir)
            .await
            .map_err(|source| GeneratorError::Output { generator, source })?;

        info!(
            generator,
            files = files.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generator finished"
        );
        Ok(files)
    }
}

#[async_trait]
impl DocumentGenerators for ScriptGenerators {
    async fn render_certificates(
        &self,
        ctx: &RenderContext<'_>,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        debug!(
            "Rendering {} certificates for {}",
            ctx.events.len(),
            ctx.staff.safe_name
        );
        let manifest = ctx.manifest_path.to_string_lossy();
        let files = self
            .run(
                "certificate",
                &self.certificate_script,
                &[ctx.staff.display_name.as_str(), &*manifest],
                (
                    CERTIFICATE_TEMPLATE_ENV,
                    self.template_dir.join(ctx.profile.certificate_template),
                ),
                &ctx.scratch.join("certificates"),
            )
            .await?;

        // The script owns file naming; a count mismatch is logged only.
        match read_manifest(ctx.manifest_path).await {
            Ok(rows) if rows.len() != files.len() => warn!(
                "Certificate generator produced {} files for {} schedule rows",
                files.len(),
                rows.len()
            ),
            Ok(_) => {}
            Err(e) => warn!("Could not re-read schedule manifest: {e:#}"),
        }

        Ok(files)
    }

    async fn render_tests(
        &self,
        ctx: &RenderContext<'_>,
        first: &TrainingEvent,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let pre_date = format_us(first.training_date);
        let post_date = format_us(first.certificate_date);
        self.run(
            "test",
            &self.test_script,
            &[
                ctx.staff.display_name.as_str(),
                pre_date.as_str(),
                post_date.as_str(),
            ],
            (
                TEST_TEMPLATE_ENV,
                self.template_dir.join(ctx.profile.test_template),
            ),
            &ctx.scratch.join("tests"),
        )
        .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Agency;
    use crate::schedule::build_schedule;
    use crate::schedule::manifest::write_manifest;
    use chrono::NaiveDate;

    /// Shell stand-in for the certificate script: one file per manifest row.
    const FAKE_CERT_SCRIPT: &str = r#"
name="$1"; manifest="$2"; out="$3"
safe=$(printf '%s' "$name" | tr ' ' '_')
mkdir -p "$out"
grep -o '"certDate": "[^"]*"' "$manifest" | cut -d'"' -f4 | tr '/' '-' | while read -r d; do
  printf '%%PDF-1.4 %s %s' "$name" "$TEMPLATE_PDF" > "$out/${safe}_Certificate_${d}.pdf"
done
"#;

    /// Shell stand-in for the test script.
    const FAKE_TEST_SCRIPT: &str = r#"
safe=$(printf '%s' "$1" | tr ' ' '_')
pre=$(printf '%s' "$2" | tr '/' '-'); post=$(printf '%s' "$3" | tr '/' '-')
printf '%%PDF-1.4 pre' > "$4/${safe}_Pre_Test_${pre}.pdf"
printf '%%PDF-1.4 post' > "$4/${safe}_Post_Test_${post}.pdf"
"#;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generators(dir: &Path, cert: &str, test: &str, timeout: Duration) -> ScriptGenerators {
        let certificate_script = dir.join("certs.sh");
        let test_script = dir.join("tests.sh");
        std::fs::write(&certificate_script, cert).unwrap();
        std::fs::write(&test_script, test).unwrap();
        ScriptGenerators {
            interpreter: "sh".to_string(),
            certificate_script,
            test_script,
            template_dir: dir.join("templates"),
            timeout,
        }
    }

    #[tokio::test]
    async fn test_certificates_one_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let gens = generators(dir.path(), FAKE_CERT_SCRIPT, FAKE_TEST_SCRIPT, Duration::from_secs(10));
        let staff = StaffIdentity::new("Jane Doe");
        let events = build_schedule(ymd(2020, 3, 15), None, ymd(2023, 6, 1));
        let manifest = write_manifest(dir.path(), &staff, &events).await.unwrap();

        let ctx = RenderContext {
            staff: &staff,
            profile: Agency::Attentive.profile(),
            events: &events,
            manifest_path: &manifest,
            scratch: dir.path(),
        };
        let files = gens.render_certificates(&ctx).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Jane_Doe_Certificate_03-10-2021.pdf",
                "Jane_Doe_Certificate_03-10-2022.pdf",
                "Jane_Doe_Certificate_03-10-2023.pdf",
                "Jane_Doe_Certificate_03-17-2020.pdf",
            ]
        );
        // The agency template path reaches the child through the environment.
        let body = String::from_utf8(files[0].content.to_vec()).unwrap();
        assert!(body.contains("CERTIFICATE-_Attentive_JP.pdf"), "{body}");
    }

    #[tokio::test]
    async fn test_tests_use_first_event_dates() {
        let dir = tempfile::tempdir().unwrap();
        let gens = generators(dir.path(), FAKE_CERT_SCRIPT, FAKE_TEST_SCRIPT, Duration::from_secs(10));
        let staff = StaffIdentity::new("Jane Doe");
        let events = build_schedule(ymd(2021, 6, 15), None, ymd(2021, 7, 1));
        let manifest = write_manifest(dir.path(), &staff, &events).await.unwrap();

        let ctx = RenderContext {
            staff: &staff,
            profile: Agency::Abode.profile(),
            events: &events,
            manifest_path: &manifest,
            scratch: dir.path(),
        };
        let files = gens.render_tests(&ctx, &events[0]).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Jane_Doe_Post_Test_06-17-2021.pdf",
                "Jane_Doe_Pre_Test_06-15-2021.pdf",
            ]
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let gens = generators(
            dir.path(),
            "echo 'template not found' >&2; exit 3",
            FAKE_TEST_SCRIPT,
            Duration::from_secs(10),
        );
        let staff = StaffIdentity::new("Jane Doe");
        let events = build_schedule(ymd(2021, 6, 15), None, ymd(2021, 7, 1));
        let manifest = write_manifest(dir.path(), &staff, &events).await.unwrap();
        let ctx = RenderContext {
            staff: &staff,
            profile: Agency::Attentive.profile(),
            events: &events,
            manifest_path: &manifest,
            scratch: dir.path(),
        };

        match gens.render_certificates(&ctx).await {
            Err(GeneratorError::Failed {
                generator,
                status,
                stderr,
            }) => {
                assert_eq!(generator, "certificate");
                assert_eq!(status, 3);
                assert_eq!(stderr, "template not found");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_generator_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let gens = generators(
            dir.path(),
            FAKE_CERT_SCRIPT,
            "sleep 5",
            Duration::from_millis(200),
        );
        let staff = StaffIdentity::new("Jane Doe");
        let events = build_schedule(ymd(2021, 6, 15), None, ymd(2021, 7, 1));
        let manifest = write_manifest(dir.path(), &staff, &events).await.unwrap();
        let ctx = RenderContext {
            staff: &staff,
            profile: Agency::Attentive.profile(),
            events: &events,
            manifest_path: &manifest,
            scratch: dir.path(),
        };

        let err = gens.render_tests(&ctx, &events[0]).await.unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::TimedOut {
                generator: "test",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut gens = generators(dir.path(), FAKE_CERT_SCRIPT, FAKE_TEST_SCRIPT, Duration::from_secs(1));
        gens.interpreter = "definitely-not-a-real-interpreter".to_string();
        let staff = StaffIdentity::new("Jane Doe");
        let events = build_schedule(ymd(2021, 6, 15), None, ymd(2021, 7, 1));
        let manifest = write_manifest(dir.path(), &staff, &events).await.unwrap();
        let ctx = RenderContext {
            staff: &staff,
            profile: Agency::Attentive.profile(),
            events: &events,
            manifest_path: &manifest,
            scratch: dir.path(),
        };

        let err = gens.render_certificates(&ctx).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Spawn { .. }));
    }
}
