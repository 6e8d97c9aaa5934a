use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use time::Date;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    None,
    Open,
    Command,
}

impl ExportMode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "none" => Ok(Self::None),
            "open" => Ok(Self::Open),
            "command" => Ok(Self::Command),
            other => Err(anyhow!("unknown export.mode: {other}")),
        }
    }
}

/// Dated output name: `<label>[-<job id>]-<YYYY-MM-DD>.<ext>`.
pub fn export_filename(label: &str, job_id: Option<&str>, date: Date, ext: &str) -> String {
    let id_part = match job_id {
        Some(id) => format!("-{id}"),
        None => String::new(),
    };
    format!(
        "{label}{id_part}-{:04}-{:02}-{:02}.{ext}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Post-write step for the document: nothing, hand to the platform opener,
/// or run the configured converter. Returns the converter output path when
/// one was produced.
pub fn export_document(cfg: &Config, document: &Path) -> Result<Option<PathBuf>> {
    match ExportMode::parse(&cfg.export.mode)? {
        ExportMode::None => Ok(None),
        ExportMode::Open => {
            open_document(cfg, document)?;
            Ok(None)
        }
        ExportMode::Command => {
            let output = document.with_extension("pdf");
            convert_with_command(cfg, document, &output)?;
            Ok(Some(output))
        }
    }
}

fn open_document(cfg: &Config, document: &Path) -> Result<()> {
    let opener = &cfg.export.opener;
    if opener.is_empty() {
        anyhow::bail!("export.opener is empty");
    }
    debug!("opening {} with {:?}", document.display(), opener);
    Command::new(&opener[0])
        .args(&opener[1..])
        .arg(document)
        .spawn()
        .with_context(|| format!("spawning opener: {}", opener[0]))?;
    Ok(())
}

/// Fills the `{input}`/`{output}` placeholders of a converter argv.
pub fn substitute_argv(command: &[String], input: &Path, output: &Path) -> Vec<String> {
    let input_str = input.display().to_string();
    let output_str = output.display().to_string();
    command
        .iter()
        .map(|arg| {
            arg.replace("{input}", &input_str)
                .replace("{output}", &output_str)
        })
        .collect()
}

fn convert_with_command(cfg: &Config, input: &Path, output: &Path) -> Result<()> {
    if cfg.export.command.is_empty() {
        anyhow::bail!("export.mode is \"command\" but export.command is empty");
    }
    let argv = substitute_argv(&cfg.export.command, input, output);

    debug!("running exporter {:?}", argv);
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning exporter: {}", argv[0]))?;

    let result = if cfg.export.timeout_seconds > 0 {
        wait_with_timeout(&mut child, Duration::from_secs(cfg.export.timeout_seconds))
    } else {
        child.wait_with_output().with_context(|| "waiting for exporter")
    };

    let out = match result {
        Ok(out) => out,
        Err(err) => {
            remove_partial(output);
            return Err(err);
        }
    };

    if !out.status.success() {
        remove_partial(output);
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(anyhow!("exporter failed: {}\n{}", argv[0], stderr));
    }
    Ok(())
}

/// A converter that died half way may have left a truncated file behind.
fn remove_partial(output: &Path) {
    if output.exists() {
        if std::fs::remove_file(output).is_err() {
            warn!("could not remove partial output {}", output.display());
        } else {
            debug!("removed partial output {}", output.display());
        }
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    // Drain pipes while waiting so a chatty converter can't deadlock on a
    // full stdout/stderr buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("exporter timed out after {:?}", timeout);
            let _ = child.kill();
            let status = child.wait().with_context(|| "wait after kill")?;
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            let output = Output {
                status,
                stdout,
                stderr,
            };
            return Err(anyhow!(
                "exporter exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
