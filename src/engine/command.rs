use super::{types::*, TextRecovery};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::io::{Read, Write};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Recovers text by piping the document through external tools:
/// a PDF text extractor and an OCR engine, both reading stdin and
/// writing the transcript to stdout.
pub struct CommandEngine {
    cfg: Config,
}

impl CommandEngine {
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }

    fn run_tool(&self, program: &str, args: &[String], input: &[u8]) -> Result<String> {
        debug!(
            "run {} {:?} input_bytes={} timeout={}s",
            program,
            args,
            input.len(),
            self.cfg.engine.timeout_seconds
        );
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning {program}"))?;

        let timeout = match self.cfg.engine.timeout_seconds {
            0 => Duration::MAX,
            secs => Duration::from_secs(secs),
        };
        let output = wait_with_timeout(&mut child, input, timeout)
            .with_context(|| format!("waiting for {program}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{program} failed ({}): {}", output.status, stderr.trim()));
        }

        if self.cfg.engine.keep_stderr && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{program} stderr: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TextRecovery for CommandEngine {
    fn doctor(&self) -> Result<EngineDiag> {
        let pdf = probe_tool(&self.cfg.engine.pdf_command, "-v");
        let image = probe_tool(&self.cfg.engine.image_command, "--version");
        Ok(EngineDiag {
            ok: pdf.found && image.found,
            pdf,
            image,
        })
    }

    fn pdf_text(&self, bytes: &[u8]) -> Result<String> {
        self.run_tool(&self.cfg.engine.pdf_command, &self.cfg.engine.pdf_args, bytes)
            .with_context(|| "PDF text recovery")
    }

    fn image_text(&self, bytes: &[u8], subtype: &str) -> Result<String> {
        self.run_tool(&self.cfg.engine.image_command, &self.cfg.engine.image_args, bytes)
            .with_context(|| format!("OCR of image/{subtype}"))
    }
}

fn probe_tool(program: &str, version_flag: &str) -> ToolDiag {
    match Command::new(program).arg(version_flag).output() {
        Ok(out) => {
            // poppler prints its version on stderr, tesseract on stdout
            let text = if out.stdout.is_empty() { &out.stderr } else { &out.stdout };
            let version = String::from_utf8_lossy(text)
                .lines()
                .next()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty());
            ToolDiag {
                command: program.to_string(),
                found: true,
                version,
                error: None,
            }
        }
        Err(err) => ToolDiag {
            command: program.to_string(),
            found: false,
            version: None,
            error: Some(err.to_string()),
        },
    }
}

fn wait_with_timeout(child: &mut Child, input: &[u8], timeout: Duration) -> Result<Output> {
    // Feed stdin and drain both pipes on their own threads so a tool that
    // starts writing before it has read everything cannot deadlock.
    let stdin_writer = child.stdin.take();
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();
    let input = input.to_vec();

    let stdin_thread = std::thread::spawn(move || -> Result<()> {
        if let Some(mut w) = stdin_writer {
            // A tool may exit early (bad header) and close its end.
            if let Err(e) = w.write_all(&input) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e).with_context(|| "write stdin");
                }
            }
        }
        Ok(())
    });

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
            stdin_thread
                .join()
                .map_err(|_| anyhow!("stdin writer thread panicked"))??;
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
            warn!("text recovery process timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            let _ = stdin_thread.join();
            let _ = stdout_thread.join();
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Err(anyhow!(
                "text recovery exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&stderr)
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
