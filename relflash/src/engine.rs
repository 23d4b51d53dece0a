//! esptool-backed flash engine.
//!
//! The flashing protocol itself (bootloader sync, chip detection, erase
//! and write sequencing, compression) is delegated to an external esptool
//! process; this module only builds its command lines, streams its output
//! into the terminal sink and lifts it into the [`FlashEngine`] interface.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use relflash_lib::{Error, FlashEngine, ProgressCallback, Result, Terminal, WriteFlashParams};
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct EsptoolEngine {
    program: String,
    port: String,
    baud: u32,
    rom_baud: u32,
}

impl EsptoolEngine {
    pub fn new(program: String, port: String, baud: u32, rom_baud: u32) -> Self {
        Self {
            program,
            port,
            baud,
            rom_baud,
        }
    }

    /// Run one esptool invocation, mirroring its stdout into the terminal
    /// line by line and feeding each line to `on_line`.
    fn run(
        &self,
        args: &[String],
        terminal: &mut dyn Terminal,
        mut on_line: impl FnMut(&str),
    ) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| Error::engine(format!("failed to launch {}: {err}", self.program)))?;

        // Drain stderr concurrently; a child filling the stderr pipe while
        // the parent is still reading stdout would deadlock both.
        let stderr_thread = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line?;
                terminal.write_line(&line);
                on_line(&line);
            }
        }

        let stderr_buf = stderr_thread
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        let status = child.wait()?;
        if !status.success() {
            for line in stderr_buf.lines() {
                terminal.write_line(line);
            }
            return Err(Error::engine(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

impl FlashEngine for EsptoolEngine {
    fn initialize(&mut self, terminal: &mut dyn Terminal) -> Result<String> {
        let args = vec![
            "--chip".to_string(),
            "auto".to_string(),
            "--port".to_string(),
            self.port.clone(),
            "--baud".to_string(),
            self.rom_baud.to_string(),
            "chip_id".to_string(),
        ];

        let mut chip = None;
        self.run(&args, terminal, |line| {
            if chip.is_none() {
                chip = parse_chip_line(line);
            }
        })?;
        chip.ok_or_else(|| Error::engine("could not determine chip type"))
    }

    fn write_flash(
        &mut self,
        params: &WriteFlashParams<'_>,
        progress: &mut dyn ProgressCallback,
        terminal: &mut dyn Terminal,
    ) -> Result<()> {
        // Stage each image in a scratch file; the handles must outlive the
        // child process.
        let mut staged: Vec<(u32, NamedTempFile)> = Vec::with_capacity(params.files.len());
        for image in params.files {
            let mut file = NamedTempFile::new()?;
            file.write_all(&image.data)?;
            file.flush()?;
            staged.push((image.address, file));
        }

        let mut args = vec![
            "--chip".to_string(),
            "auto".to_string(),
            "--port".to_string(),
            self.port.clone(),
            "--baud".to_string(),
            self.baud.to_string(),
            "write_flash".to_string(),
            "--flash_size".to_string(),
            params.flash_size.to_string(),
        ];
        if params.erase_all {
            args.push("--erase-all".to_string());
        }
        args.push(if params.compress { "-z" } else { "-u" }.to_string());
        for (address, file) in &staged {
            args.push(format!("{address:#x}"));
            args.push(file.path().to_string_lossy().into_owned());
        }

        // esptool prints "Writing at 0x... (NN %)" per chunk and a
        // "Wrote ..." summary after each file.
        let mut file_index = 0usize;
        self.run(&args, terminal, |line| {
            if let Some(percent) = parse_percent(line) {
                progress.progress(file_index, percent, 100);
            }
            if line.trim_start().starts_with("Wrote ") {
                file_index += 1;
            }
        })
    }
}

/// Extract the chip identifier from esptool's "Chip is ESP32-D0WD (revision 1)" line.
fn parse_chip_line(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("Chip is ")?;
    let chip = match rest.find(" (") {
        Some(end) => &rest[..end],
        None => rest,
    };
    let chip = chip.trim();
    (!chip.is_empty()).then(|| chip.to_string())
}

/// Extract the percentage from a "Writing at 0x00010000... (12 %)" line.
fn parse_percent(line: &str) -> Option<u64> {
    let line = line.trim_start();
    if !line.starts_with("Writing at") {
        return None;
    }
    let start = line.rfind('(')?;
    let rest = &line[start + 1..];
    let end = rest.find('%')?;
    rest[..end].trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relflash_lib::BufferTerminal;

    #[cfg(unix)]
    #[test]
    fn test_large_stderr_output_does_not_stall() {
        use std::os::unix::fs::PermissionsExt;

        // Stand-in for esptool that floods stderr well past the pipe
        // buffer before anything appears on stdout.
        let mut script = NamedTempFile::new().unwrap();
        writeln!(script, "#!/bin/sh").unwrap();
        writeln!(script, "head -c 200000 /dev/zero | tr '\\0' 'x' 1>&2").unwrap();
        writeln!(script, "echo 'Chip is ESP32 (revision 1)'").unwrap();
        script.flush().unwrap();
        let path = script.into_temp_path();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut engine = EsptoolEngine::new(
            path.to_string_lossy().into_owned(),
            "/dev/null".to_string(),
            460800,
            460800,
        );
        let mut terminal = BufferTerminal::new();

        let chip = engine.initialize(&mut terminal).unwrap();
        assert_eq!(chip, "ESP32");
        assert!(terminal.contents().contains("Chip is ESP32"));
    }

    #[test]
    fn test_parse_chip_line() {
        assert_eq!(
            parse_chip_line("Chip is ESP32-D0WD (revision 1)").as_deref(),
            Some("ESP32-D0WD")
        );
        assert_eq!(
            parse_chip_line("Chip is ESP32-C3").as_deref(),
            Some("ESP32-C3")
        );
        assert_eq!(parse_chip_line("Serial port /dev/ttyUSB0"), None);
        assert_eq!(parse_chip_line("Chip is "), None);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("Writing at 0x00010000... (12 %)"), Some(12));
        assert_eq!(parse_percent("Writing at 0x0002c000... (100 %)"), Some(100));
        assert_eq!(parse_percent("Wrote 262144 bytes in 3.2 seconds"), None);
        assert_eq!(parse_percent("Chip is ESP32 (revision 1)"), None);
        assert_eq!(parse_percent("Writing at 0x1000..."), None);
    }
}
