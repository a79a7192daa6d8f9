//! 外部プロセス実行の抽象化

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 終了したプロセスの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// 終了コード。シグナル終了時は `None`
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// 外部コマンドを同期的に実行する能力。
///
/// 起動できない場合は `Err`、起動して非ゼロ終了した場合は `Ok` で status に反映する。
/// タイムアウトは `ErrorKind::TimedOut`。
pub trait ExternalRunner {
    fn execute(&self, program: &str, args: &[String], workdir: &Path) -> io::Result<ProcessOutput>;
}

/// `std::process::Command` による実装
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ExternalRunner for ProcessRunner {
    fn execute(&self, program: &str, args: &[String], workdir: &Path) -> io::Result<ProcessOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let Some(timeout) = self.timeout else {
            let out = cmd.output()?;
            return Ok(ProcessOutput {
                status: out.status.code(),
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        };

        let mut child = cmd.spawn()?;
        // パイプが詰まって子プロセスが止まらないよう別スレッドで読み切る
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = wait_with_deadline(&mut child, timeout)?;
        Ok(ProcessOutput {
            status: status.code(),
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut p) = pipe {
            let _ = p.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> io::Result<std::process::ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("process did not exit within {}s", timeout.as_secs_f64()),
            ));
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}
