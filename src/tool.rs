//! 外部コマンド（pdftoppm / tesseract）の実行

use crate::error::AcquisitionError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

/// Windows でコンソールウィンドウを開かない
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// コマンドを実行し、成功時の出力を返す
///
/// 返り値の Future を drop すると子プロセスも kill される（タイムアウト用）。
pub async fn run_tool<I, S>(program: &Path, args: I) -> Result<Output, AcquisitionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);

    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    let output = command.output().await.map_err(|source| AcquisitionError::Spawn {
        program: program.display().to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(AcquisitionError::ToolFailed {
            program: program.display().to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
