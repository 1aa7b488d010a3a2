//! 辞書の自動読み込み
//!
//! 設定された辞書ディレクトリごとにバックグラウンドスレッドを起動し、
//! 制御ファイル`lex-autoload.todo`を定期的に確認します。制御ファイルが
//! 変更されていれば、そこに列挙された辞書ファイルを稼働中の辞書に読み込み、
//! 制御ファイルを空にします。
//!
//! 制御ファイルの変更はファイルメタデータのハッシュ
//! （[`compute_metadata_hash`](crate::utils::compute_metadata_hash)）で判定します。
//! 読み込みに失敗したサイクルは記録を更新しないため、次のサイクルで
//! その時点の制御ファイルの内容が再び読み込まれます。

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

use crate::config::LexiconConfig;
use crate::errors::{LexiconError, Result};
use crate::lexicon::Lexicon;
use crate::loader::{self, LoadReport};
use crate::utils::compute_metadata_hash;

/// 制御ファイルのファイル名。
pub const AUTOLOAD_CONTROL_FILE: &str = "lex-autoload.todo";

struct Watcher {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// 辞書の自動読み込み器。
///
/// 停止状態で作成され、[`start`](Self::start)で起動、[`stop`](Self::stop)で
/// 停止します。起動中の読み込み器をドロップすると停止します。
///
/// # 例
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use hanlex::{Autoloader, HashLexicon, LexiconConfig};
///
/// let lexicon = Arc::new(HashLexicon::new());
/// let config = LexiconConfig::new()
///     .lexicon_path("/var/lib/lexicon")
///     .poll_interval(Duration::from_secs(60));
///
/// hanlex::loader::load_paths(&*lexicon, &config)?;
///
/// let mut autoloader = Autoloader::new(Arc::clone(&lexicon), config);
/// autoloader.start()?;
/// // ...
/// autoloader.stop()?;
/// # Ok::<(), hanlex::errors::LexiconError>(())
/// ```
pub struct Autoloader<L>
where
    L: Lexicon + ?Sized + 'static,
{
    lexicon: Arc<L>,
    config: LexiconConfig,
    watchers: Vec<Watcher>,
}

impl<L> Autoloader<L>
where
    L: Lexicon + ?Sized + 'static,
{
    /// 停止状態の読み込み器を作成します。
    ///
    /// # 引数
    ///
    /// * `lexicon` - 読み込み先の稼働中の辞書
    /// * `config` - 辞書ディレクトリとポーリング間隔を含む設定
    pub fn new(lexicon: Arc<L>, config: LexiconConfig) -> Self {
        Self {
            lexicon,
            config,
            watchers: vec![],
        }
    }

    /// 読み込み先の辞書を取得します。
    #[inline(always)]
    pub fn lexicon(&self) -> &Arc<L> {
        &self.lexicon
    }

    /// 設定を取得します。
    #[inline(always)]
    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    /// 起動中かどうかを返します。
    #[inline(always)]
    pub fn is_running(&self) -> bool {
        !self.watchers.is_empty()
    }

    /// 辞書ディレクトリごとに監視スレッドを起動します。
    ///
    /// 起動時点の制御ファイルの状態が基準として記録され、それ以降の変更だけが
    /// 読み込まれます。既に起動中の場合、または辞書ディレクトリが設定されていない場合は何もしません。
    ///
    /// # エラー
    ///
    /// 設定が不正な場合は[`LexiconError::InvalidArgument`]を、スレッドを
    /// 起動できなかった場合は[`LexiconError::Io`]を返します。
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() || self.config.lexicon_paths.is_empty() {
            return Ok(());
        }
        self.config.validate()?;

        let paths = self.config.lexicon_paths.clone();
        for (i, dir) in paths.into_iter().enumerate() {
            let (stop_tx, stop_rx) = mpsc::channel();
            let lexicon = Arc::clone(&self.lexicon);
            let config = self.config.clone();
            let baseline = fingerprint(&dir.join(AUTOLOAD_CONTROL_FILE));

            let spawned = thread::Builder::new()
                .name(format!("hanlex-autoload-{i}"))
                .spawn(move || watch(&*lexicon, &config, &dir, baseline, &stop_rx));
            match spawned {
                Ok(handle) => self.watchers.push(Watcher { stop_tx, handle }),
                Err(e) => {
                    self.stop()?;
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    /// すべての監視スレッドを停止し、終了を待ちます。
    ///
    /// 読み込み中のファイルがある場合は、その読み込みが終わってから停止します。
    /// 停止状態で呼び出した場合は何もしません。
    ///
    /// # エラー
    ///
    /// 監視スレッドがパニックしていた場合、[`LexiconError::ThreadPanic`]を返します。
    pub fn stop(&mut self) -> Result<()> {
        let handles: Vec<_> = std::mem::take(&mut self.watchers)
            .into_iter()
            .map(|Watcher { stop_tx, handle }| {
                drop(stop_tx);
                handle
            })
            .collect();

        let mut result = Ok(());
        for handle in handles {
            if let Err(e) = handle.join() {
                let panic_msg = if let Some(s) = e.downcast_ref::<&'static str>() {
                    s.to_string()
                } else if let Some(s) = e.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                log::error!("[hanlex] Autoload thread panicked: {panic_msg}");
                if result.is_ok() {
                    result = Err(LexiconError::ThreadPanic(panic_msg));
                }
            }
        }
        result
    }
}

impl<L> Drop for Autoloader<L>
where
    L: Lexicon + ?Sized + 'static,
{
    fn drop(&mut self) {
        // パニックは`stop`の中で記録済み
        let _ = self.stop();
    }
}

fn fingerprint(path: &Path) -> Option<String> {
    fs::metadata(path)
        .ok()
        .map(|meta| compute_metadata_hash(&meta))
}

fn watch<L>(
    lexicon: &L,
    config: &LexiconConfig,
    dir: &Path,
    mut baseline: Option<String>,
    stop_rx: &Receiver<()>,
) where
    L: Lexicon + ?Sized,
{
    let control = dir.join(AUTOLOAD_CONTROL_FILE);
    log::info!("[hanlex] Autoload started for {}", dir.display());

    loop {
        match stop_rx.recv_timeout(config.poll_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        match poll(lexicon, config, dir, &control, baseline.as_deref()) {
            Ok(Some(current)) => baseline = Some(current),
            Ok(None) => {}
            Err(e) if e.is_io() => log::warn!(
                "[hanlex] Autoload of {} failed, retrying next cycle: {e}",
                control.display()
            ),
            Err(e) => log::error!(
                "[hanlex] Autoload of {} failed, retrying next cycle: {e}",
                control.display()
            ),
        }
    }

    log::info!("[hanlex] Autoload stopped for {}", dir.display());
}

/// 1サイクル分の確認と読み込みを行います。
///
/// 読み込んだ場合は新しいフィンガープリントを返します。
fn poll<L>(
    lexicon: &L,
    config: &LexiconConfig,
    dir: &Path,
    control: &Path,
    baseline: Option<&str>,
) -> Result<Option<String>>
where
    L: Lexicon + ?Sized,
{
    let Some(current) = fingerprint(control) else {
        return Ok(None);
    };
    if baseline == Some(current.as_str()) {
        return Ok(None);
    }

    let files: Vec<PathBuf> = fs::read_to_string(control)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| dir.join(line))
        .collect();

    let mut report = LoadReport::default();
    for path in &files {
        report += loader::load_file(lexicon, config, path)?;
    }

    File::create(control)?;
    let updated = compute_metadata_hash(&fs::metadata(control)?);

    log::info!(
        "[hanlex] Autoloaded {} file(s) from {}: {} applied, {} skipped, {} malformed",
        files.len(),
        dir.display(),
        report.applied,
        report.skipped,
        report.malformed
    );
    Ok(Some(updated))
}
