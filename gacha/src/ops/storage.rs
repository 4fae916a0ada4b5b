use std::path::Path;

use futures::future::try_join_all;
use gacha_core::{CollectionSession, DumpOptions, GachaError};

use crate::core::Gacha;

fn io_err(path: &Path, e: &std::io::Error) -> GachaError {
    if e.kind() == std::io::ErrorKind::NotFound {
        GachaError::not_found(path.display().to_string())
    } else {
        GachaError::Io(format!("{}: {e}", path.display()))
    }
}

impl Gacha {
    /// Load one export.
    ///
    /// # Errors
    /// `GachaError::NotFound` if the file does not exist, `GachaError::Io` for
    /// other read failures, `GachaError::Data` for a malformed document.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gacha::load", skip_all, fields(path = %path.as_ref().display()))
    )]
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<CollectionSession, GachaError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| io_err(path, &e))?;
        let session = CollectionSession::load_str(&text, self.cfg.merge)?;
        Ok(session.with_catalog(&self.catalog))
    }

    /// Write `session` to `path`, replacing it only once the new content is on disk.
    ///
    /// # Errors
    /// `GachaError::Io` if the file cannot be written.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gacha::save", skip_all, fields(path = %path.as_ref().display()))
    )]
    pub async fn save(
        &self,
        session: &CollectionSession,
        path: impl AsRef<Path>,
        opts: DumpOptions,
    ) -> Result<(), GachaError> {
        let path = path.as_ref();
        let text = session.dump_string(opts)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);
        tokio::fs::write(tmp, text)
            .await
            .map_err(|e| io_err(tmp, &e))?;
        if let Err(e) = tokio::fs::rename(tmp, path).await {
            let _ = tokio::fs::remove_file(tmp).await;
            return Err(io_err(path, &e));
        }
        Ok(())
    }

    /// Load several exports concurrently and merge them in the given order.
    ///
    /// The first file is the base; later files are merged into it one by one,
    /// so `Keep` favours earlier files and `Overwrite` later ones.
    ///
    /// # Errors
    /// - `GachaError::InvalidArg` for an empty list;
    /// - any load error of the first failing file;
    /// - `GachaError::MergeConflict` from the first conflicting merge.
    pub async fn load_all<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<CollectionSession, GachaError> {
        let sessions = try_join_all(paths.iter().map(|p| self.load(p))).await?;
        let mut sessions = sessions.into_iter();
        let first = sessions
            .next()
            .ok_or_else(|| GachaError::InvalidArg("no export paths given".to_string()))?;
        sessions.try_fold(first, CollectionSession::merged)
    }

    /// Collect, merge into the master export and write it back.
    ///
    /// A missing master file is created from the fresh collection. The master
    /// is not touched if collecting or merging fails.
    ///
    /// # Errors
    /// Errors of [`collect`](Self::collect), [`load`](Self::load) (other than
    /// `NotFound`), the merge, or [`save`](Self::save).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "gacha::sync", skip_all, fields(path = %master.as_ref().display()))
    )]
    pub async fn sync(
        &self,
        master: impl AsRef<Path>,
        opts: DumpOptions,
    ) -> Result<CollectionSession, GachaError> {
        let master = master.as_ref();
        let fresh = self.collect().await?;
        let session = match self.load(master).await {
            Ok(existing) => existing.merged(fresh)?,
            Err(GachaError::NotFound { .. }) => {
                #[cfg(feature = "tracing")]
                tracing::info!("no master export yet; starting from the collection");
                fresh
            }
            Err(e) => return Err(e),
        };
        self.save(&session, master, opts).await?;
        Ok(session)
    }
}
