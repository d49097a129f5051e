//! GPG commit signing
//!
//! [`GpgSigner`] imports the repository's signing key into a private keyring,
//! points git at it, and removes the key again in [`GpgSigner::cleanup`].
//! Keys are tracked from the import status, so cleanup deletes them even when
//! the later key listing cannot be read; a keyring directory the signer
//! created is removed as well.

mod key;

pub use key::{
    normalize_armored_key, parse_import_status, parse_secret_key_listing, GpgKey, KeyInfo,
};

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::subprocess::ShellRunner;

pub struct GpgSigner {
    home: PathBuf,
    /// Keys to delete on cleanup
    fingerprints: Vec<String>,
    created_home: bool,
}

impl GpgSigner {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            fingerprints: Vec::new(),
            created_home: false,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Fingerprint of the imported key, once imported
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprints.first().map(String::as_str)
    }

    /// Import `key` and configure the repository to sign commits with it.
    pub async fn configure(&mut self, shell: &mut ShellRunner, key: &GpgKey) -> Result<KeyInfo> {
        tracing::info!("Setting GPG private key for git commits");
        let armored = normalize_armored_key(&key.private_key);

        if !self.home.exists() {
            self.created_home = true;
        }
        prepare_keyring(&self.home)?;
        shell.set_env("GNUPGHOME", self.home.display().to_string());

        let status = shell
            .gpg()
            .args(["--batch", "--import", "--status-fd=1"])
            .stdin(armored)
            .run()
            .await
            .map_err(|_| Error::Gpg("Failed to import GPG key!".to_string()))?;
        self.track(parse_import_status(&status));

        let listing = shell
            .gpg()
            .args(["--list-secret-keys", "--with-colons", "--keyid-format=long"])
            .run()
            .await?;
        let info = parse_secret_key_listing(&listing).ok_or_else(|| {
            Error::Gpg("Failed to extract GPG Key ID and Fingerprint".to_string())
        })?;
        self.track([info.fingerprint.clone()]);

        if !key.passphrase.is_empty() {
            // Sign dummy data once so the agent caches the passphrase
            shell
                .gpg()
                .args([
                    "--batch",
                    "--pinentry-mode",
                    "loopback",
                    "--passphrase",
                    &key.passphrase,
                    "--status-fd=2",
                    "-bsau",
                    &info.key_id,
                ])
                .secret(4)
                .stdin("dummy".to_string())
                .run()
                .await?;
        }

        shell
            .git()
            .args(["config", "user.signingkey", &info.key_id])
            .run()
            .await?;
        shell
            .git()
            .args(["config", "commit.gpgsign", "true"])
            .run()
            .await?;
        tracing::info!("GPG signing configured with key ID: {}", info.key_id);
        Ok(info)
    }

    fn track(&mut self, fingerprints: impl IntoIterator<Item = String>) {
        for fingerprint in fingerprints {
            if !self.fingerprints.contains(&fingerprint) {
                self.fingerprints.push(fingerprint);
            }
        }
    }

    /// Delete the imported secret and public keys, then the keyring directory
    /// if this signer created it. Failures are logged.
    pub async fn cleanup(&mut self, shell: &ShellRunner) {
        let fingerprints = std::mem::take(&mut self.fingerprints);
        if !fingerprints.is_empty() {
            tracing::info!("Deleting gpg keys");
        }
        for fingerprint in &fingerprints {
            delete_key(shell, fingerprint).await;
        }

        if std::mem::take(&mut self.created_home) {
            if let Err(e) = tokio::fs::remove_dir_all(&self.home).await {
                tracing::warn!("Could not remove GPG keyring {}: {}", self.home.display(), e);
            }
        }
    }
}

async fn delete_key(shell: &ShellRunner, fingerprint: &str) {
    let secret = shell
        .gpg()
        .args([
            "--batch",
            "--yes",
            "--pinentry-mode",
            "loopback",
            "--delete-secret-key",
            fingerprint,
        ])
        .run()
        .await;
    if let Err(e) = secret {
        tracing::warn!("Could not delete GPG secret key: {}", e);
    }

    let public = shell
        .gpg()
        .args([
            "--batch",
            "--yes",
            "--delete-key",
            "--pinentry-mode",
            "loopback",
            fingerprint,
        ])
        .run()
        .await;
    if let Err(e) = public {
        tracing::warn!("Could not delete GPG public key: {}", e);
    }
}

fn prepare_keyring(home: &Path) -> Result<()> {
    std::fs::create_dir_all(home)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(home, std::fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
