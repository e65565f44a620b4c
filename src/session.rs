//! Session management for the Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel execution
//! - Scoped client acquisition: the session file is saved on every exit path
//! - First-run interactive login

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};
use grammers_session::Session;
use tracing::warn;

use crate::config::{prompt, Config};
use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
pub struct SessionLock {
    lock_file: Option<File>,
    path: PathBuf,
}

impl SessionLock {
    /// Acquire an exclusive lock on the session.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                lock_file: Some(lock_file),
                path,
            }),
            Err(_) => {
                eprintln!(
                    "The Telegram session is already in use by another process.\n\
                     Wait for it to finish and try again."
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
        }
        self.lock_file = None;
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Check that a session file exists for the given configuration.
pub fn check_session_exists(config: &Config) -> Result<()> {
    let session_file = config.session_file();

    if !Path::new(&session_file).exists() {
        eprintln!(
            "Session file '{}' not found.\n\
             Run `init_session` first and enter the code from Telegram.",
            session_file
        );
        return Err(Error::SessionNotFound(session_file));
    }

    Ok(())
}

/// An open, authorized client session.
///
/// The session file is persisted when the value is dropped, so every exit
/// path (normal completion or error) leaves the session on disk.
pub struct ClientSession {
    client: Client,
    session_file: String,
}

impl ClientSession {
    /// Connect using an existing session file; fails if the account is not
    /// yet authorized.
    pub async fn connect(config: &Config) -> Result<Self> {
        check_session_exists(config)?;
        let session = Self::open(config).await?;

        if !session.client.is_authorized().await? {
            return Err(Error::AuthorizationRequired);
        }

        Ok(session)
    }

    /// Connect and run the interactive login flow if needed (first run).
    pub async fn login(config: &Config) -> Result<Self> {
        let session = Self::open(config).await?;

        if !session.client.is_authorized().await? {
            sign_in(&session.client).await?;
            session.save()?;
        }

        Ok(session)
    }

    async fn open(config: &Config) -> Result<Self> {
        let session_file = config.session_file();
        let session = Session::load_file_or_create(&session_file)
            .map_err(|e| Error::SessionNotFound(format!("Failed to load session: {}", e)))?;

        let client = Client::connect(ClientConfig {
            session,
            api_id: config.credentials.api_id,
            api_hash: config.credentials.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| Error::TelegramError(format!("Failed to connect: {}", e)))?;

        Ok(Self {
            client,
            session_file,
        })
    }

    /// Save the session to file
    pub fn save(&self) -> Result<()> {
        self.client
            .session()
            .save_to_file(&self.session_file)
            .map_err(Error::IoError)?;
        Ok(())
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        if let Err(e) = self.save() {
            warn!("Failed to save session on teardown: {}", e);
        }
    }
}

// Allow using ClientSession as &Client
impl std::ops::Deref for ClientSession {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Interactive sign-in: phone, login code, optional 2FA password.
async fn sign_in(client: &Client) -> Result<()> {
    let phone = prompt("Enter your phone (international format): ")?;
    let token = client
        .request_login_code(&phone)
        .await
        .map_err(|e| Error::TelegramError(format!("Failed to request code: {}", e)))?;

    let code = prompt("Enter the code you received: ")?;

    match client.sign_in(&token, &code).await {
        Ok(user) => {
            println!("Signed in as {}", user.full_name());
            Ok(())
        }
        Err(SignInError::PasswordRequired(password_token)) => {
            let password = prompt("Two-step verification enabled. Enter your password: ")?;
            let user = client
                .check_password(password_token, password)
                .await
                .map_err(|e| Error::TelegramError(format!("Password sign-in failed: {}", e)))?;
            println!("Signed in as {}", user.full_name());
            Ok(())
        }
        Err(e) => Err(Error::TelegramError(format!("Sign-in failed: {}", e))),
    }
}
