//! User accounts and role-based permissions.
//!
//! Accounts are kept in a JSON array file. Usernames are unique
//! case-insensitively; passwords are stored as SHA-256 digests salted
//! with the lower-cased username.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BugError, Result};

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Developer,
    Tester,
    ProjectManager,
    Admin,
}

impl Role {
    pub const ALL: [Self; 4] = [
        Self::Developer,
        Self::Tester,
        Self::ProjectManager,
        Self::Admin,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "DEVELOPER",
            Self::Tester => "TESTER",
            Self::ProjectManager => "PROJECT_MANAGER",
            Self::Admin => "ADMIN",
        }
    }

    /// Whether this role may perform `permission`.
    #[must_use]
    pub const fn allows(self, permission: Permission) -> bool {
        match self {
            Self::Admin => true,
            Self::ProjectManager => matches!(permission, Permission::ViewStats),
            Self::Tester => matches!(
                permission,
                Permission::ViewBugs
                    | Permission::AddBug
                    | Permission::Search
                    | Permission::ViewStats
            ),
            Self::Developer => !matches!(permission, Permission::AddBug | Permission::ManageUsers),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BugError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "developer" | "dev" => Ok(Self::Developer),
            "tester" | "qa" => Ok(Self::Tester),
            "project_manager" | "projectmanager" | "manager" | "pm" => Ok(Self::ProjectManager),
            "admin" | "administrator" => Ok(Self::Admin),
            other => Err(BugError::InvalidRole {
                role: other.to_string(),
            }),
        }
    }
}

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewBugs,
    AddBug,
    ChangeStatus,
    EditBug,
    DeleteBug,
    Comment,
    Search,
    ViewStats,
    ManageUsers,
}

impl Permission {
    /// Verb phrase for access-denied messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::ViewBugs => "view bugs",
            Self::AddBug => "add bugs",
            Self::ChangeStatus => "change bug status",
            Self::EditBug => "edit bugs",
            Self::DeleteBug => "delete bugs",
            Self::Comment => "comment on bugs",
            Self::Search => "search bugs",
            Self::ViewStats => "view statistics",
            Self::ManageUsers => "manage users",
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn check_password(&self, password: &str) -> bool {
        self.password_hash == hash_password(&self.username, password)
    }

    /// Fail with `AccessDenied` unless the role grants `permission`.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if the user's role lacks the permission.
    pub fn require(&self, permission: Permission) -> Result<()> {
        if self.role.allows(permission) {
            Ok(())
        } else {
            Err(BugError::AccessDenied {
                role: self.role.to_string(),
                action: permission.describe().to_string(),
            })
        }
    }
}

fn hash_password(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.to_lowercase().as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Account store persisted as a JSON array.
#[derive(Debug)]
pub struct UserStore {
    users: Vec<User>,
    path: Option<PathBuf>,
}

impl UserStore {
    /// Create a new empty store with no backing file.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            users: Vec::new(),
            path: None,
        }
    }

    /// Open the account file, starting empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read or `Json` if it is not a
    /// valid account list.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let users = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No user file at {}; starting fresh", path.display());
                Vec::new()
            }
            Err(e) => return Err(BugError::Io(e)),
        };

        Ok(Self {
            users,
            path: Some(path.to_path_buf()),
        })
    }

    /// Write the accounts back to the file they were opened from.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store has no file, or `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| BugError::Storage("No user file path set".to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        let json = serde_json::to_string_pretty(&self.users)?;
        writeln!(file, "{json}")?;
        file.flush()?;
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank username or password, or
    /// `UserExists` if the name is taken (ignoring case).
    pub fn sign_up(&mut self, username: &str, password: &str, role: Role) -> Result<&User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(BugError::validation("username", "cannot be empty"));
        }
        if password.is_empty() {
            return Err(BugError::validation("password", "cannot be empty"));
        }
        if self.find(username).is_some() {
            return Err(BugError::UserExists {
                username: username.to_string(),
            });
        }

        self.users.push(User {
            username: username.to_string(),
            password_hash: hash_password(username, password),
            role,
            created_at: Utc::now(),
        });
        tracing::info!("Registered user {username} as {role}");

        let idx = self.users.len() - 1;
        Ok(&self.users[idx])
    }

    /// Verify credentials.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if the user is unknown or the password
    /// does not match.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&User> {
        self.find(username)
            .filter(|user| user.check_password(password))
            .ok_or(BugError::InvalidCredentials)
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn find(&self, username: &str) -> Option<&User> {
        let username = username.trim();
        self.users
            .iter()
            .find(|user| user.username.eq_ignore_ascii_case(username))
    }

    #[must_use]
    pub fn role_of(&self, username: &str) -> Option<Role> {
        self.find(username).map(|user| user.role)
    }

    /// Remove an account. Returns `false` if it did not exist.
    pub fn remove(&mut self, username: &str) -> bool {
        let username = username.trim();
        let before = self.users.len();
        self.users
            .retain(|user| !user.username.eq_ignore_ascii_case(username));
        before != self.users.len()
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
