//! Player accounts as seen by the game: identity, ship image and favourite
//! tracks, plus the collaborator interfaces for registration and password
//! recovery.

use std::path::PathBuf;

use crate::error::{MailError, ValidationError};

pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: u64,
    pub alias: String,
    pub full_name: String,
    pub email: String,
    pub ship_image: Option<PathBuf>,
    pub favourite_tracks: Vec<PathBuf>,
}

impl Player {
    pub fn display_name(&self) -> &str {
        &self.alias
    }
}

/// Editable part of a player record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileData {
    pub alias: String,
    pub full_name: String,
    pub email: String,
    pub ship_image: Option<PathBuf>,
    pub favourite_tracks: Vec<PathBuf>,
}

impl From<&Player> for ProfileData {
    fn from(p: &Player) -> Self {
        Self {
            alias: p.alias.clone(),
            full_name: p.full_name.clone(),
            email: p.email.clone(),
            ship_image: p.ship_image.clone(),
            favourite_tracks: p.favourite_tracks.clone(),
        }
    }
}

pub fn validate_alias(alias: &str) -> Result<(), ValidationError> {
    if alias.chars().count() < 3 {
        return Err(ValidationError::new("Alias must have at least 3 characters."));
    }
    if !alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(ValidationError::new(
            "Alias may only contain letters, digits, '-' and '_'.",
        ));
    }
    Ok(())
}

/// `local@domain.tld` with a letters-only top-level domain of 2+ chars.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("Invalid email format.");
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let local_ok = !local.is_empty()
        && local.chars().all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    let host_ok = !host.is_empty()
        && host.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    if local_ok && host_ok && tld_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 7 {
        return Err(ValidationError::new("Password must have at least 7 characters."));
    }
    let checks: [(fn(char) -> bool, &str); 4] = [
        (|c| c.is_ascii_uppercase(), "an uppercase letter"),
        (|c| c.is_ascii_lowercase(), "a lowercase letter"),
        (|c| c.is_ascii_digit(), "a digit"),
        (|c| PASSWORD_SYMBOLS.contains(c), "a special symbol"),
    ];
    for (check, what) in checks {
        if !password.chars().any(check) {
            return Err(ValidationError::new(format!("Password must contain {}.", what)));
        }
    }
    Ok(())
}

/// Account storage and credential checks.
pub trait PlayerDirectory {
    fn register(&mut self, profile: ProfileData, password: &str) -> Result<Player, ValidationError>;
    /// `login` may be the alias or the email.
    fn authenticate(&self, login: &str, password: &str) -> Result<Player, ValidationError>;
    fn find_by_email(&self, email: &str) -> Option<Player>;
    fn update_profile(&mut self, id: u64, profile: ProfileData) -> Result<Player, ValidationError>;
    fn set_password(&mut self, email: &str, password: &str) -> Result<(), ValidationError>;
}

/// Delivers password-recovery codes.
pub trait CodeMailer {
    fn send_code(&mut self, email: &str, code: &str) -> Result<(), MailError>;
}

/// Writes the code to the log instead of sending it.
#[derive(Debug, Default)]
pub struct LogMailer;

impl CodeMailer for LogMailer {
    fn send_code(&mut self, email: &str, code: &str) -> Result<(), MailError> {
        log::info!("Recovery code for {}: {}", email, code);
        Ok(())
    }
}

struct Account {
    player: Player,
    password: String,
}

/// Directory living in memory for the lifetime of the process. Not a
/// credential store.
#[derive(Default)]
pub struct MemoryDirectory {
    next_id: u64,
    accounts: Vec<Account>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn check_profile(&self, profile: &ProfileData, exclude: Option<u64>) -> Result<(), ValidationError> {
        validate_alias(&profile.alias)?;
        validate_email(&profile.email)?;
        let others = self.accounts.iter().filter(|a| Some(a.player.id) != exclude);
        for a in others {
            if a.player.alias == profile.alias {
                return Err(ValidationError::new("Alias already in use."));
            }
            if a.player.email.eq_ignore_ascii_case(&profile.email) {
                return Err(ValidationError::new("Email already registered."));
            }
        }
        Ok(())
    }
}

impl PlayerDirectory for MemoryDirectory {
    fn register(&mut self, profile: ProfileData, password: &str) -> Result<Player, ValidationError> {
        self.check_profile(&profile, None)?;
        validate_password(password)?;
        self.next_id += 1;
        let player = Player {
            id: self.next_id,
            alias: profile.alias,
            full_name: profile.full_name,
            email: profile.email,
            ship_image: profile.ship_image,
            favourite_tracks: profile.favourite_tracks,
        };
        log::info!("Registered player {} ({})", player.alias, player.id);
        self.accounts.push(Account { player: player.clone(), password: password.to_string() });
        Ok(player)
    }

    fn authenticate(&self, login: &str, password: &str) -> Result<Player, ValidationError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.player.alias == login || a.player.email.eq_ignore_ascii_case(login))
            .ok_or_else(|| ValidationError::new("Unknown alias or email."))?;
        if account.password != password {
            return Err(ValidationError::new("Wrong password."));
        }
        Ok(account.player.clone())
    }

    fn find_by_email(&self, email: &str) -> Option<Player> {
        self.accounts
            .iter()
            .find(|a| a.player.email.eq_ignore_ascii_case(email))
            .map(|a| a.player.clone())
    }

    fn update_profile(&mut self, id: u64, profile: ProfileData) -> Result<Player, ValidationError> {
        self.check_profile(&profile, Some(id))?;
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.player.id == id)
            .ok_or_else(|| ValidationError::new("Player not found."))?;
        let p = &mut account.player;
        p.alias = profile.alias;
        p.full_name = profile.full_name;
        p.email = profile.email;
        p.ship_image = profile.ship_image;
        p.favourite_tracks = profile.favourite_tracks;
        Ok(p.clone())
    }

    fn set_password(&mut self, email: &str, password: &str) -> Result<(), ValidationError> {
        validate_password(password)?;
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.player.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| ValidationError::new("No account with that email."))?;
        account.password = password.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(alias: &str, email: &str) -> ProfileData {
        ProfileData {
            alias: alias.into(),
            full_name: "Test Pilot".into(),
            email: email.into(),
            ..ProfileData::default()
        }
    }

    #[test]
    fn alias_rules() {
        assert!(validate_alias("ab").is_err());
        assert!(validate_alias("ace pilot").is_err());
        assert!(validate_alias("ace_pilot-2").is_ok());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("nova@galaxy.io").is_ok());
        assert!(validate_email("nova@galaxy").is_err());
        assert!(validate_email("@galaxy.io").is_err());
        assert!(validate_email("nova@galaxy.i").is_err());
        assert!(validate_email("nova@.io").is_err());
    }

    #[test]
    fn password_rules_name_the_missing_class() {
        assert_eq!(validate_password("Ab1!").unwrap_err().0, "Password must have at least 7 characters.");
        assert!(validate_password("abcdef1!").unwrap_err().0.contains("uppercase"));
        assert!(validate_password("Abcdefg1").unwrap_err().0.contains("symbol"));
        assert!(validate_password("Abcdef1!").is_ok());
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut dir = MemoryDirectory::new();
        dir.register(profile("nova", "nova@galaxy.io"), "Abcdef1!").unwrap();
        let dup_alias = dir.register(profile("nova", "other@galaxy.io"), "Abcdef1!");
        assert_eq!(dup_alias.unwrap_err().0, "Alias already in use.");
        let dup_email = dir.register(profile("orion", "NOVA@galaxy.io"), "Abcdef1!");
        assert_eq!(dup_email.unwrap_err().0, "Email already registered.");
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn login_by_alias_or_email() {
        let mut dir = MemoryDirectory::new();
        let p = dir.register(profile("nova", "nova@galaxy.io"), "Abcdef1!").unwrap();
        assert_eq!(dir.authenticate("nova", "Abcdef1!").unwrap(), p);
        assert_eq!(dir.authenticate("nova@galaxy.io", "Abcdef1!").unwrap(), p);
        assert!(dir.authenticate("nova", "wrong").is_err());
    }

    #[test]
    fn profile_update_may_keep_own_alias() {
        let mut dir = MemoryDirectory::new();
        let p = dir.register(profile("nova", "nova@galaxy.io"), "Abcdef1!").unwrap();
        let mut edit = ProfileData::from(&p);
        edit.full_name = "Nova Prime".into();
        assert_eq!(dir.update_profile(p.id, edit).unwrap().full_name, "Nova Prime");
    }

    #[test]
    fn set_password_then_login() {
        let mut dir = MemoryDirectory::new();
        dir.register(profile("nova", "nova@galaxy.io"), "Abcdef1!").unwrap();
        dir.set_password("nova@galaxy.io", "Zyxwvu9?").unwrap();
        assert!(dir.authenticate("nova", "Zyxwvu9?").is_ok());
    }
}
