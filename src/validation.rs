//! Input validation for signup and onboarding forms.
//!
//! Rules:
//! - email: `local@domain.tld`, local part `[A-Za-z0-9._%+-]+`, domain
//!   `[A-Za-z0-9.-]+`, TLD 2-6 ASCII letters
//! - password: at least 6 chars with an upper, a lower and a digit
//! - age: 13..=120
//! - urls: optional; otherwise `[http(s)://][www.]label(.label)+[/path]`

use crate::domain::{ProfileUpdate, Socials};

pub const MIN_AGE: i64 = 13;
pub const MAX_AGE: i64 = 120;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A rejected form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  InvalidEmail,
  WeakPassword,
  BlankField(&'static str),
  EmptyList(&'static str),
  AgeOutOfRange(i64),
  InvalidUrl(&'static str),
  InvalidTopic(String),
  SelfConnection,
}

impl std::fmt::Display for ValidationError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ValidationError::InvalidEmail => write!(f, "Please enter a valid email address"),
      ValidationError::WeakPassword => write!(
        f,
        "Password must be at least {} characters and contain an uppercase letter, a lowercase letter and a digit",
        MIN_PASSWORD_LENGTH
      ),
      ValidationError::BlankField(field) => write!(f, "{} is required", field),
      ValidationError::EmptyList(field) => write!(f, "Please select at least one {}", field),
      ValidationError::AgeOutOfRange(age) => {
        write!(f, "Age {} is outside the allowed range {}-{}", age, MIN_AGE, MAX_AGE)
      }
      ValidationError::InvalidUrl(field) => write!(f, "{} is not a valid URL", field),
      ValidationError::InvalidTopic(topic) => {
        write!(f, "Topic '{}' must be non-empty and must not contain a comma", topic)
      }
      ValidationError::SelfConnection => write!(f, "Cannot send a connection request to yourself"),
    }
  }
}

impl std::error::Error for ValidationError {}

/// Trim and lowercase an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
  let email = email.trim();
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || !local.chars().all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c)) {
    return false;
  }
  // Domain part is greedy up to the last dot, which starts the TLD
  let Some((host, tld)) = domain.rsplit_once('.') else {
    return false;
  };
  if host.is_empty() || !host.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
    return false;
  }
  (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_valid_password(password: &str) -> bool {
  if password.trim().is_empty() || password.chars().count() < MIN_PASSWORD_LENGTH {
    return false;
  }
  password.chars().any(|c| c.is_ascii_uppercase())
    && password.chars().any(|c| c.is_ascii_lowercase())
    && password.chars().any(|c| c.is_ascii_digit())
}

pub fn is_valid_name(name: &str) -> bool {
  !name.trim().is_empty()
}

pub fn is_valid_age(age: i64) -> bool {
  (MIN_AGE..=MAX_AGE).contains(&age)
}

/// Blank is valid (social links are optional)
pub fn is_valid_url(url: &str) -> bool {
  let url = url.trim();
  if url.is_empty() {
    return true;
  }

  let rest = url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url);
  let rest = rest.strip_prefix("www.").unwrap_or(rest);

  let host = match rest.find('/') {
    Some(idx) => &rest[..idx],
    None => rest,
  };

  let mut labels = host.split('.');
  let Some(first) = labels.next() else {
    return false;
  };
  if first.is_empty() || !first.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
    return false;
  }

  let suffixes: Vec<&str> = labels.collect();
  !suffixes.is_empty()
    && suffixes
      .iter()
      .all(|l| l.len() >= 2 && l.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Labels must survive the `", "` text format
pub fn validate_topic_label(topic: &str) -> Result<(), ValidationError> {
  if topic.trim().is_empty() || topic.contains(',') {
    return Err(ValidationError::InvalidTopic(topic.to_string()));
  }
  Ok(())
}

pub fn validate_signup(email: &str, password: &str) -> Result<(), ValidationError> {
  if !is_valid_email(email) {
    return Err(ValidationError::InvalidEmail);
  }
  if !is_valid_password(password) {
    return Err(ValidationError::WeakPassword);
  }
  Ok(())
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<(), ValidationError> {
  if !is_valid_name(&update.first_name) {
    return Err(ValidationError::BlankField("First name"));
  }
  if !is_valid_name(&update.last_name) {
    return Err(ValidationError::BlankField("Last name"));
  }
  if !is_valid_age(update.age) {
    return Err(ValidationError::AgeOutOfRange(update.age));
  }
  Ok(())
}

pub fn validate_socials(socials: &Socials) -> Result<(), ValidationError> {
  if !is_valid_url(&socials.linkedin_url) {
    return Err(ValidationError::InvalidUrl("LinkedIn URL"));
  }
  if !is_valid_url(&socials.github_url) {
    return Err(ValidationError::InvalidUrl("GitHub URL"));
  }
  if !is_valid_url(&socials.personal_website_url) {
    return Err(ValidationError::InvalidUrl("Personal website URL"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_valid_emails() {
    assert!(is_valid_email("a@x.com"));
    assert!(is_valid_email("first.last+tag@mail.example.org"));
    assert!(is_valid_email("  padded@x.io  "));
  }

  #[test]
  fn test_invalid_emails() {
    assert!(!is_valid_email(""));
    assert!(!is_valid_email("no-at-sign.com"));
    assert!(!is_valid_email("@x.com"));
    assert!(!is_valid_email("a@.com"));
    assert!(!is_valid_email("a@x"));
    assert!(!is_valid_email("a@x.c"));
    assert!(!is_valid_email("a@x.toolongtld"));
    assert!(!is_valid_email("a b@x.com"));
    assert!(!is_valid_email("a@x.c0m"));
  }

  #[test]
  fn test_normalize_email() {
    assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
  }

  #[test]
  fn test_password_rules() {
    assert!(is_valid_password("Secret1"));
    assert!(!is_valid_password("Sec1"));
    assert!(!is_valid_password("secret1"));
    assert!(!is_valid_password("SECRET1"));
    assert!(!is_valid_password("Secretly"));
    assert!(!is_valid_password("      "));
  }

  #[test]
  fn test_age_bounds() {
    assert!(!is_valid_age(12));
    assert!(is_valid_age(13));
    assert!(is_valid_age(120));
    assert!(!is_valid_age(121));
  }

  #[test]
  fn test_urls() {
    assert!(is_valid_url(""));
    assert!(is_valid_url("   "));
    assert!(is_valid_url("https://github.com/someone"));
    assert!(is_valid_url("http://www.example.co.uk"));
    assert!(is_valid_url("linkedin.com/in/someone"));
    assert!(!is_valid_url("not a url"));
    assert!(!is_valid_url("https://localhost"));
    assert!(!is_valid_url("https://example.c"));
  }

  #[test]
  fn test_topic_label() {
    assert!(validate_topic_label("Biology").is_ok());
    assert!(validate_topic_label("  ").is_err());
    assert_eq!(
      validate_topic_label("Arts, Crafts"),
      Err(ValidationError::InvalidTopic("Arts, Crafts".into()))
    );
  }

  #[test]
  fn test_validate_profile() {
    let mut update = ProfileUpdate {
      first_name: "Ada".into(),
      last_name: "Lovelace".into(),
      age: 36,
      gender: String::new(),
      occupation: String::new(),
    };
    assert!(validate_profile(&update).is_ok());

    update.age = 5;
    assert_eq!(validate_profile(&update), Err(ValidationError::AgeOutOfRange(5)));

    update.age = 36;
    update.last_name = " ".into();
    assert_eq!(validate_profile(&update), Err(ValidationError::BlankField("Last name")));
  }

  #[test]
  fn test_validate_socials() {
    let mut socials = Socials::default();
    assert!(validate_socials(&socials).is_ok());
    socials.github_url = "github dot com".into();
    assert_eq!(validate_socials(&socials), Err(ValidationError::InvalidUrl("GitHub URL")));
  }
}
