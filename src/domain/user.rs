use serde::{Deserialize, Serialize};

/// Social links collected during onboarding. Empty string means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
  #[serde(default)]
  pub linkedin_url: String,
  #[serde(default)]
  pub github_url: String,
  #[serde(default)]
  pub personal_website_url: String,
}

/// A stored user record
#[derive(Debug, Clone, PartialEq)]
pub struct User {
  pub id: i64,
  /// Lowercased at entry
  pub email: String,
  /// Argon2 PHC string
  pub password_hash: String,
  pub first_name: String,
  pub last_name: String,
  pub age: Option<i64>,
  pub gender: String,
  pub occupation: String,
  pub preferred_study_time: Vec<String>,
  pub topics_interested: Vec<String>,
  pub study_difficulty_level: String,
  pub socials: Socials,
  pub setup_complete: bool,
  pub created_at: String,
}

impl User {
  /// Minimal record as created at signup
  pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
    Self {
      id: 0,
      email: email.into(),
      password_hash: password_hash.into(),
      first_name: String::new(),
      last_name: String::new(),
      age: None,
      gender: String::new(),
      occupation: String::new(),
      preferred_study_time: Vec::new(),
      topics_interested: Vec::new(),
      study_difficulty_level: String::new(),
      socials: Socials::default(),
      setup_complete: false,
      created_at: String::new(),
    }
  }

  /// Builder used by tests and seeding
  pub fn with_topics<S: AsRef<str>>(mut self, topics: &[S]) -> Self {
    self.topics_interested = topics.iter().map(|t| t.as_ref().to_string()).collect();
    self
  }

  pub fn display_name(&self) -> String {
    let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
    let full = full.trim();
    if full.is_empty() {
      self.email.clone()
    } else {
      full.to_string()
    }
  }

  /// Exact membership test used by the grouper
  pub fn has_topic(&self, topic: &str) -> bool {
    self.topics_interested.iter().any(|t| t == topic)
  }

  /// Public view of this user. Socials are only carried when `include_socials`.
  pub fn to_profile(&self, include_socials: bool) -> UserProfile {
    UserProfile {
      email: self.email.clone(),
      display_name: self.display_name(),
      first_name: self.first_name.clone(),
      last_name: self.last_name.clone(),
      age: self.age,
      gender: self.gender.clone(),
      occupation: self.occupation.clone(),
      preferred_study_time: self.preferred_study_time.clone(),
      topics_interested: self.topics_interested.clone(),
      study_difficulty_level: self.study_difficulty_level.clone(),
      socials: include_socials.then(|| self.socials.clone()),
      setup_complete: self.setup_complete,
    }
  }
}

/// Personal information step of onboarding
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub first_name: String,
  pub last_name: String,
  pub age: i64,
  #[serde(default)]
  pub gender: String,
  #[serde(default)]
  pub occupation: String,
}

/// User as serialized in API responses (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
  pub email: String,
  pub display_name: String,
  pub first_name: String,
  pub last_name: String,
  pub age: Option<i64>,
  pub gender: String,
  pub occupation: String,
  pub preferred_study_time: Vec<String>,
  pub topics_interested: Vec<String>,
  pub study_difficulty_level: String,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub socials: Option<Socials>,
  pub setup_complete: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_name_falls_back_to_email() {
    let user = User::new("a@x.com", "hash");
    assert_eq!(user.display_name(), "a@x.com");
  }

  #[test]
  fn test_display_name_joins_names() {
    let mut user = User::new("a@x.com", "hash");
    user.first_name = "Ada".into();
    user.last_name = "Lovelace".into();
    assert_eq!(user.display_name(), "Ada Lovelace");

    user.last_name.clear();
    assert_eq!(user.display_name(), "Ada");
  }

  #[test]
  fn test_has_topic_is_exact() {
    let user = User::new("a@x.com", "hash").with_topics(&["Computer Science"]);
    assert!(user.has_topic("Computer Science"));
    assert!(!user.has_topic("Science"));
    assert!(!user.has_topic("computer science"));
  }

  #[test]
  fn test_profile_hides_socials_unless_asked() {
    let mut user = User::new("a@x.com", "secret-hash");
    user.socials.github_url = "https://github.com/a".into();

    let public = user.to_profile(false);
    assert!(public.socials.is_none());

    let json = serde_json::to_string(&public).unwrap();
    assert!(!json.contains("socials"));
    assert!(!json.contains("secret-hash"));

    let private = user.to_profile(true);
    assert_eq!(private.socials.unwrap().github_url, "https://github.com/a");
  }
}
