//! User store: accounts, onboarding fields and topic queries.
//!
//! Topics live in `user_topics` (one row per topic, ordered by position).
//! Study times are still a `", "`-joined text column.

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result};

use crate::domain::topics::LIST_SEPARATOR;
use crate::domain::{join_topics, normalize_topics, parse_topics, ProfileUpdate, Socials, User};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, age, gender, occupation, \
  preferred_study_time, study_difficulty_level, setup_complete, linkedin_url, github_url, \
  personal_website_url, created_at";

/// Create a user with email and password only, returns the user ID
pub fn create_user(conn: &Connection, email: &str, password_hash: &str) -> Result<i64> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
    params![email, password_hash, now],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
  let count: i64 = conn.query_row(
    "SELECT COUNT(*) FROM users WHERE email = ?1",
    params![email],
    |row| row.get(0),
  )?;
  Ok(count > 0)
}

/// Returns (user_id, password_hash)
pub fn get_credentials(conn: &Connection, email: &str) -> Result<Option<(i64, String)>> {
  conn
    .query_row(
      "SELECT id, password_hash FROM users WHERE email = ?1",
      params![email],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
  let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
  let user = conn.query_row(&sql, params![email], row_to_user).optional()?;
  match user {
    Some(mut user) => {
      user.topics_interested = get_topics(conn, user.id)?;
      Ok(Some(user))
    }
    None => Ok(None),
  }
}

/// All users in storage order
pub fn get_all_users(conn: &Connection) -> Result<Vec<User>> {
  let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
  let mut stmt = conn.prepare(&sql)?;
  let users = stmt.query_map([], row_to_user)?.collect::<Result<Vec<_>>>()?;
  with_topics(conn, users)
}

pub fn get_user_count(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}

// ==================== Onboarding updates ====================

/// Personal information step. Returns false if no such user.
pub fn update_profile(conn: &Connection, email: &str, update: &ProfileUpdate) -> Result<bool> {
  let rows = conn.execute(
    r#"
    UPDATE users
    SET first_name = ?1, last_name = ?2, age = ?3, gender = ?4, occupation = ?5
    WHERE email = ?6
    "#,
    params![
      update.first_name.trim(),
      update.last_name.trim(),
      update.age,
      update.gender.trim(),
      update.occupation.trim(),
      email
    ],
  )?;
  Ok(rows > 0)
}

/// Replace a user's topics, keeping order. Labels are normalized first.
pub fn set_topics<S: AsRef<str>>(conn: &Connection, email: &str, topics: &[S]) -> Result<bool> {
  let Some(user_id) = get_user_id(conn, email)? else {
    return Ok(false);
  };
  let topics = normalize_topics(topics);

  let tx = conn.unchecked_transaction()?;
  tx.execute("DELETE FROM user_topics WHERE user_id = ?1", params![user_id])?;
  for (position, topic) in topics.iter().enumerate() {
    tx.execute(
      "INSERT INTO user_topics (user_id, position, topic) VALUES (?1, ?2, ?3)",
      params![user_id, position as i64, topic],
    )?;
  }
  tx.commit()?;
  Ok(true)
}

/// Legacy entry point taking the `", "`-joined form
pub fn set_topics_text(conn: &Connection, email: &str, comma_joined: &str) -> Result<bool> {
  set_topics(conn, email, &parse_topics(comma_joined))
}

pub fn get_topics(conn: &Connection, user_id: i64) -> Result<Vec<String>> {
  let mut stmt = conn.prepare("SELECT topic FROM user_topics WHERE user_id = ?1 ORDER BY position")?;
  let topics = stmt
    .query_map(params![user_id], |row| row.get(0))?
    .collect::<Result<Vec<String>>>()?;
  Ok(topics)
}

pub fn set_study_time<S: AsRef<str>>(conn: &Connection, email: &str, times: &[S]) -> Result<bool> {
  let joined = join_topics(&normalize_topics(times));
  update_single_field(conn, email, "preferred_study_time", &joined)
}

pub fn set_difficulty(conn: &Connection, email: &str, level: &str) -> Result<bool> {
  update_single_field(conn, email, "study_difficulty_level", level.trim())
}

pub fn save_socials(conn: &Connection, email: &str, socials: &Socials) -> Result<bool> {
  let rows = conn.execute(
    "UPDATE users SET linkedin_url = ?1, github_url = ?2, personal_website_url = ?3 WHERE email = ?4",
    params![
      socials.linkedin_url.trim(),
      socials.github_url.trim(),
      socials.personal_website_url.trim(),
      email
    ],
  )?;
  Ok(rows > 0)
}

pub fn mark_setup_complete(conn: &Connection, email: &str) -> Result<bool> {
  let rows = conn.execute("UPDATE users SET setup_complete = 1 WHERE email = ?1", params![email])?;
  Ok(rows > 0)
}

/// False for unknown users
pub fn is_setup_complete(conn: &Connection, email: &str) -> Result<bool> {
  let flag: Option<i64> = conn
    .query_row(
      "SELECT setup_complete FROM users WHERE email = ?1",
      params![email],
      |row| row.get(0),
    )
    .optional()?;
  Ok(flag == Some(1))
}

pub fn update_password(conn: &Connection, email: &str, password_hash: &str) -> Result<bool> {
  update_single_field(conn, email, "password_hash", password_hash)
}

pub fn update_last_login(conn: &Connection, user_id: i64) -> Result<()> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    "UPDATE users SET last_login_at = ?1 WHERE id = ?2",
    params![now, user_id],
  )?;
  Ok(())
}

// ==================== Topic queries ====================

/// Users holding any of `topics` exactly, excluding `exclude_email`, in storage order.
pub fn find_users_with_any_topic<S: AsRef<str>>(
  conn: &Connection,
  topics: &[S],
  exclude_email: &str,
) -> Result<Vec<User>> {
  let topics = normalize_topics(topics);
  if topics.is_empty() {
    return Ok(Vec::new());
  }

  let placeholders = (0..topics.len())
    .map(|i| format!("?{}", i + 2))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!(
    r#"
    SELECT {cols} FROM users u
    WHERE u.email != ?1
      AND EXISTS (
        SELECT 1 FROM user_topics t
        WHERE t.user_id = u.id AND t.topic IN ({placeholders})
      )
    ORDER BY u.id
    "#,
    cols = USER_COLUMNS,
    placeholders = placeholders,
  );

  let args = std::iter::once(exclude_email).chain(topics.iter().map(String::as_str));
  let mut stmt = conn.prepare(&sql)?;
  let users = stmt
    .query_map(params_from_iter(args), row_to_user)?
    .collect::<Result<Vec<_>>>()?;
  with_topics(conn, users)
}

/// Legacy rule: the user's `", "`-joined topic string contains any of
/// `topics` as a case-sensitive substring.
pub fn find_users_with_topic_substring<S: AsRef<str>>(
  conn: &Connection,
  topics: &[S],
  exclude_email: &str,
) -> Result<Vec<User>> {
  let topics = normalize_topics(topics);
  if topics.is_empty() {
    return Ok(Vec::new());
  }

  // One pass: each user's topics joined in position order, filtered in Rust
  // because LIKE would ignore case
  let sql = format!(
    r#"
    SELECT {cols}, t.joined FROM users
    JOIN (
      SELECT user_id, GROUP_CONCAT(topic, '{sep}' ORDER BY position) AS joined
      FROM user_topics
      GROUP BY user_id
    ) t ON t.user_id = users.id
    WHERE users.email != ?1
    ORDER BY users.id
    "#,
    cols = USER_COLUMNS,
    sep = LIST_SEPARATOR,
  );
  let mut stmt = conn.prepare(&sql)?;
  let candidates = stmt
    .query_map(params![exclude_email], |row| {
      let joined: String = row.get(15)?;
      Ok((row_to_user(row)?, joined))
    })?
    .collect::<Result<Vec<_>>>()?;

  let matched: Vec<User> = candidates
    .into_iter()
    .filter(|(_, joined)| topics.iter().any(|t| joined.contains(t.as_str())))
    .map(|(user, _)| user)
    .collect();
  with_topics(conn, matched)
}

// ==================== Helpers ====================

fn get_user_id(conn: &Connection, email: &str) -> Result<Option<i64>> {
  conn
    .query_row("SELECT id FROM users WHERE email = ?1", params![email], |row| row.get(0))
    .optional()
}

/// `column` must be a trusted literal
fn update_single_field(conn: &Connection, email: &str, column: &str, value: &str) -> Result<bool> {
  let rows = conn.execute(
    &format!("UPDATE users SET {} = ?1 WHERE email = ?2", column),
    params![value, email],
  )?;
  Ok(rows > 0)
}

fn with_topics(conn: &Connection, mut users: Vec<User>) -> Result<Vec<User>> {
  for user in users.iter_mut() {
    user.topics_interested = get_topics(conn, user.id)?;
  }
  Ok(users)
}

fn row_to_user(row: &rusqlite::Row) -> Result<User> {
  let study_time: String = row.get(8)?;
  let setup_complete: i64 = row.get(10)?;

  Ok(User {
    id: row.get(0)?,
    email: row.get(1)?,
    password_hash: row.get(2)?,
    first_name: row.get(3)?,
    last_name: row.get(4)?,
    age: row.get(5)?,
    gender: row.get(6)?,
    occupation: row.get(7)?,
    preferred_study_time: parse_topics(&study_time),
    topics_interested: Vec::new(),
    study_difficulty_level: row.get(9)?,
    socials: Socials {
      linkedin_url: row.get(11)?,
      github_url: row.get(12)?,
      personal_website_url: row.get(13)?,
    },
    setup_complete: setup_complete == 1,
    created_at: row.get(14)?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  fn add_user(conn: &Connection, email: &str, topics: &[&str]) -> i64 {
    let id = create_user(conn, email, "hash").unwrap();
    set_topics(conn, email, topics).unwrap();
    id
  }

  fn emails(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.email.as_str()).collect()
  }

  #[test]
  fn test_create_and_fetch_user() {
    let env = TestEnv::new().unwrap();
    let id = create_user(&env.conn, "a@x.com", "hash").unwrap();

    let user = get_user_by_email(&env.conn, "a@x.com").unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.password_hash, "hash");
    assert!(user.topics_interested.is_empty());
    assert!(!user.setup_complete);
    assert!(!user.created_at.is_empty());
  }

  #[test]
  fn test_email_is_unique_case_insensitively() {
    let env = TestEnv::new().unwrap();
    create_user(&env.conn, "a@x.com", "hash").unwrap();
    assert!(create_user(&env.conn, "A@X.com", "hash").is_err());
    assert!(email_exists(&env.conn, "A@x.COM").unwrap());
  }

  #[test]
  fn test_unknown_user_lookups() {
    let env = TestEnv::new().unwrap();
    assert!(get_user_by_email(&env.conn, "nobody@x.com").unwrap().is_none());
    assert!(get_credentials(&env.conn, "nobody@x.com").unwrap().is_none());
    assert!(!set_topics(&env.conn, "nobody@x.com", &["Biology"]).unwrap());
    assert!(!is_setup_complete(&env.conn, "nobody@x.com").unwrap());
  }

  #[test]
  fn test_onboarding_updates() {
    let env = TestEnv::new().unwrap();
    create_user(&env.conn, "a@x.com", "hash").unwrap();

    let update = ProfileUpdate {
      first_name: " Ada ".into(),
      last_name: "Lovelace".into(),
      age: 36,
      gender: "Female".into(),
      occupation: "Analyst".into(),
    };
    assert!(update_profile(&env.conn, "a@x.com", &update).unwrap());
    assert!(set_study_time(&env.conn, "a@x.com", &["Weekday Morning", "Weekend Evening"]).unwrap());
    assert!(set_difficulty(&env.conn, "a@x.com", "Advanced").unwrap());
    let socials = Socials {
      github_url: "https://github.com/ada".into(),
      ..Default::default()
    };
    assert!(save_socials(&env.conn, "a@x.com", &socials).unwrap());
    assert!(mark_setup_complete(&env.conn, "a@x.com").unwrap());

    let user = get_user_by_email(&env.conn, "a@x.com").unwrap().unwrap();
    assert_eq!(user.first_name, "Ada");
    assert_eq!(user.age, Some(36));
    assert_eq!(user.preferred_study_time, vec!["Weekday Morning", "Weekend Evening"]);
    assert_eq!(user.study_difficulty_level, "Advanced");
    assert_eq!(user.socials.github_url, "https://github.com/ada");
    assert!(user.setup_complete);
    assert!(is_setup_complete(&env.conn, "a@x.com").unwrap());
  }

  #[test]
  fn test_set_topics_replaces_and_keeps_order() {
    let env = TestEnv::new().unwrap();
    let id = add_user(&env.conn, "a@x.com", &["Physics", "Biology"]);
    assert_eq!(get_topics(&env.conn, id).unwrap(), vec!["Physics", "Biology"]);

    set_topics(&env.conn, "a@x.com", &["History", " Biology ", "History"]).unwrap();
    assert_eq!(get_topics(&env.conn, id).unwrap(), vec!["History", "Biology"]);
  }

  #[test]
  fn test_set_topics_text_parses_legacy_form() {
    let env = TestEnv::new().unwrap();
    let id = create_user(&env.conn, "a@x.com", "hash").unwrap();
    set_topics_text(&env.conn, "a@x.com", "Computer Science, Biology, ").unwrap();
    assert_eq!(get_topics(&env.conn, id).unwrap(), vec!["Computer Science", "Biology"]);
  }

  #[test]
  fn test_find_any_topic_exact() {
    let env = TestEnv::new().unwrap();
    add_user(&env.conn, "a@x.com", &["Biology"]);
    add_user(&env.conn, "b@x.com", &["Chemistry", "Biology"]);
    add_user(&env.conn, "c@x.com", &["History"]);
    add_user(&env.conn, "d@x.com", &["Computer Science"]);

    let found = find_users_with_any_topic(&env.conn, &["Biology", "Chemistry"], "z@x.com").unwrap();
    assert_eq!(emails(&found), vec!["a@x.com", "b@x.com"]);
    assert_eq!(found[1].topics_interested, vec!["Chemistry", "Biology"]);

    let none = find_users_with_any_topic(&env.conn, &["Science"], "z@x.com").unwrap();
    assert!(none.is_empty());
  }

  #[test]
  fn test_find_excludes_requester_for_every_topic() {
    let env = TestEnv::new().unwrap();
    add_user(&env.conn, "me@x.com", &["Biology", "Physics"]);
    add_user(&env.conn, "b@x.com", &["Physics"]);

    let found = find_users_with_any_topic(&env.conn, &["Biology", "Physics"], "ME@x.com").unwrap();
    assert_eq!(emails(&found), vec!["b@x.com"]);

    let found = find_users_with_topic_substring(&env.conn, &["Biology", "Physics"], "me@x.com").unwrap();
    assert_eq!(emails(&found), vec!["b@x.com"]);
  }

  #[test]
  fn test_find_substring_is_loose_but_case_sensitive() {
    let env = TestEnv::new().unwrap();
    add_user(&env.conn, "a@x.com", &["Computer Science", "Biology"]);
    add_user(&env.conn, "b@x.com", &["History"]);

    let found = find_users_with_topic_substring(&env.conn, &["Science"], "z@x.com").unwrap();
    assert_eq!(emails(&found), vec!["a@x.com"]);

    let found = find_users_with_topic_substring(&env.conn, &["science"], "z@x.com").unwrap();
    assert!(found.is_empty());
  }

  #[test]
  fn test_find_substring_uses_joined_topics_in_order() {
    let env = TestEnv::new().unwrap();
    add_user(&env.conn, "a@x.com", &["Computer Science", "Biology"]);
    add_user(&env.conn, "b@x.com", &["Biology", "Computer Science"]);
    add_user(&env.conn, "c@x.com", &[]);

    // Spans the separator only for a@, where Science is followed by Biology
    let found = find_users_with_topic_substring(&env.conn, &["Science, Bio"], "z@x.com").unwrap();
    assert_eq!(emails(&found), vec!["a@x.com"]);
    assert_eq!(found[0].topics_interested, vec!["Computer Science", "Biology"]);

    let found = find_users_with_topic_substring(&env.conn, &["Bio"], "z@x.com").unwrap();
    assert_eq!(emails(&found), vec!["a@x.com", "b@x.com"]);
  }

  #[test]
  fn test_find_with_no_topics_returns_nothing() {
    let env = TestEnv::new().unwrap();
    add_user(&env.conn, "a@x.com", &["Biology"]);

    let empty: [&str; 0] = [];
    assert!(find_users_with_any_topic(&env.conn, &empty, "z@x.com").unwrap().is_empty());
    assert!(find_users_with_topic_substring(&env.conn, &empty, "z@x.com").unwrap().is_empty());
    assert!(find_users_with_topic_substring(&env.conn, &["  "], "z@x.com").unwrap().is_empty());
  }

  #[test]
  fn test_get_all_users_in_storage_order() {
    let env = TestEnv::new().unwrap();
    add_user(&env.conn, "b@x.com", &["Biology"]);
    add_user(&env.conn, "a@x.com", &[]);

    let all = get_all_users(&env.conn).unwrap();
    assert_eq!(emails(&all), vec!["b@x.com", "a@x.com"]);
    assert_eq!(all[0].topics_interested, vec!["Biology"]);
    assert_eq!(get_user_count(&env.conn).unwrap(), 2);
  }

  #[test]
  fn test_update_password() {
    let env = TestEnv::new().unwrap();
    let id = create_user(&env.conn, "a@x.com", "old").unwrap();
    assert!(update_password(&env.conn, "a@x.com", "new").unwrap());
    assert_eq!(get_credentials(&env.conn, "a@x.com").unwrap(), Some((id, "new".to_string())));
  }
}
