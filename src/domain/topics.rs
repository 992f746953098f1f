//! Topic labels and the legacy comma-joined list format.
//!
//! Topics are free text. The vocabularies below are what onboarding offers,
//! but nothing here treats them as a closed set.

/// Separator used by the legacy text format
pub const LIST_SEPARATOR: &str = ", ";

/// Topics offered during onboarding
pub const TOPIC_VOCABULARY: [&str; 10] = [
  "Computer Science",
  "Biology",
  "Chemistry",
  "Mathematics",
  "Engineering",
  "Physics",
  "English",
  "French",
  "History",
  "Philosophy",
];

/// Study time slots offered during onboarding
pub const STUDY_TIME_VOCABULARY: [&str; 6] = [
  "Weekday Morning",
  "Weekday Afternoon",
  "Weekday Evening",
  "Weekend Morning",
  "Weekend Afternoon",
  "Weekend Evening",
];

/// Difficulty levels offered during onboarding
pub const DIFFICULTY_LEVELS: [&str; 3] = ["Beginner", "Intermediate", "Advanced"];

/// Join labels into the persisted `", "` form.
pub fn join_topics<S: AsRef<str>>(topics: &[S]) -> String {
  topics
    .iter()
    .map(|t| t.as_ref())
    .collect::<Vec<_>>()
    .join(LIST_SEPARATOR)
}

/// Parse the persisted form back into labels.
///
/// Splits on `,`, trims every piece and drops empty pieces, so leading,
/// trailing or doubled separators are tolerated.
pub fn parse_topics(input: &str) -> Vec<String> {
  input
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

/// Trim, drop blanks and de-duplicate while keeping first-seen order.
pub fn normalize_topics<I, S>(topics: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut out: Vec<String> = Vec::new();
  for topic in topics {
    let trimmed = topic.as_ref().trim();
    if trimmed.is_empty() || out.iter().any(|t| t == trimmed) {
      continue;
    }
    out.push(trimmed.to_string());
  }
  out
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_join_uses_comma_space() {
    assert_eq!(join_topics(&["Biology", "Physics"]), "Biology, Physics");
  }

  #[test]
  fn test_join_empty() {
    let empty: [&str; 0] = [];
    assert_eq!(join_topics(&empty), "");
  }

  #[test]
  fn test_parse_trims_and_drops_empty_pieces() {
    assert_eq!(
      parse_topics(", Biology ,,Physics, "),
      vec!["Biology".to_string(), "Physics".to_string()]
    );
  }

  #[test]
  fn test_parse_legacy_trailing_separator() {
    // Onboarding used to append ", " after every checked box
    assert_eq!(
      parse_topics("Computer Science, Biology, "),
      vec!["Computer Science".to_string(), "Biology".to_string()]
    );
  }

  #[test]
  fn test_parse_blank_is_empty() {
    assert!(parse_topics("").is_empty());
    assert!(parse_topics("   ").is_empty());
  }

  #[test]
  fn test_round_trip_full_vocabulary() {
    let topics: Vec<String> = TOPIC_VOCABULARY.iter().map(|s| s.to_string()).collect();
    assert_eq!(parse_topics(&join_topics(&topics)), topics);
  }

  #[test]
  fn test_round_trip_every_prefix_and_reverse() {
    for n in 0..=TOPIC_VOCABULARY.len() {
      let forward: Vec<String> = TOPIC_VOCABULARY[..n].iter().map(|s| s.to_string()).collect();
      assert_eq!(parse_topics(&join_topics(&forward)), forward);

      let reversed: Vec<String> = forward.iter().rev().cloned().collect();
      assert_eq!(parse_topics(&join_topics(&reversed)), reversed);
    }
  }

  #[test]
  fn test_comma_in_label_is_lossy() {
    let topics = vec!["Arts, Crafts".to_string()];
    assert_ne!(parse_topics(&join_topics(&topics)), topics);
  }

  #[test]
  fn test_normalize_dedups_in_order() {
    assert_eq!(
      normalize_topics(["Physics", " Biology", "Physics ", "", "  "]),
      vec!["Physics".to_string(), "Biology".to_string()]
    );
  }
}
