use crate::domain::{normalize_topics, User};

/// Users interested in one requested topic
#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup {
    pub topic: String,
    pub users: Vec<User>,
}

/// Topic -> users, in the order the requester listed the topics.
/// Never holds an empty group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicGroups {
    groups: Vec<TopicGroup>,
}

impl TopicGroups {
    pub fn get(&self, topic: &str) -> Option<&[User]> {
        self.groups
            .iter()
            .find(|g| g.topic == topic)
            .map(|g| g.users.as_slice())
    }

    pub fn contains_topic(&self, topic: &str) -> bool {
        self.get(topic).is_some()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.topic.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TopicGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<TopicGroup> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a TopicGroups {
    type Item = &'a TopicGroup;
    type IntoIter = std::slice::Iter<'a, TopicGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partition `matched` by the requester's topics.
///
/// Membership is exact. A user holding several requested topics shows up
/// under each of them; users keep their order from `matched`.
pub fn group_by_topic<T: AsRef<str>>(requester_topics: &[T], matched: &[User]) -> TopicGroups {
    let mut groups = Vec::new();
    if matched.is_empty() {
        return TopicGroups { groups };
    }

    for topic in normalize_topics(requester_topics) {
        let users: Vec<User> = matched
            .iter()
            .filter(|u| u.has_topic(&topic))
            .cloned()
            .collect();
        if !users.is_empty() {
            groups.push(TopicGroup { topic, users });
        }
    }

    TopicGroups { groups }
}
