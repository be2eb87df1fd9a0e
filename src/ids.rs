use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use serde::{Deserialize, Serialize};

/// String identifier tagged with the kind of thing it names, so a zone id
/// cannot be passed where a rule id or a username is expected.
#[derive(Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct StringId<T> {
    value: String,
    #[serde(skip)]
    _mark: PhantomData<T>
}

/// Marker for provider zone identifiers.
#[derive(Debug)]
pub enum Zone {}

/// Marker for provider page-rule identifiers.
#[derive(Debug)]
pub enum Rule {}

/// Marker for tracked channel logins.
#[derive(Debug)]
pub enum Channel {}

pub type ZoneId = StringId<Zone>;
pub type RuleId = StringId<Rule>;
pub type Username = StringId<Channel>;

impl<T> StringId<T> {
    pub fn new(id: impl Into<String>) -> StringId<T> {
        Self { value: id.into(), _mark: PhantomData }
    }

    pub fn as_ref(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

// Manual impls: derives would put bounds on the marker type.
impl<T> Clone for StringId<T> {
    fn clone(&self) -> Self {
        StringId::new(self.value.clone())
    }
}

impl<T> PartialEq for StringId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for StringId<T> {}

impl<T> std::hash::Hash for StringId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state)
    }
}

impl<T> Display for StringId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl<T> Default for StringId<T> {
    fn default() -> Self {
        StringId::new(String::new())
    }
}

impl<T> From<StringId<T>> for String {
    fn from(id: StringId<T>) -> Self {
        id.value
    }
}
