//! URL-encoded form bodies.

use std::fmt::Display;

/// Ordered list of form fields.
///
/// Field order is preserved on the wire. Values are anything `Display`,
/// so `true` and `100` are sent as `"true"` and `"100"`.
///
/// # Examples
///
/// ```
/// use oae_client::Form;
///
/// let form = Form::new()
///     .field(":name", "bob-42")
///     .field("sakai:pseudoGroup", true);
///
/// assert_eq!(form.get("sakai:pseudoGroup"), Some("true"));
/// assert_eq!(form.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, String)>,
}

impl Form {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field and returns the form.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.push(name, value);
        self
    }

    /// Adds a field in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Display) {
        self.fields.push((name.into(), value.to_string()));
    }

    /// Returns the first value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the form has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Form
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (name, value) in iter {
            form.push(name, value);
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let form = Form::new().field("b", 1).field("a", 2);
        let names: Vec<&str> = form.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_get_returns_first_value() {
        let form: Form = [("key", "one"), ("key", "two")].into_iter().collect();
        assert_eq!(form.get("key"), Some("one"));
        assert_eq!(form.get("missing"), None);
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_empty_form() {
        let form = Form::new();
        assert!(form.is_empty());
        assert!(form.fields().is_empty());
    }
}
