use std::num::NonZeroU32;

use crate::entity::Tzid;

/// Structured form of one line of player input, as produced by a parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub objname: Option<String>,
    pub objtzid: Option<Tzid>,
    pub obj2name: Option<String>,
    pub obj2tzid: Option<Tzid>,
    pub number: Option<NonZeroU32>,
    pub message: Option<String>,
    pub var: Option<String>,
    pub val: Option<String>,
    pub topic: Option<String>,
    /// The verb was guessed by the front end rather than typed.
    pub implied: bool,
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

/// Splits `#12` from a plain name.
fn name_or_id(token: &str) -> (Option<String>, Option<Tzid>) {
    let t = token.trim();
    if t.starts_with('#') {
        if let Some(id) = Tzid::parse(t) {
            return (None, Some(id));
        }
    }
    (non_empty(t), None)
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request naming one object, `"sword"` or `"#4"`.
    pub fn object(token: &str) -> Self {
        Self::new().with_object(token)
    }

    pub fn with_object(mut self, token: &str) -> Self {
        (self.objname, self.objtzid) = name_or_id(token);
        self
    }

    pub fn with_object2(mut self, token: &str) -> Self {
        (self.obj2name, self.obj2tzid) = name_or_id(token);
        self
    }

    pub fn with_number(mut self, n: u32) -> Self {
        self.number = NonZeroU32::new(n);
        self
    }

    pub fn with_message(mut self, msg: &str) -> Self {
        self.message = non_empty(msg);
        self
    }

    pub fn with_var(mut self, var: &str) -> Self {
        self.var = non_empty(var);
        self
    }

    pub fn with_val(mut self, val: &str) -> Self {
        self.val = Some(val.trim().to_string());
        self
    }

    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = non_empty(topic);
        self
    }

    pub fn implied(mut self) -> Self {
        self.implied = true;
        self
    }

    pub fn primary(&self) -> Option<Target> {
        Target::new(self.objname.as_deref(), self.objtzid)
    }

    pub fn secondary(&self) -> Option<Target> {
        Target::new(self.obj2name.as_deref(), self.obj2tzid)
    }
}

/// A reference to resolve: a name, an id, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: Option<String>,
    pub tzid: Option<Tzid>,
}

impl Target {
    pub fn new(name: Option<&str>, tzid: Option<Tzid>) -> Option<Self> {
        let name = name.and_then(non_empty);
        if name.is_none() && tzid.is_none() {
            return None;
        }
        Some(Self { name, tzid })
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: non_empty(name),
            tzid: None,
        }
    }

    pub fn id(tzid: Tzid) -> Self {
        Self {
            name: None,
            tzid: Some(tzid),
        }
    }

    pub fn is_all(&self) -> bool {
        self.name.as_deref() == Some("all")
    }

    pub fn is_any_of(&self, words: &[&str]) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| words.iter().any(|w| w.eq_ignore_ascii_case(n)))
    }

    /// How the player referred to it.
    pub fn describe(&self) -> String {
        match (&self.name, self.tzid) {
            (Some(n), _) => n.clone(),
            (None, Some(id)) => format!("object {id}"),
            (None, None) => "that".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_tokens_split_names_from_ids() {
        let r = Request::object("#12").with_object2("chest");
        assert_eq!(r.objtzid, Some(Tzid(12)));
        assert_eq!(r.objname, None);
        assert_eq!(r.obj2name.as_deref(), Some("chest"));
        assert_eq!(r.secondary().unwrap().describe(), "chest");
        assert_eq!(r.primary().unwrap().describe(), "object #12");
    }

    #[test]
    fn blank_fields_are_absent() {
        let r = Request::object("   ").with_number(0).with_message(" ");
        assert!(r.primary().is_none());
        assert!(r.number.is_none());
        assert!(r.message.is_none());
    }

    #[test]
    fn all_is_literal_and_case_sensitive() {
        assert!(Target::named("all").is_all());
        assert!(!Target::named("All").is_all());
        assert!(Target::named("Nobody").is_any_of(&["none", "nobody"]));
    }
}
