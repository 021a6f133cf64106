//! Console line parsing: enough to drive the command core from a terminal.

use mudcore::Request;

/// Words that introduce a second object: `put coin in chest`.
const LINKS: &[&str] = &["in", "into", "from", "on", "with"];

/// Verbs whose whole argument is free text.
const TEXT_VERBS: &[&str] = &[
    "say", "\"", "shout", "yell", "emote", ":", "pose", "think", "recap",
];

/// Splits one line into a verb and its request. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<(String, Request)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix('"') {
        return Some(("say".to_string(), Request::new().with_message(rest)));
    }
    if let Some(rest) = line.strip_prefix(':') {
        return Some(("emote".to_string(), Request::new().with_message(rest)));
    }

    let (first, rest) = match line.split_once(char::is_whitespace) {
        Some((v, r)) => (v, r.trim()),
        None => (line, ""),
    };
    let verb = first.to_ascii_lowercase();

    let req = match verb.as_str() {
        v if TEXT_VERBS.contains(&v) => Request::new().with_message(rest),
        "set" => parse_set(rest),
        "unset" => Request::new().with_var(rest),
        "help" | "?" => Request::new().with_topic(rest),
        "look" | "l" => objects(strip_word(rest, "at")),
        "listen" => objects(strip_word(rest, "to")),
        _ => objects(rest),
    };
    Some((verb, req))
}

/// `set`, `set var`, `set var = val` or `set var val`.
fn parse_set(rest: &str) -> Request {
    if rest.is_empty() {
        return Request::new();
    }
    if let Some((var, val)) = rest.split_once('=') {
        return Request::new().with_var(var).with_val(val);
    }
    match rest.split_once(char::is_whitespace) {
        Some((var, val)) => Request::new().with_var(var).with_val(val),
        None => Request::new().with_var(rest),
    }
}

fn objects(rest: &str) -> Request {
    let words = rest.split_whitespace().collect::<Vec<_>>();
    let link = words
        .iter()
        .enumerate()
        .skip(1)
        .find(|(i, w)| *i + 1 < words.len() && LINKS.contains(&w.to_ascii_lowercase().as_str()))
        .map(|(i, _)| i);

    let (first, second) = match link {
        Some(i) => (words[..i].join(" "), Some(words[i + 1..].join(" "))),
        None => (words.join(" "), None),
    };

    let mut req = Request::new();
    if let Some((qty, item)) = parse_qty_and_item(&first) {
        req = req.with_object(strip_word(&item, "the"));
        if let Some(q) = qty {
            req = req.with_number(q);
        }
    }
    if let Some(second) = second {
        req = req.with_object2(strip_word(&second, "the"));
    }
    req
}

/// Drops a leading filler word: `look at chest`, `listen to the horn`.
fn strip_word<'a>(s: &'a str, word: &str) -> &'a str {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((w, rest)) if w.eq_ignore_ascii_case(word) => rest.trim(),
        _ => s,
    }
}

/// `2 coin`, `coin 2` and `coin x2`. The quantity is only present when
/// typed.
fn parse_qty_and_item(s: &str) -> Option<(Option<u32>, String)> {
    let parts = s.split_whitespace().collect::<Vec<_>>();
    if parts.is_empty() {
        return None;
    }
    if parts.len() == 1 {
        return Some((None, parts[0].to_string()));
    }

    // leading qty
    if let Ok(q) = parts[0].parse::<u32>() {
        return Some((Some(q), parts[1..].join(" ")));
    }
    // trailing qty
    let last = parts[parts.len() - 1];
    if let Ok(q) = last.parse::<u32>() {
        return Some((Some(q), parts[..parts.len() - 1].join(" ")));
    }
    // trailing xN
    if let Some(q) = last.strip_prefix('x').and_then(|n| n.parse::<u32>().ok()) {
        return Some((Some(q), parts[..parts.len() - 1].join(" ")));
    }

    Some((None, parts.join(" ")))
}
