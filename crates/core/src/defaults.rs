//! User-supplied option defaults (`-o name=value`, `-o name`, `-o noname`).

/// Value type declared by an option document's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionKind {
    /// Choice among `<enum_val>` entries.
    #[default]
    Enum,
    /// On/off switch.
    Bool,
    /// Integer value.
    Int,
    /// Floating-point value.
    Float,
}

impl OptionKind {
    /// Whether `<arg_min>`/`<arg_max>` bounds apply.
    pub fn is_numeric(self) -> bool {
        matches!(self, OptionKind::Int | OptionKind::Float)
    }

    /// Read the kind out of a `type="..."` attribute word.
    pub fn from_attribute(word: &str) -> Option<Self> {
        let rest = &word[word.find("type")? + 4..];
        if rest.contains("enum") {
            Some(OptionKind::Enum)
        } else if rest.contains("bool") {
            Some(OptionKind::Bool)
        } else if rest.contains("int") {
            Some(OptionKind::Int)
        } else if rest.contains("float") {
            Some(OptionKind::Float)
        } else {
            None
        }
    }
}

/// Find the user's default for the option with short name `shortname`.
///
/// Settings are examined in order and a later match replaces an earlier one,
/// including when the later one is invalid. Returns the normalized value:
/// booleans become `"1"`/`"0"`, numbers are kept verbatim after a character
/// check, enum values are returned as given (they are matched against enum
/// short names later).
pub fn resolve(settings: &[String], shortname: &str, kind: OptionKind) -> Option<String> {
    let mut chosen = None;
    for setting in settings {
        if let Some(value) = setting
            .strip_prefix(shortname)
            .and_then(|rest| rest.strip_prefix('='))
        {
            chosen = validate(value, kind);
        } else if kind == OptionKind::Bool && setting == shortname {
            chosen = Some("1".to_string());
        } else if kind == OptionKind::Bool
            && setting.get(2..) == Some(shortname)
            && setting.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("no"))
        {
            chosen = Some("0".to_string());
        }
    }
    chosen
}

fn validate(value: &str, kind: OptionKind) -> Option<String> {
    let ok = match kind {
        OptionKind::Enum => true,
        OptionKind::Bool => {
            return match value.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some("1".to_string()),
                "false" | "no" | "off" | "0" => Some("0".to_string()),
                _ => None,
            };
        }
        OptionKind::Int => value.chars().all(|c| "+-0123456789".contains(c)),
        OptionKind::Float => value.chars().all(|c| "+-0123456789.eE".contains(c)),
    };
    ok.then(|| value.to_string())
}

/// Parse the longest numeric prefix of `text`, `0.0` when there is none.
///
/// Bounds and defaults in the database are compared leniently, so `"12mm"`
/// counts as 12 and garbage counts as 0.
pub fn lenient_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits = |mut at: usize| {
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        at
    };
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits(end);
    let mut mantissa = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits(end + 1);
        if mantissa || frac_end > end + 1 {
            mantissa = true;
            end = frac_end;
        }
    }
    if !mantissa {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(0.0)
}
