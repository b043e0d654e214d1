pub const ARRAY_PREFIX: &str = "Array of ";

/// Split an informal type expression into canonical type names.
///
/// `"Array of InputMediaPhoto or InputMediaVideo"` becomes
/// `["Array of InputMediaPhoto", "Array of InputMediaVideo"]`. Only one
/// leading `Array of ` is lifted out; deeper nesting stays in the fragment.
pub fn parse_type(raw: &str) -> Vec<String> {
    let (prefix, rest) = match raw.strip_prefix(ARRAY_PREFIX) {
        Some(rest) => (ARRAY_PREFIX, rest),
        None => ("", raw),
    };

    rest.split(" or ")
        .map(str::trim)
        .flat_map(|f| f.split(" and ").map(str::trim))
        .flat_map(|f| f.split(", ").map(str::trim))
        .map(|f| format!("{}{}", prefix, canonical(f)))
        .collect()
}

/// Map the document's spelling variants onto one name.
pub fn canonical(name: &str) -> &str {
    match name {
        // sendMediaGroup says "Array of Messages"
        "Messages" => "Message",
        "Float number" => "Float",
        "Int" => "Integer",
        "True" | "Bool" => "Boolean",
        other => other,
    }
}

/// Remove every leading `Array of `.
pub fn base_type(name: &str) -> &str {
    let mut t = name;
    while let Some(rest) = t.strip_prefix(ARRAY_PREFIX) {
        t = rest;
    }
    t
}
