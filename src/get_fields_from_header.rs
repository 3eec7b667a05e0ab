use regex::Regex;
use std::sync::LazyLock;

static INFO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##INFO=<ID=([^,>]+)").expect("INFO regex is valid"));

static FLAG_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##INFO=<ID=([^,>]+),[^\n>]*Type=Flag").expect("Flag regex is valid")
});

static FORMAT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##FORMAT=<ID=([^,>]+)").expect("FORMAT regex is valid"));

/// INFO IDs in header declaration order, duplicates dropped.
pub fn extract_info_ids(header: &str) -> Vec<String> {
    collect_ids(&INFO_ID_RE, header)
}

/// INFO IDs declared with `Type=Flag`.
pub fn extract_flag_ids(header: &str) -> Vec<String> {
    collect_ids(&FLAG_ID_RE, header)
}

/// FORMAT IDs in header declaration order, duplicates dropped.
pub fn extract_format_ids(header: &str) -> Vec<String> {
    collect_ids(&FORMAT_ID_RE, header)
}

fn collect_ids(re: &Regex, header: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for captures in re.captures_iter(header) {
        if let Some(id) = captures.get(1) {
            let id = id.as_str().trim();
            if !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
    }
    ids
}
