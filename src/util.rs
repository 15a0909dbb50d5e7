use std::io::Write;
use std::path::Path;

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a record id of the form `{prefix}-{unix_millis}-{7 base36 chars}`.
///
/// Example: `generate_id("acc")` → "acc-1718000000000-k3j9x0a"
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..7)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// Generate an id that `taken` reports as unused.
pub fn generate_unique_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_id(prefix);
        if !taken(&id) {
            return id;
        }
    }
}

/// Normalize a search box value: trimmed and lowercased. `None` when empty,
/// meaning "no filter".
pub fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

/// Case-insensitive substring match against an already-normalized query.
pub fn matches_query(haystack: &str, normalized_query: &str) -> bool {
    haystack.to_lowercase().contains(normalized_query)
}

/// Write a file by writing a sibling temp file and renaming it over the
/// destination, so readers never see a half-written file.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
